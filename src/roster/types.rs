// src/roster/types.rs

use serde::{Deserialize, Serialize};

/// One student row of an imported roster.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Output of a successful roster parse.
///
/// All students belong to `class_name`, the class named on the first data row.
/// `students` keeps CSV row order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClassData {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub students: Vec<Student>,
}
