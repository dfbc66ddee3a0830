// src/store/mod.rs

pub mod json;
pub mod memory;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::{ParsedClassData, Student};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// A class as persisted by a [`ClassStore`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub students: Vec<Student>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A class that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub name: String,
    pub grade: Option<String>,
    pub students: Vec<Student>,
}

impl From<ParsedClassData> for NewClass {
    fn from(data: ParsedClassData) -> Self {
        Self {
            name: data.class_name,
            grade: data.grade,
            students: data.students,
        }
    }
}

impl NewClass {
    fn into_record(self, id: String, now: DateTime<Utc>) -> ClassRecord {
        ClassRecord {
            id,
            name: self.name,
            grade: self.grade,
            students: self.students,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Storage for committed classes. Implementations use interior locking so a
/// store can be shared behind `&` across threads.
pub trait ClassStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<ClassRecord>>;

    fn list(&self) -> Result<Vec<ClassRecord>>;

    /// Replace the record with the same id. Unknown ids are an error.
    fn update(&self, record: ClassRecord) -> Result<()>;

    /// Store a new class and return it with its assigned id.
    fn append(&self, class: NewClass) -> Result<ClassRecord>;
}

/// Next `cls-<n>` id after the highest one present.
fn next_class_id(records: &[ClassRecord]) -> String {
    let max = records
        .iter()
        .filter_map(|r| r.id.strip_prefix("cls-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("cls-{}", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_class_id_skips_foreign_ids() {
        let now = Utc::now();
        let rec = |id: &str| NewClass {
            name: "x".into(),
            grade: None,
            students: vec![],
        }
        .into_record(id.into(), now);

        assert_eq!(next_class_id(&[]), "cls-1");
        assert_eq!(
            next_class_id(&[rec("cls-2"), rec("legacy-9"), rec("cls-7")]),
            "cls-8"
        );
    }
}
