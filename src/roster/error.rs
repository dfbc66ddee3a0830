// src/roster/error.rs

use std::fmt;
use thiserror::Error;

use super::header::EXPECTED_HEADER;

/// A problem tied to one data line. Line 1 is the header, so data starts at 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Why a roster could not be parsed.
///
/// `InsufficientRows` and `MissingColumn` are raised before any row is read;
/// `InvalidRows` carries every row-level problem found in one pass.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "CSV file must contain at least a header row and one data row. Expected header: {}",
        EXPECTED_HEADER
    )]
    InsufficientRows,

    #[error("CSV must contain a {column} column (e.g. {example}). Found headers: {}", .found.join(", "))]
    MissingColumn {
        column: &'static str,
        example: &'static str,
        found: Vec<String>,
    },

    #[error("{}", render_row_errors(.0))]
    InvalidRows(Vec<ParseError>),
}

impl ImportError {
    /// Row-level errors, empty for structural failures.
    pub fn row_errors(&self) -> &[ParseError] {
        match self {
            ImportError::InvalidRows(errors) => errors,
            _ => &[],
        }
    }
}

fn render_row_errors(errors: &[ParseError]) -> String {
    let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!(
        "CSV validation failed:\n{}\n\nPlease fix these errors and try again.",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_message_lists_every_line() {
        let err = ImportError::InvalidRows(vec![
            ParseError::new(2, "Student name is empty"),
            ParseError::new(5, "Invalid email format \"x\""),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("CSV validation failed:\n"));
        assert!(msg.contains("Line 2: Student name is empty\nLine 5: Invalid email format"));
        assert!(msg.ends_with("Please fix these errors and try again."));
        assert_eq!(err.row_errors().len(), 2);
    }

    #[test]
    fn missing_column_lists_found_headers() {
        let err = ImportError::MissingColumn {
            column: "student name",
            example: "studentName",
            found: vec!["className".into(), "grade".into()],
        };
        assert_eq!(
            err.to_string(),
            "CSV must contain a student name column (e.g. studentName). Found headers: className, grade"
        );
        assert!(err.row_errors().is_empty());
    }
}
