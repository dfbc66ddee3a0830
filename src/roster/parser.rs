// src/roster/parser.rs

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::{
    error::{ImportError, ParseError},
    header::ColumnMap,
    tokenize::{split_lines, Tokenizer},
    types::{ParsedClassData, Student},
    utils::{is_valid_email, non_blank},
};

/// Turns roster CSV text into a [`ParsedClassData`].
///
/// Holds no state between calls; one parser can be shared across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RosterParser {
    tokenizer: Tokenizer,
}

impl RosterParser {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        self.tokenizer
    }

    /// Parse `csv_content` into a roster.
    ///
    /// - Fails fast if there is no data row or no class-name / student-name column.
    /// - Otherwise walks every data row, collecting row-level problems.
    /// - Any row-level problem fails the whole parse with all of them listed;
    ///   nothing is returned partially.
    #[instrument(level = "debug", skip(self, csv_content), fields(bytes = csv_content.len(), tokenizer = self.tokenizer.as_str()))]
    pub fn parse(&self, csv_content: &str) -> Result<ParsedClassData, ImportError> {
        let lines = split_lines(csv_content);
        if lines.len() < 2 {
            warn!(lines = lines.len(), "roster has no data rows");
            return Err(ImportError::InsufficientRows);
        }

        let headers = self.tokenizer.split_line(lines[0].1);
        let columns = ColumnMap::infer(&headers)?;
        debug!(?columns, "inferred columns");

        // captured once so synthesized ids share a stamp within this roster
        let stamp = Utc::now().timestamp_millis();

        let mut errors: Vec<ParseError> = Vec::new();
        let mut class_name: Option<String> = None;
        let mut grade: Option<String> = None;
        let mut students: Vec<Student> = Vec::with_capacity(lines.len() - 1);

        for (idx, &(line, raw)) in lines[1..].iter().enumerate() {
            let values = self.tokenizer.split_line(raw);

            if values.len() < columns.width {
                errors.push(ParseError::new(
                    line,
                    format!(
                        "Expected {} columns but found {}",
                        columns.width,
                        values.len()
                    ),
                ));
                continue;
            }

            let row_class = values[columns.class_name].trim();
            match &class_name {
                None => {
                    if row_class.is_empty() {
                        errors.push(ParseError::new(line, "Class name is empty"));
                    }
                    class_name = Some(row_class.to_string());
                    grade = columns
                        .grade
                        .and_then(|i| non_blank(&values[i]))
                        .map(str::to_string);
                }
                Some(expected) => {
                    if !row_class.is_empty() && row_class != expected {
                        errors.push(ParseError::new(
                            line,
                            format!(
                                "Class name mismatch: expected \"{}\" but found \"{}\"",
                                expected, row_class
                            ),
                        ));
                    }
                }
            }

            let Some(name) = non_blank(&values[columns.student_name]) else {
                errors.push(ParseError::new(line, "Student name is empty"));
                continue;
            };

            let email = columns
                .student_email
                .and_then(|i| non_blank(&values[i]))
                .map(str::to_string);
            if let Some(ref e) = email {
                if !is_valid_email(e) {
                    errors.push(ParseError::new(
                        line,
                        format!("Invalid email format \"{}\"", e),
                    ));
                }
            }

            let id = columns
                .student_id
                .and_then(|i| non_blank(&values[i]))
                .map(str::to_string)
                .unwrap_or_else(|| format!("stu-{}-{}", stamp, idx));

            students.push(Student {
                id,
                name: name.to_string(),
                email,
            });
        }

        if !errors.is_empty() {
            warn!(errors = errors.len(), "roster rejected");
            return Err(ImportError::InvalidRows(errors));
        }

        let class_name = class_name.unwrap_or_default();
        info!(class = %class_name, students = students.len(), "parsed roster");
        Ok(ParsedClassData {
            class_name,
            grade,
            students,
        })
    }
}

/// Parse with the default (quote-aware) tokenizer.
pub fn parse_roster(csv_content: &str) -> Result<ParsedClassData, ImportError> {
    RosterParser::default().parse(csv_content)
}
