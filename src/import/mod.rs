// src/import/mod.rs

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::{fs, path::Path};
use tracing::{error, info, instrument, warn};

use crate::{
    roster::{validate, ParsedClassData, RosterParser, Tokenizer},
    store::{ClassRecord, ClassStore, NewClass},
};

/// Where a confirmed roster goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitTarget {
    /// Create a new class from the roster.
    NewClass,
    /// Add the roster's students to an existing class.
    Existing(String),
}

/// Stage of one upload.
#[derive(Clone, Debug, PartialEq)]
pub enum ImportState {
    /// Waiting for a file. Holds the parse failure of the last attempt, if any.
    Upload { last_error: Option<String> },
    /// Parsed, but the roster failed semantic checks.
    Invalid { errors: Vec<String> },
    /// Parsed and valid; waiting for confirmation.
    Ready { data: ParsedClassData },
    Committed { class: ClassRecord },
    /// The store rejected the commit. The roster is kept so it can be retried.
    CommitFailed { message: String, data: ParsedClassData },
}

impl ImportState {
    pub fn as_str(&self) -> &str {
        match self {
            ImportState::Upload { .. } => "upload",
            ImportState::Invalid { .. } => "invalid",
            ImportState::Ready { .. } => "ready",
            ImportState::Committed { .. } => "committed",
            ImportState::CommitFailed { .. } => "commit_failed",
        }
    }
}

/// Drives upload -> parse -> validate -> confirm -> commit for one roster.
#[derive(Debug)]
pub struct ImportSession {
    parser: RosterParser,
    state: ImportState,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new(Tokenizer::default())
    }
}

impl ImportSession {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            parser: RosterParser::new(tokenizer),
            state: ImportState::Upload { last_error: None },
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = ImportState::Upload { last_error: None };
    }

    /// Parse and validate `csv_content`, replacing whatever was loaded before.
    #[instrument(level = "info", skip(self, csv_content), fields(bytes = csv_content.len()))]
    pub fn load(&mut self, csv_content: &str) -> &ImportState {
        self.state = match self.parser.parse(csv_content) {
            Err(e) => {
                warn!(error = %e, "parse failed");
                ImportState::Upload {
                    last_error: Some(e.to_string()),
                }
            }
            Ok(data) => {
                let errors = validate(&data);
                if errors.is_empty() {
                    info!(class = %data.class_name, students = data.students.len(), "roster ready");
                    ImportState::Ready { data }
                } else {
                    warn!(errors = errors.len(), "roster failed validation");
                    ImportState::Invalid { errors }
                }
            }
        };
        &self.state
    }

    /// Read `path` (invalid UTF-8 is replaced) and [`load`](Self::load) it.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&ImportState> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.load(&text))
    }

    /// Commit the loaded roster to `store`.
    ///
    /// Only valid from `Ready` or `CommitFailed`. Store failures move the
    /// session to `CommitFailed` and are not returned as `Err`.
    #[instrument(level = "info", skip(self, store))]
    pub fn confirm(&mut self, store: &dyn ClassStore, target: CommitTarget) -> Result<&ImportState> {
        let data = match &self.state {
            ImportState::Ready { data } | ImportState::CommitFailed { data, .. } => data.clone(),
            other => bail!("nothing to commit: import is in the {} state", other.as_str()),
        };

        self.state = match commit(store, data.clone(), &target) {
            Ok(class) => {
                info!(class_id = %class.id, students = class.students.len(), "roster committed");
                ImportState::Committed { class }
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "commit failed");
                ImportState::CommitFailed {
                    message: format!("{:#}", e),
                    data,
                }
            }
        };
        Ok(&self.state)
    }
}

fn commit(store: &dyn ClassStore, data: ParsedClassData, target: &CommitTarget) -> Result<ClassRecord> {
    match target {
        CommitTarget::NewClass => store.append(NewClass::from(data)).context("creating class"),
        CommitTarget::Existing(id) => {
            let mut class = store
                .get(id)
                .with_context(|| format!("loading class {}", id))?
                .with_context(|| format!("class {} not found", id))?;
            class.students.extend(data.students);
            if class.grade.is_none() {
                class.grade = data.grade;
            }
            class.updated_at = Utc::now();
            store
                .update(class.clone())
                .with_context(|| format!("updating class {}", id))?;
            Ok(class)
        }
    }
}
