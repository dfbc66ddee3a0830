// src/roster/validator.rs

use std::collections::HashSet;
use tracing::{debug, instrument};

use super::{
    types::ParsedClassData,
    utils::{is_valid_email, non_blank, normalize_key},
};

/// Semantic checks over a parsed roster. Empty result means valid.
///
/// Every check runs, and each contributes at most one message, in this order:
/// class name, student count, duplicate names, duplicate emails, email syntax.
#[instrument(level = "debug", skip(data), fields(class = %data.class_name, students = data.students.len()))]
pub fn validate(data: &ParsedClassData) -> Vec<String> {
    let mut errors = Vec::new();

    if non_blank(&data.class_name).is_none() {
        errors.push("Class name is required".to_string());
    }

    if data.students.is_empty() {
        errors.push("At least one student is required".to_string());
    }

    let dup_names = duplicates(data.students.iter().map(|s| s.name.as_str()));
    if !dup_names.is_empty() {
        errors.push(format!(
            "Duplicate student names found: {}",
            dup_names.join(", ")
        ));
    }

    let emails: Vec<&str> = data
        .students
        .iter()
        .filter_map(|s| s.email.as_deref().and_then(non_blank))
        .collect();

    let dup_emails = duplicates(emails.iter().copied());
    if !dup_emails.is_empty() {
        errors.push(format!(
            "Duplicate student emails found: {}",
            dup_emails.join(", ")
        ));
    }

    let invalid: Vec<&str> = emails.into_iter().filter(|e| !is_valid_email(e)).collect();
    if !invalid.is_empty() {
        errors.push(format!("Invalid email addresses: {}", invalid.join(", ")));
    }

    debug!(errors = errors.len(), "validated roster");
    errors
}

/// Normalized values seen more than once, each listed once in first-repeat order.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for v in values {
        let key = normalize_key(v);
        if !seen.insert(key.clone()) && reported.insert(key.clone()) {
            dups.push(key);
        }
    }
    dups
}
