use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Key used for duplicate detection: trimmed and lowercased.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// `Some(trimmed)` for non-blank input.
pub fn non_blank(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_str() {
        assert_eq!(clean_str("  \"Math 101\" "), "Math 101");
        assert_eq!(clean_str("plain"), "plain");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str("\"\""), "");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("a.b+c@school.edu.au"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Jane SMITH "), "jane smith");
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(" x "), Some("x"));
    }
}
