// src/roster/tokenize.rs

use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

use super::utils::clean_str;

/// How a single CSV line is split into cleaned fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tokenizer {
    /// Quote-aware: `"Doe, John"` stays one field and `""` is an escaped quote.
    #[default]
    Quoted,
    /// Split on every comma. Matches exports produced by the legacy importer.
    Naive,
}

impl Tokenizer {
    pub fn as_str(&self) -> &str {
        match self {
            Tokenizer::Quoted => "quoted",
            Tokenizer::Naive => "naive",
        }
    }

    /// Split one line into trimmed tokens. The naive split also strips one
    /// pair of outer quotes; the quoted split leaves unquoting to `csv`.
    pub fn split_line(&self, line: &str) -> Vec<String> {
        match self {
            Tokenizer::Naive => line.split(',').map(clean_str).collect(),
            Tokenizer::Quoted => split_quoted(line),
        }
    }
}

impl FromStr for Tokenizer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quoted" | "csv" => Ok(Tokenizer::Quoted),
            "naive" => Ok(Tokenizer::Naive),
            _ => Err(anyhow!("unknown tokenizer {:?} (expected quoted or naive)", s)),
        }
    }
}

fn split_quoted(line: &str) -> Vec<String> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match rdr.read_record(&mut record) {
        Ok(true) => record.iter().map(|f| f.trim().to_string()).collect(),
        Ok(false) => vec![String::new()],
        Err(e) => {
            // only reachable on malformed UTF-8, which &str rules out
            trace!(error = %e, "quoted split failed, falling back to naive split");
            Tokenizer::Naive.split_line(line)
        }
    }
}

/// Non-blank lines of `text`, each paired with its 1-based line number in the
/// input. Any trailing `\r` is removed.
pub fn split_lines(text: &str) -> Vec<(usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(i, l)| (i + 1, l.strip_suffix('\r').unwrap_or(l)))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_split_breaks_quoted_commas() {
        let toks = Tokenizer::Naive.split_line(r#""Math 101","Doe, John",x"#);
        assert_eq!(toks, vec!["Math 101", "\"Doe", "John\"", "x"]);
    }

    #[test]
    fn quoted_split_keeps_quoted_commas() {
        let toks = Tokenizer::Quoted.split_line(r#""Math 101","Doe, John","say ""hi""""#);
        assert_eq!(toks, vec!["Math 101", "Doe, John", "say \"hi\""]);
    }

    #[test]
    fn quoted_split_keeps_escaped_outer_quotes() {
        let toks = Tokenizer::Quoted.split_line(r#""""Doe""", "Jane" ,x"#);
        assert_eq!(toks[0], "\"Doe\"");
        assert_eq!(toks[2], "x");
        assert_eq!(Tokenizer::Naive.split_line(r#""Jane""#), vec!["Jane"]);
    }

    #[test]
    fn empty_fields_are_kept() {
        assert_eq!(Tokenizer::Quoted.split_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(Tokenizer::Naive.split_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(Tokenizer::Quoted.split_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn lines_drop_blanks_and_carriage_returns() {
        let lines = split_lines("h1,h2\r\na,b\r\n\r\n  \nc,d\n");
        assert_eq!(lines, vec![(1, "h1,h2"), (2, "a,b"), (5, "c,d")]);
    }

    #[test]
    fn tokenizer_names_round_trip() {
        for t in [Tokenizer::Quoted, Tokenizer::Naive] {
            assert_eq!(t.as_str().parse::<Tokenizer>().ok(), Some(t));
        }
        assert_eq!(" CSV ".parse::<Tokenizer>().ok(), Some(Tokenizer::Quoted));
        let err = "fancy".parse::<Tokenizer>().unwrap_err();
        assert!(err.to_string().contains("unknown tokenizer \"fancy\""));
    }
}
