use anyhow::{anyhow, Result};

pub const SEARCH_FORMAT: &str = "<searchtype> <searchfield> <search value>";

/// One search line, split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Lower-cased entity kind token (`org`, `user`, `ticket`, or anything
    /// else the core will reject).
    pub kind: String,
    pub field: String,
    /// Everything after the field name, trimmed. May be empty; interior
    /// spacing is kept as typed.
    pub value: String,
}

/// Split `org Name Enthaze Corp` into kind, field and value.
///
/// At least a kind and a field are required.
pub fn parse_search_input(line: &str) -> Result<SearchQuery> {
    let line = line.trim();
    let (kind, rest) = split_token(line);
    let (field, value) = split_token(rest);
    if kind.is_empty() || field.is_empty() {
        return Err(anyhow!("invalid search format. Search format: {SEARCH_FORMAT}"));
    }
    Ok(SearchQuery {
        kind: kind.to_lowercase(),
        field: field.to_string(),
        value: value.trim().to_string(),
    })
}

fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}
