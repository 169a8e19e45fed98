//! Single-field predicates.
//!
//! A [`Predicate`] is compiled once per query: the field name is resolved
//! against the registration table and the search literal is parsed for the
//! field's kind. Evaluating it against a record is then infallible.
//!
//! Matching rules by kind:
//! - string: exact, case-sensitive equality
//! - string list: the literal equals any space-delimited token of the list's
//!   rendered form; an element that itself contains a space can never be
//!   matched as a whole (known limitation). Tabs and newlines are not
//!   delimiters.
//! - bool: literal must be `true`/`false` (any case)
//! - int: literal must parse as a base-10 integer
//!
//! An empty literal gets no special treatment.

use crate::error::{Result, SearchError};
use crate::field::{FieldDef, FieldKind, FieldValue, Searchable};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Test {
    Equals(String),
    HasToken(String),
    Bool(bool),
    Int(i64),
}

/// A resolved field plus a parsed search literal.
#[derive(Debug)]
pub struct Predicate<E: 'static> {
    def: &'static FieldDef<E>,
    test: Test,
}

impl<E: Searchable> Predicate<E> {
    pub fn compile(field_name: &str, value: &str) -> Result<Self> {
        let def = E::field_def(field_name)?;
        let test = match def.kind {
            FieldKind::String => Test::Equals(value.to_string()),
            FieldKind::StringList => Test::HasToken(value.to_string()),
            FieldKind::Bool => Test::Bool(parse_bool(value).ok_or_else(|| {
                SearchError::InvalidBooleanLiteral {
                    kind: E::KIND.type_name(),
                    field: def.name,
                    field_kind: def.kind,
                    value: value.to_string(),
                }
            })?),
            FieldKind::Int => Test::Int(value.parse::<i64>().map_err(|_| {
                SearchError::InvalidIntegerLiteral {
                    kind: E::KIND.type_name(),
                    field: def.name,
                    field_kind: def.kind,
                    value: value.to_string(),
                }
            })?),
        };
        Ok(Self { def, test })
    }

    pub fn field(&self) -> &'static FieldDef<E> {
        self.def
    }

    pub fn matches(&self, entity: &E) -> bool {
        match (&self.test, self.def.get(entity)) {
            (Test::Equals(want), FieldValue::Str(have)) => have == want.as_str(),
            (Test::HasToken(want), FieldValue::List(items)) => list_has_token(items, want),
            (Test::Bool(want), FieldValue::Bool(have)) => have == *want,
            (Test::Int(want), FieldValue::Int(have)) => have == *want,
            // Tables are checked to pair each getter with its own kind tag.
            _ => false,
        }
    }
}

/// Evaluate `field_name == value` against one record.
pub fn matches<E: Searchable>(entity: &E, field_name: &str, value: &str) -> Result<bool> {
    Ok(Predicate::<E>::compile(field_name, value)?.matches(entity))
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Token match over the rendered list. Splitting keeps empty tokens, so an
/// empty list (rendered as an empty string) matches the empty literal.
fn list_has_token(items: &[String], want: &str) -> bool {
    let rendered = items.join(" ");
    rendered.split(' ').any(|token| token == want)
}
