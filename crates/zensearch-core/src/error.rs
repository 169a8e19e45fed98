use thiserror::Error;

use crate::field::FieldKind;
use crate::model::EntityKind;

/// Query-local failures. None of these touch the store or the indices, so a
/// caller can report them and keep serving queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no such field: {kind}.{field}")]
    FieldNotFound { kind: &'static str, field: String },

    #[error(
        "invalid search value for boolean field: {kind}.{field} is a {field_kind} field and search value ({value}) must be boolean (true/false)"
    )]
    InvalidBooleanLiteral {
        kind: &'static str,
        field: &'static str,
        field_kind: FieldKind,
        value: String,
    },

    #[error(
        "invalid search value for integer field: {kind}.{field} is a {field_kind} field and search value ({value}) is not an integer"
    )]
    InvalidIntegerLiteral {
        kind: &'static str,
        field: &'static str,
        field_kind: FieldKind,
        value: String,
    },

    #[error("invalid search type: {token} (expected one of org, user, ticket)")]
    UnknownEntityKind { token: String },
}

impl SearchError {
    pub(crate) fn field_not_found(kind: EntityKind, field: &str) -> Self {
        SearchError::FieldNotFound {
            kind: kind.type_name(),
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
