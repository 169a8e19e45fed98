//! Record types for the three entity collections.
//!
//! Field names on the wire follow the helpdesk export format (`_id`,
//! `external_id`, ...). Any key missing from a record deserializes to its zero
//! value, and so does a key whose value is `null`. A key carrying any other
//! wrong JSON type is still a load error.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Integer identifier shared by organizations and users.
pub type RecordId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub details: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shared_tickets: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub shared: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub locale: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_login_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub signature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub suspended: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    /// Not enforced: may name an organization that was never loaded.
    #[serde(deserialize_with = "null_as_default")]
    pub organization_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    /// Tickets are keyed by an opaque string, unlike organizations and users.
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub ticket_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub has_incidents: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub due_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub submitter_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub assignee_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub via: String,
}

/// Reads JSON `null` as the field's zero value, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Entity kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Organization,
    User,
    Ticket,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Organization,
        EntityKind::User,
        EntityKind::Ticket,
    ];

    /// The token used to select this kind in a query (`org`, `user`, `ticket`).
    pub fn token(self) -> &'static str {
        match self {
            EntityKind::Organization => "org",
            EntityKind::User => "user",
            EntityKind::Ticket => "ticket",
        }
    }

    /// Type name used in diagnostics (`Organization.Tags`).
    pub fn type_name(self) -> &'static str {
        match self {
            EntityKind::Organization => "Organization",
            EntityKind::User => "User",
            EntityKind::Ticket => "Ticket",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for EntityKind {
    type Err = SearchError;

    /// Tokens are matched exactly; callers lower-case user input first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "org" => Ok(EntityKind::Organization),
            "user" => Ok(EntityKind::User),
            "ticket" => Ok(EntityKind::Ticket),
            other => Err(SearchError::UnknownEntityKind {
                token: other.to_string(),
            }),
        }
    }
}
