//! Field registration tables.
//!
//! Each entity kind registers every searchable field once, as a name, a kind
//! tag and a typed getter. Queries address fields by name at runtime and the
//! matcher only ever sees a [`FieldValue`], so it stays independent of the
//! concrete record type.
//!
//! Names are case-sensitive: `ExternalID` resolves, `externalid` does not.

use serde::Serialize;
use std::fmt;

use crate::error::{Result, SearchError};
use crate::model::{EntityKind, Organization, Ticket, User};

/// Shape of a field value; decides how a search literal is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    StringList,
    Bool,
    Int,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::String => "string",
            FieldKind::StringList => "string list",
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
        })
    }
}

/// A borrowed field value read through a getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    List(&'a [String]),
    Bool(bool),
    Int(i64),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Str(_) => FieldKind::String,
            FieldValue::List(_) => FieldKind::StringList,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
        }
    }
}

/// Lists render as `[a b c]`; string-list matching tokenizes the inner part.
impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(" ")),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
        }
    }
}

/// One row of a registration table.
pub struct FieldDef<E> {
    pub name: &'static str,
    pub kind: FieldKind,
    getter: for<'a> fn(&'a E) -> FieldValue<'a>,
}

impl<E> FieldDef<E> {
    pub fn get<'a>(&self, entity: &'a E) -> FieldValue<'a> {
        (self.getter)(entity)
    }
}

impl<E> fmt::Debug for FieldDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Name and kind of a registered field, for listings and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A record type with a field registration table.
pub trait Searchable: Sized + 'static {
    const KIND: EntityKind;

    fn fields() -> &'static [FieldDef<Self>];

    /// Resolve a field name against this kind's table.
    fn field_def(name: &str) -> Result<&'static FieldDef<Self>> {
        Self::fields()
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| SearchError::field_not_found(Self::KIND, name))
    }
}

/// Read `field_name` from `entity`, together with its kind tag.
pub fn get<'a, E: Searchable>(entity: &'a E, field_name: &str) -> Result<(FieldValue<'a>, FieldKind)> {
    let def = E::field_def(field_name)?;
    Ok((def.get(entity), def.kind))
}

pub fn describe_fields(kind: EntityKind) -> Vec<FieldInfo> {
    fn collect<E: Searchable>() -> Vec<FieldInfo> {
        E::fields()
            .iter()
            .map(|def| FieldInfo {
                name: def.name,
                kind: def.kind,
            })
            .collect()
    }

    match kind {
        EntityKind::Organization => collect::<Organization>(),
        EntityKind::User => collect::<User>(),
        EntityKind::Ticket => collect::<Ticket>(),
    }
}

// ============================================================================
// Registration tables
// ============================================================================

static ORGANIZATION_FIELDS: [FieldDef<Organization>; 9] = [
    FieldDef { name: "ID", kind: FieldKind::Int, getter: |o| FieldValue::Int(o.id) },
    FieldDef { name: "Name", kind: FieldKind::String, getter: |o| FieldValue::Str(&o.name) },
    FieldDef { name: "URL", kind: FieldKind::String, getter: |o| FieldValue::Str(&o.url) },
    FieldDef { name: "ExternalID", kind: FieldKind::String, getter: |o| FieldValue::Str(&o.external_id) },
    FieldDef { name: "DomainNames", kind: FieldKind::StringList, getter: |o| FieldValue::List(&o.domain_names) },
    FieldDef { name: "CreatedAt", kind: FieldKind::String, getter: |o| FieldValue::Str(&o.created_at) },
    FieldDef { name: "Details", kind: FieldKind::String, getter: |o| FieldValue::Str(&o.details) },
    FieldDef { name: "SharedTickets", kind: FieldKind::Bool, getter: |o| FieldValue::Bool(o.shared_tickets) },
    FieldDef { name: "Tags", kind: FieldKind::StringList, getter: |o| FieldValue::List(&o.tags) },
];

static USER_FIELDS: [FieldDef<User>; 19] = [
    FieldDef { name: "ID", kind: FieldKind::Int, getter: |u| FieldValue::Int(u.id) },
    FieldDef { name: "Name", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.name) },
    FieldDef { name: "URL", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.url) },
    FieldDef { name: "ExternalID", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.external_id) },
    FieldDef { name: "Alias", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.alias) },
    FieldDef { name: "CreatedAt", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.created_at) },
    FieldDef { name: "Active", kind: FieldKind::Bool, getter: |u| FieldValue::Bool(u.active) },
    FieldDef { name: "Verified", kind: FieldKind::Bool, getter: |u| FieldValue::Bool(u.verified) },
    FieldDef { name: "Shared", kind: FieldKind::Bool, getter: |u| FieldValue::Bool(u.shared) },
    FieldDef { name: "Locale", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.locale) },
    FieldDef { name: "Timezone", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.timezone) },
    FieldDef { name: "LastLoginAt", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.last_login_at) },
    FieldDef { name: "Email", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.email) },
    FieldDef { name: "Phone", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.phone) },
    FieldDef { name: "Signature", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.signature) },
    FieldDef { name: "Tags", kind: FieldKind::StringList, getter: |u| FieldValue::List(&u.tags) },
    FieldDef { name: "Suspended", kind: FieldKind::Bool, getter: |u| FieldValue::Bool(u.suspended) },
    FieldDef { name: "Role", kind: FieldKind::String, getter: |u| FieldValue::Str(&u.role) },
    FieldDef { name: "OrganizationID", kind: FieldKind::Int, getter: |u| FieldValue::Int(u.organization_id) },
];

static TICKET_FIELDS: [FieldDef<Ticket>; 16] = [
    FieldDef { name: "ID", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.id) },
    FieldDef { name: "URL", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.url) },
    FieldDef { name: "ExternalID", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.external_id) },
    FieldDef { name: "CreatedAt", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.created_at) },
    FieldDef { name: "Priority", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.priority) },
    FieldDef { name: "Status", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.status) },
    FieldDef { name: "Type", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.ticket_type) },
    FieldDef { name: "Subject", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.subject) },
    FieldDef { name: "Description", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.description) },
    FieldDef { name: "Tags", kind: FieldKind::StringList, getter: |t| FieldValue::List(&t.tags) },
    FieldDef { name: "OrganizationID", kind: FieldKind::Int, getter: |t| FieldValue::Int(t.organization_id) },
    FieldDef { name: "HasIncidents", kind: FieldKind::Bool, getter: |t| FieldValue::Bool(t.has_incidents) },
    FieldDef { name: "DueAt", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.due_at) },
    FieldDef { name: "SubmitterID", kind: FieldKind::Int, getter: |t| FieldValue::Int(t.submitter_id) },
    FieldDef { name: "AssigneeID", kind: FieldKind::Int, getter: |t| FieldValue::Int(t.assignee_id) },
    FieldDef { name: "Via", kind: FieldKind::String, getter: |t| FieldValue::Str(&t.via) },
];

impl Searchable for Organization {
    const KIND: EntityKind = EntityKind::Organization;

    fn fields() -> &'static [FieldDef<Self>] {
        &ORGANIZATION_FIELDS
    }
}

impl Searchable for User {
    const KIND: EntityKind = EntityKind::User;

    fn fields() -> &'static [FieldDef<Self>] {
        &USER_FIELDS
    }
}

impl Searchable for Ticket {
    const KIND: EntityKind = EntityKind::Ticket;

    fn fields() -> &'static [FieldDef<Self>] {
        &TICKET_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_table_consistent<E: Searchable + Default>() {
        let sample = E::default();
        let mut seen = HashSet::new();
        for def in E::fields() {
            assert!(seen.insert(def.name), "duplicate field {}", def.name);
            assert_eq!(def.get(&sample).kind(), def.kind, "kind tag of {}", def.name);
        }
    }

    #[test]
    fn getters_agree_with_kind_tags() {
        assert_table_consistent::<Organization>();
        assert_table_consistent::<User>();
        assert_table_consistent::<Ticket>();
    }

    #[test]
    fn get_reads_typed_values() {
        let org = Organization {
            id: 101,
            name: "Enthaze".to_string(),
            domain_names: vec!["kage.com".to_string(), "ecratic.com".to_string()],
            ..Default::default()
        };

        assert_eq!(get(&org, "ID").unwrap(), (FieldValue::Int(101), FieldKind::Int));
        assert_eq!(get(&org, "Name").unwrap().0, FieldValue::Str("Enthaze"));
        let (names, kind) = get(&org, "DomainNames").unwrap();
        assert_eq!(kind, FieldKind::StringList);
        assert_eq!(names.to_string(), "[kage.com ecratic.com]");
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let user = User::default();
        let err = get(&user, "name").unwrap_err();
        assert_eq!(
            err,
            SearchError::FieldNotFound {
                kind: "User",
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn ticket_id_is_a_string_field() {
        assert_eq!(Ticket::field_def("ID").unwrap().kind, FieldKind::String);
        assert_eq!(User::field_def("ID").unwrap().kind, FieldKind::Int);
    }

    #[test]
    fn describe_lists_every_field_in_table_order() {
        let names: Vec<_> = describe_fields(EntityKind::Organization)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names.first(), Some(&"ID"));
        assert_eq!(names.last(), Some(&"Tags"));
        assert_eq!(describe_fields(EntityKind::User).len(), 19);
        assert_eq!(describe_fields(EntityKind::Ticket).len(), 16);
    }
}
