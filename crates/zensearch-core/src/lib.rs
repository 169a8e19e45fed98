//! zensearch core: ad hoc field search over organizations, users and tickets.
//!
//! The pieces, leaves first:
//! 1. **Store**: the three collections, loaded once and read-only afterwards
//! 2. **Indices**: ID lookups and relationship buckets derived from the store
//! 3. **Field tables**: per-kind `name -> (getter, kind tag)` registrations
//! 4. **Matcher**: one compiled predicate per query, dispatched on the kind tag
//! 5. **Search**: a linear, order-preserving scan of one collection
//! 6. **Materializer**: joins hits against the indices
//!
//! [`SearchContext`] owns the store and its indices. It is built once at
//! startup and passed by reference; queries never mutate it, so it can be
//! shared between threads without locking.

pub mod error;
pub mod field;
pub mod index;
pub mod materialize;
pub mod matcher;
pub mod model;
pub mod search;
pub mod store;

use serde::Serialize;

pub use error::{Result, SearchError};
pub use field::{describe_fields, FieldInfo, FieldKind, FieldValue, Searchable};
pub use index::{Buckets, IdIndex, Indices};
pub use materialize::{Materializer, OrganizationView, TicketView, UserView};
pub use matcher::{matches, Predicate};
pub use model::{EntityKind, Organization, RecordId, Ticket, User};
pub use store::EntityStore;

/// Search hits for one query, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Matches<'a> {
    Organizations(Vec<&'a Organization>),
    Users(Vec<&'a User>),
    Tickets(Vec<&'a Ticket>),
}

impl Matches<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Matches::Organizations(_) => EntityKind::Organization,
            Matches::Users(_) => EntityKind::User,
            Matches::Tickets(_) => EntityKind::Ticket,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Matches::Organizations(hits) => hits.len(),
            Matches::Users(hits) => hits.len(),
            Matches::Tickets(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search hits with their related records attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Materialized<'a> {
    Organizations(Vec<OrganizationView<'a>>),
    Users(Vec<UserView<'a>>),
    Tickets(Vec<TicketView<'a>>),
}

impl Materialized<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Materialized::Organizations(_) => EntityKind::Organization,
            Materialized::Users(_) => EntityKind::User,
            Materialized::Tickets(_) => EntityKind::Ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub organizations: usize,
    pub users: usize,
    pub tickets: usize,
    pub indexed_organization_ids: usize,
    pub indexed_user_ids: usize,
    pub organizations_with_users: usize,
    pub organizations_with_tickets: usize,
    pub submitters: usize,
    pub assignees: usize,
}

/// Store plus derived indices. Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    store: EntityStore,
    indices: Indices,
}

impl SearchContext {
    pub fn new(store: EntityStore) -> Self {
        let indices = Indices::build(&store);
        tracing::info!(
            organizations = store.organizations().len(),
            users = store.users().len(),
            tickets = store.tickets().len(),
            "search context ready"
        );
        Self { store, indices }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn materializer(&self) -> Materializer<'_> {
        Materializer::new(&self.store, &self.indices)
    }

    pub fn search_organizations(&self, field: &str, value: &str) -> Result<Vec<&Organization>> {
        search::search(self.store.organizations(), field, value)
    }

    pub fn search_users(&self, field: &str, value: &str) -> Result<Vec<&User>> {
        search::search(self.store.users(), field, value)
    }

    pub fn search_tickets(&self, field: &str, value: &str) -> Result<Vec<&Ticket>> {
        search::search(self.store.tickets(), field, value)
    }

    /// Dispatch a query to the collection named by `kind`.
    pub fn query(&self, kind: EntityKind, field: &str, value: &str) -> Result<Matches<'_>> {
        Ok(match kind {
            EntityKind::Organization => Matches::Organizations(self.search_organizations(field, value)?),
            EntityKind::User => Matches::Users(self.search_users(field, value)?),
            EntityKind::Ticket => Matches::Tickets(self.search_tickets(field, value)?),
        })
    }

    pub fn materialize<'a>(&'a self, matches: &Matches<'a>) -> Materialized<'a> {
        let m = self.materializer();
        match matches {
            Matches::Organizations(hits) => Materialized::Organizations(m.organizations(hits)),
            Matches::Users(hits) => Materialized::Users(m.users(hits)),
            Matches::Tickets(hits) => Materialized::Tickets(m.tickets(hits)),
        }
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            organizations: self.store.organizations().len(),
            users: self.store.users().len(),
            tickets: self.store.tickets().len(),
            indexed_organization_ids: self.indices.organizations_by_id.len(),
            indexed_user_ids: self.indices.users_by_id.len(),
            organizations_with_users: self.indices.users_by_organization.len(),
            organizations_with_tickets: self.indices.tickets_by_organization.len(),
            submitters: self.indices.tickets_by_submitter.len(),
            assignees: self.indices.tickets_by_assignee.len(),
        }
    }
}
