//! Attach related records to search hits.
//!
//! Views borrow from the store; nothing here copies or mutates a record.
//! Dangling references (an `organization_id` or `submitter_id` that resolves to
//! nothing) come back as `None` or an empty list, never as an error.

use serde::Serialize;

use crate::index::Indices;
use crate::model::{Organization, Ticket, User};
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationView<'a> {
    #[serde(flatten)]
    pub organization: &'a Organization,
    pub associated_users: Vec<&'a User>,
    pub associated_tickets: Vec<&'a Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView<'a> {
    #[serde(flatten)]
    pub user: &'a User,
    pub organization: Option<&'a Organization>,
    pub submitted_tickets: Vec<&'a Ticket>,
    pub assigned_tickets: Vec<&'a Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketView<'a> {
    #[serde(flatten)]
    pub ticket: &'a Ticket,
    pub submitter: Option<&'a User>,
    pub assignee: Option<&'a User>,
    pub organization: Option<&'a Organization>,
}

/// Joins records against the relationship indices of the store they came from.
#[derive(Debug, Clone, Copy)]
pub struct Materializer<'a> {
    store: &'a EntityStore,
    indices: &'a Indices,
}

impl<'a> Materializer<'a> {
    pub fn new(store: &'a EntityStore, indices: &'a Indices) -> Self {
        Self { store, indices }
    }

    pub fn organization(&self, organization: &'a Organization) -> OrganizationView<'a> {
        OrganizationView {
            organization,
            associated_users: self
                .indices
                .users_by_organization
                .resolve(organization.id, self.store.users()),
            associated_tickets: self
                .indices
                .tickets_by_organization
                .resolve(organization.id, self.store.tickets()),
        }
    }

    pub fn user(&self, user: &'a User) -> UserView<'a> {
        UserView {
            user,
            organization: self
                .indices
                .organizations_by_id
                .resolve(user.organization_id, self.store.organizations()),
            submitted_tickets: self
                .indices
                .tickets_by_submitter
                .resolve(user.id, self.store.tickets()),
            assigned_tickets: self
                .indices
                .tickets_by_assignee
                .resolve(user.id, self.store.tickets()),
        }
    }

    pub fn ticket(&self, ticket: &'a Ticket) -> TicketView<'a> {
        let users = self.store.users();
        TicketView {
            ticket,
            submitter: self.indices.users_by_id.resolve(ticket.submitter_id, users),
            assignee: self.indices.users_by_id.resolve(ticket.assignee_id, users),
            organization: self
                .indices
                .organizations_by_id
                .resolve(ticket.organization_id, self.store.organizations()),
        }
    }

    pub fn organizations(&self, hits: &[&'a Organization]) -> Vec<OrganizationView<'a>> {
        hits.iter().map(|&o| self.organization(o)).collect()
    }

    pub fn users(&self, hits: &[&'a User]) -> Vec<UserView<'a>> {
        hits.iter().map(|&u| self.user(u)).collect()
    }

    pub fn tickets(&self, hits: &[&'a Ticket]) -> Vec<TicketView<'a>> {
        hits.iter().map(|&t| self.ticket(t)).collect()
    }
}
