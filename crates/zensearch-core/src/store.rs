use serde::{Deserialize, Serialize};

use crate::model::{Organization, Ticket, User};

/// The three loaded collections, in load order.
///
/// Built once and never mutated afterwards. There is no API for adding or
/// removing records. Duplicate IDs are kept here even though the ID
/// indices only resolve the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStore {
    organizations: Vec<Organization>,
    users: Vec<User>,
    tickets: Vec<Ticket>,
}

impl EntityStore {
    pub fn new(organizations: Vec<Organization>, users: Vec<User>, tickets: Vec<Ticket>) -> Self {
        Self {
            organizations,
            users,
            tickets,
        }
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }
}
