//! Relationship indices.
//!
//! All indices are derived from an [`EntityStore`] in one pass per structure
//! and are never updated afterwards. They store *positions* into the store's
//! collections rather than copies of records:
//!
//! - `organization id -> position` and `user id -> position`, first occurrence
//!   wins when IDs repeat
//! - `organization id -> {user positions}` by `User::organization_id`
//! - `organization id -> {ticket positions}` by `Ticket::organization_id`
//! - `user id -> {ticket positions}` by `Ticket::submitter_id`
//! - `user id -> {ticket positions}` by `Ticket::assignee_id`
//!
//! Bucket keys do not have to resolve to a loaded record; a ticket submitted
//! by an unknown user is still indexed under that user's ID. Positions live
//! in a `RoaringBitmap`, whose ascending iteration is source order.
//!
//! Positions are `u32`, so only the first 2^32 records of a collection are
//! indexed. Records past that limit stay searchable by linear scan but are
//! never returned by an index lookup.

use ahash::AHashMap;
use roaring::RoaringBitmap;

use crate::model::{RecordId, Ticket, User};
use crate::store::EntityStore;

/// Many-valued index from a key to record positions.
#[derive(Debug, Default, Clone)]
pub struct Buckets {
    by_key: AHashMap<RecordId, RoaringBitmap>,
}

impl Buckets {
    fn build<T>(records: &[T], key_of: impl Fn(&T) -> RecordId) -> Self {
        let mut by_key: AHashMap<RecordId, RoaringBitmap> = AHashMap::new();
        for (pos, record) in positions(records) {
            by_key
                .entry(key_of(record))
                .or_insert_with(RoaringBitmap::new)
                .insert(pos);
        }
        Self { by_key }
    }

    /// Resolve the bucket for `key` against its source collection, in source
    /// order. Unknown keys yield an empty list.
    pub fn resolve<'s, T>(&self, key: RecordId, records: &'s [T]) -> Vec<&'s T> {
        let Some(bucket) = self.by_key.get(&key) else {
            return Vec::new();
        };
        bucket
            .iter()
            .filter_map(|pos| records.get(pos as usize))
            .collect()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.by_key.keys().copied()
    }
}

/// Unique index from an ID to the position of its first record.
#[derive(Debug, Default, Clone)]
pub struct IdIndex {
    by_id: AHashMap<RecordId, u32>,
}

impl IdIndex {
    fn build<T>(records: &[T], id_of: impl Fn(&T) -> RecordId) -> Self {
        let mut by_id: AHashMap<RecordId, u32> = AHashMap::with_capacity(records.len());
        for (pos, record) in positions(records) {
            by_id.entry(id_of(record)).or_insert(pos);
        }
        Self { by_id }
    }

    pub fn resolve<'s, T>(&self, id: RecordId, records: &'s [T]) -> Option<&'s T> {
        let pos = *self.by_id.get(&id)?;
        records.get(pos as usize)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Every precomputed lookup structure, derived once from a store.
#[derive(Debug, Default, Clone)]
pub struct Indices {
    pub organizations_by_id: IdIndex,
    pub users_by_id: IdIndex,
    pub users_by_organization: Buckets,
    pub tickets_by_organization: Buckets,
    pub tickets_by_submitter: Buckets,
    pub tickets_by_assignee: Buckets,
}

impl Indices {
    pub fn build(store: &EntityStore) -> Self {
        let indices = Self {
            organizations_by_id: IdIndex::build(store.organizations(), |o| o.id),
            users_by_id: IdIndex::build(store.users(), |u| u.id),
            users_by_organization: Buckets::build(store.users(), |u: &User| u.organization_id),
            tickets_by_organization: Buckets::build(store.tickets(), |t: &Ticket| {
                t.organization_id
            }),
            tickets_by_submitter: Buckets::build(store.tickets(), |t: &Ticket| t.submitter_id),
            tickets_by_assignee: Buckets::build(store.tickets(), |t: &Ticket| t.assignee_id),
        };

        for (collection, len) in [
            ("organizations", store.organizations().len()),
            ("users", store.users().len()),
            ("tickets", store.tickets().len()),
        ] {
            let skipped = unindexed(len);
            if skipped > 0 {
                tracing::warn!(
                    collection,
                    skipped,
                    "collection exceeds the index position range; extra records are only reachable by search"
                );
            }
        }

        let shadowed_orgs = store.organizations().len() - indices.organizations_by_id.len();
        let shadowed_users = store.users().len() - indices.users_by_id.len();
        if shadowed_orgs > 0 || shadowed_users > 0 {
            tracing::warn!(
                organizations = shadowed_orgs,
                users = shadowed_users,
                "duplicate IDs: only the first record per ID is reachable by ID lookup"
            );
        }
        tracing::debug!(
            org_user_keys = indices.users_by_organization.len(),
            org_ticket_keys = indices.tickets_by_organization.len(),
            submitter_keys = indices.tickets_by_submitter.len(),
            assignee_keys = indices.tickets_by_assignee.len(),
            "built relationship indices"
        );

        indices
    }
}

const MAX_INDEXED_RECORDS: u64 = u32::MAX as u64 + 1;

/// Records paired with their bitmap position. Stops at the last `u32`.
fn positions<T>(records: &[T]) -> impl Iterator<Item = (u32, &T)> {
    (0..=u32::MAX).zip(records)
}

/// How many records of a collection of `len` fall outside the indices.
fn unindexed(len: usize) -> u64 {
    (len as u64).saturating_sub(MAX_INDEXED_RECORDS)
}
