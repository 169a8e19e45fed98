//! Linear scans over a single collection.
//!
//! There is no auxiliary index for arbitrary fields and no result cache: every
//! query compiles a predicate and filters the collection in order.

use crate::error::Result;
use crate::field::Searchable;
use crate::matcher::Predicate;

/// Records of `records` whose `field_name` matches `value`, in source order.
///
/// Fails before scanning when the field is unknown or the literal does not
/// parse for the field's kind, so an error never yields a partial result.
pub fn search<'s, E: Searchable>(records: &'s [E], field_name: &str, value: &str) -> Result<Vec<&'s E>> {
    let predicate = Predicate::<E>::compile(field_name, value)?;
    let hits: Vec<&E> = records.iter().filter(|r| predicate.matches(r)).collect();
    tracing::debug!(
        kind = %E::KIND,
        field = predicate.field().name,
        scanned = records.len(),
        matched = hits.len(),
        "search"
    );
    Ok(hits)
}
