//! JSON loading for zensearch
//!
//! Each collection is a file holding one JSON array of records:
//! - organizations (`_id`, `name`, `domain_names`, ...)
//! - users (`_id`, `organization_id`, ...)
//! - tickets (`_id`, `submitter_id`, `assignee_id`, ...)
//!
//! Loading is all-or-nothing: any malformed file fails the whole load.
//! Keys the data model does not know about are tolerated and reported once
//! per collection.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zensearch_core::{EntityStore, Organization, Ticket, User};

/// Locations of the three collection files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub organizations: PathBuf,
    pub users: PathBuf,
    pub tickets: PathBuf,
}

/// Load all three collections into a store.
pub fn load_store(paths: &DataPaths) -> Result<EntityStore> {
    let organizations: Vec<Organization> = load_collection(&paths.organizations, "organizations")?;
    let users: Vec<User> = load_collection(&paths.users, "users")?;
    let tickets: Vec<Ticket> = load_collection(&paths.tickets, "tickets")?;
    Ok(EntityStore::new(organizations, users, tickets))
}

pub fn load_collection<T>(path: &Path, collection: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize + Default,
{
    let file = File::open(path)
        .with_context(|| format!("failed to open {collection} data file {}", path.display()))?;
    let records = read_collection(BufReader::new(file), collection)
        .with_context(|| format!("failed to load {collection} from {}", path.display()))?;
    tracing::info!(
        collection,
        path = %path.display(),
        records = records.len(),
        "loaded collection"
    );
    Ok(records)
}

/// Parse one collection from a reader.
pub fn read_collection<T, R>(reader: R, collection: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize + Default,
    R: Read,
{
    let value: Value = serde_json::from_reader(reader)
        .with_context(|| format!("{collection}: invalid JSON"))?;
    if !value.is_array() {
        return Err(anyhow!(
            "{collection}: expected a JSON array of records, found {}",
            json_type_name(&value)
        ));
    }

    let unmapped = discover_unmapped_keys(&value, &known_keys::<T>());
    if !unmapped.is_empty() {
        tracing::warn!(
            collection,
            keys = ?unmapped,
            "records carry keys that are not searchable; they will be ignored"
        );
    }

    serde_json::from_value(value).with_context(|| format!("{collection}: malformed record"))
}

/// Wire keys of `T`, taken from a serialized default record.
pub fn known_keys<T: Serialize + Default>() -> BTreeSet<String> {
    match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map.keys().cloned().collect(),
        _ => BTreeSet::new(),
    }
}

/// Object keys found anywhere in the top-level records of `value` that are
/// not in `known`.
pub fn discover_unmapped_keys(value: &Value, known: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let records: &[Value] = match value {
        Value::Array(items) => items,
        Value::Object(_) => std::slice::from_ref(value),
        _ => return out,
    };
    for record in records {
        let Value::Object(fields) = record else {
            continue;
        };
        for key in fields.keys() {
            if !known.contains(key) {
                out.insert(key.clone());
            }
        }
    }
    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_keys_use_wire_names() {
        let keys = known_keys::<Ticket>();
        assert!(keys.contains("_id"));
        assert!(keys.contains("type"));
        assert!(keys.contains("submitter_id"));
        assert!(!keys.contains("ticket_type"));
    }

    #[test]
    fn unmapped_keys_are_collected_across_records() {
        let value = json!([
            {"_id": 1, "name": "a", "nickname": "x"},
            {"_id": 2, "favourite_colour": "green"},
            "not an object"
        ]);
        let unmapped = discover_unmapped_keys(&value, &known_keys::<User>());
        let unmapped: Vec<_> = unmapped.into_iter().collect();
        assert_eq!(unmapped, vec!["favourite_colour", "nickname"]);
    }

    #[test]
    fn top_level_must_be_an_array() {
        let err = read_collection::<Organization, _>(r#"{"_id": 1}"#.as_bytes(), "organizations")
            .unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn reads_records_in_file_order() {
        let text = r#"[{"_id": 2, "name": "b"}, {"_id": 1, "name": "a"}]"#;
        let orgs: Vec<Organization> = read_collection(text.as_bytes(), "organizations").unwrap();
        let ids: Vec<_> = orgs.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
