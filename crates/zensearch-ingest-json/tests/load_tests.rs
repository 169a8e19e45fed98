use std::fs;
use std::path::Path;

use anyhow::Result;
use tempfile::tempdir;
use zensearch_ingest_json::{load_store, DataPaths};

fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

#[test]
fn loads_all_three_collections() -> Result<()> {
    let dir = tempdir()?;
    let paths = DataPaths {
        organizations: write(
            dir.path(),
            "organizations.json",
            r#"[{"_id": 101, "name": "Enthaze", "domain_names": ["kage.com"], "shared_tickets": false, "tags": ["Fulton"]}]"#,
        ),
        users: write(
            dir.path(),
            "users.json",
            r#"[{"_id": 1, "name": "Francisca Rasmussen", "organization_id": 101, "active": true}]"#,
        ),
        tickets: write(
            dir.path(),
            "tickets.json",
            r#"[{"_id": "436bf9b0", "subject": "A Catastrophe in Korea (North)", "submitter_id": 1, "assignee_id": 24, "organization_id": 101, "type": "incident"}]"#,
        ),
    };

    let store = load_store(&paths)?;
    assert_eq!(store.organizations()[0].domain_names, vec!["kage.com"]);
    assert!(store.users()[0].active);
    assert_eq!(store.tickets()[0].ticket_type, "incident");
    assert_eq!(store.tickets()[0].assignee_id, 24);
    Ok(())
}

#[test]
fn malformed_collection_fails_the_whole_load() -> Result<()> {
    let dir = tempdir()?;
    let paths = DataPaths {
        organizations: write(dir.path(), "organizations.json", "[]"),
        users: write(dir.path(), "users.json", r#"[{"_id": "one"}]"#),
        tickets: write(dir.path(), "tickets.json", "[]"),
    };

    let err = load_store(&paths).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("users"), "{chain}");
    Ok(())
}

#[test]
fn missing_file_names_the_path() -> Result<()> {
    let dir = tempdir()?;
    let paths = DataPaths {
        organizations: dir.path().join("nope.json"),
        users: write(dir.path(), "users.json", "[]"),
        tickets: write(dir.path(), "tickets.json", "[]"),
    };

    let err = load_store(&paths).unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
    Ok(())
}

#[test]
fn unknown_keys_do_not_fail_the_load() -> Result<()> {
    let dir = tempdir()?;
    let paths = DataPaths {
        organizations: write(dir.path(), "organizations.json", r#"[{"_id": 1, "motto": "x"}]"#),
        users: write(dir.path(), "users.json", "[]"),
        tickets: write(dir.path(), "tickets.json", "[]"),
    };

    let store = load_store(&paths)?;
    assert_eq!(store.organizations().len(), 1);
    Ok(())
}

#[test]
fn null_values_load_as_zero_values() -> Result<()> {
    let dir = tempdir()?;
    let paths = DataPaths {
        organizations: write(
            dir.path(),
            "organizations.json",
            r#"[{"_id": 101, "name": "Enthaze", "tags": null, "details": null}]"#,
        ),
        users: write(
            dir.path(),
            "users.json",
            r#"[{"_id": 1, "organization_id": null, "active": null}]"#,
        ),
        tickets: write(
            dir.path(),
            "tickets.json",
            r#"[{"_id": "t1", "submitter_id": 1, "assignee_id": null, "tags": null}]"#,
        ),
    };

    let store = load_store(&paths)?;
    let org = &store.organizations()[0];
    assert!(org.tags.is_empty());
    assert_eq!(org.details, "");
    assert_eq!(store.users()[0].organization_id, 0);
    assert!(!store.users()[0].active);

    let ticket = &store.tickets()[0];
    assert_eq!(ticket.submitter_id, 1);
    assert_eq!(ticket.assignee_id, 0);
    assert!(ticket.tags.is_empty());
    Ok(())
}
