//! Integration tests for the complete zensearch pipeline
//!
//! These tests run the fixture data set end to end:
//! - JSON files → EntityStore
//! - EntityStore → indices → search
//! - search hits → materialized views
//!
//! Run with: cargo test --test integration_tests

use std::path::PathBuf;

use anyhow::Result;
use zensearch_core::{EntityKind, Matches, Materialized, SearchContext, SearchError};
use zensearch_ingest_json::{load_store, DataPaths};

fn fixture_paths() -> DataPaths {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    DataPaths {
        organizations: dir.join("organizations.json"),
        users: dir.join("users.json"),
        tickets: dir.join("tickets.json"),
    }
}

fn fixture_context() -> SearchContext {
    let store = load_store(&fixture_paths()).expect("load fixtures");
    SearchContext::new(store)
}

fn user_ids(matches: &Matches<'_>) -> Vec<i64> {
    match matches {
        Matches::Users(hits) => hits.iter().map(|u| u.id).collect(),
        other => panic!("expected users, got {:?}", other.kind()),
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_fixtures_load_in_file_order() -> Result<()> {
    let store = load_store(&fixture_paths())?;
    assert_eq!(store.organizations().len(), 5);
    assert_eq!(store.users().len(), 5);
    assert_eq!(store.tickets().len(), 4);

    let names: Vec<_> = store.organizations().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Enthaze", "Nutralab", "Xylar", "Xylar Duplicate", "Qualitern"]
    );
    // `satisfaction_rating` is not part of the ticket model.
    assert_eq!(store.tickets()[3].id, "dangling-ticket");
    Ok(())
}

#[test]
fn test_stats_reflect_indices() {
    let stats = fixture_context().stats();
    assert_eq!(stats.organizations, 5);
    assert_eq!(stats.indexed_organization_ids, 4);
    assert_eq!(stats.indexed_user_ids, 5);
    assert_eq!(stats.organizations_with_users, 3);
    assert_eq!(stats.organizations_with_tickets, 3);
    assert_eq!(stats.submitters, 4);
    assert_eq!(stats.assignees, 4);
}

// ============================================================================
// Search → Materialize
// ============================================================================

#[test]
fn test_organization_with_users_and_tickets() -> Result<()> {
    let ctx = fixture_context();
    let hits = ctx.query(EntityKind::Organization, "Name", "Xylar")?;
    let Materialized::Organizations(views) = ctx.materialize(&hits) else {
        panic!("expected organizations");
    };
    assert_eq!(views.len(), 1);

    let users: Vec<_> = views[0].associated_users.iter().map(|u| u.id).collect();
    assert_eq!(users, vec![2, 3, 5]);
    let tickets: Vec<_> = views[0]
        .associated_tickets
        .iter()
        .map(|t| t.subject.as_str())
        .collect();
    assert_eq!(
        tickets,
        vec!["A Catastrophe in Korea (North)", "A Catastrophe in Micronesia"]
    );
    Ok(())
}

#[test]
fn test_duplicate_ids_scan_both_but_index_first() -> Result<()> {
    let ctx = fixture_context();
    let hits = ctx.query(EntityKind::Organization, "ID", "104")?;
    assert_eq!(hits.len(), 2);

    let hits = ctx.query(EntityKind::User, "ID", "2")?;
    let Materialized::Users(views) = ctx.materialize(&hits) else {
        panic!("expected users");
    };
    assert_eq!(views[0].organization.map(|o| o.name.as_str()), Some("Xylar"));
    Ok(())
}

#[test]
fn test_user_tickets_split_by_role() -> Result<()> {
    let ctx = fixture_context();
    let hits = ctx.query(EntityKind::User, "Name", "Cross Barlow")?;
    let Materialized::Users(views) = ctx.materialize(&hits) else {
        panic!("expected users");
    };
    let view = &views[0];
    assert_eq!(view.submitted_tickets.len(), 1);
    assert_eq!(view.submitted_tickets[0].subject, "A Catastrophe in Korea (North)");
    assert_eq!(view.assigned_tickets.len(), 1);
    assert_eq!(view.assigned_tickets[0].subject, "A Catastrophe in Micronesia");
    Ok(())
}

#[test]
fn test_dangling_ticket_references_resolve_to_nothing() -> Result<()> {
    let ctx = fixture_context();
    let hits = ctx.query(EntityKind::Ticket, "OrganizationID", "112")?;
    let Materialized::Tickets(views) = ctx.materialize(&hits) else {
        panic!("expected tickets");
    };
    assert_eq!(views.len(), 1);
    assert!(views[0].organization.is_none());
    assert!(views[0].submitter.is_none());
    assert!(views[0].assignee.is_none());
    Ok(())
}

#[test]
fn test_list_fields_match_single_tokens() -> Result<()> {
    let ctx = fixture_context();
    assert_eq!(ctx.search_tickets("Tags", "Puerto")?.len(), 1);
    assert_eq!(ctx.search_tickets("Tags", "Rico")?.len(), 1);
    assert!(ctx.search_tickets("Tags", "Puerto Rico")?.is_empty());
    assert_eq!(ctx.search_organizations("DomainNames", "kage.com")?.len(), 1);
    Ok(())
}

#[test]
fn test_empty_literal_finds_blank_values() -> Result<()> {
    let ctx = fixture_context();
    let due: Vec<_> = ctx
        .search_tickets("DueAt", "")?
        .iter()
        .map(|t| t.subject.as_str())
        .collect();
    assert_eq!(due, vec!["A Problem in Morocco"]);

    let hits = ctx.query(EntityKind::User, "Signature", "")?;
    assert_eq!(user_ids(&hits), vec![5]);

    let untagged: Vec<_> = ctx
        .search_organizations("Tags", "")?
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(untagged, vec!["Xylar Duplicate", "Qualitern"]);
    Ok(())
}

#[test]
fn test_bool_and_int_fields() -> Result<()> {
    let ctx = fixture_context();
    let hits = ctx.query(EntityKind::User, "Active", "TRUE")?;
    assert_eq!(user_ids(&hits), vec![1, 2, 5]);

    let hits = ctx.query(EntityKind::User, "OrganizationID", "104")?;
    assert_eq!(user_ids(&hits), vec![2, 3, 5]);

    let err = ctx.query(EntityKind::User, "OrganizationID", "Xylar").unwrap_err();
    assert!(matches!(err, SearchError::InvalidIntegerLiteral { .. }));
    Ok(())
}

#[test]
fn test_context_is_shared_across_threads() {
    let ctx = fixture_context();
    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["101", "102", "104", "106"]
            .into_iter()
            .map(|id| {
                let ctx = &ctx;
                scope.spawn(move || {
                    ctx.query(EntityKind::User, "OrganizationID", id)
                        .map(|hits| hits.len())
                        .unwrap_or_default()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("search thread"))
            .collect()
    });
    assert_eq!(counts, vec![1, 1, 3, 0]);
}
