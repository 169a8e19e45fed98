//! Human-readable and JSON reports for materialized search results.

use anyhow::Result;

use zensearch_core::{
    describe_fields, ContextStats, EntityKind, FieldValue, Materialized, Organization,
    OrganizationView, Ticket, TicketView, User, UserView,
};

#[derive(Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        self.lines.push(format!("{}{}", "\t".repeat(indent), text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn heading(&mut self, indent: usize, title: &str) {
        self.line(indent, title);
        self.line(indent, "-".repeat(title.len()));
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn list(items: &[String]) -> String {
    FieldValue::List(items).to_string()
}

pub fn render_text(results: &Materialized<'_>) -> String {
    let mut report = Report::default();
    report.blank();
    match results {
        Materialized::Organizations(views) => {
            report.heading(0, "ORGS");
            if views.is_empty() {
                report.line(0, "<No results found>");
            }
            for view in views {
                write_organization_view(&mut report, view);
            }
        }
        Materialized::Users(views) => {
            report.heading(0, "USERS");
            if views.is_empty() {
                report.line(0, "<No results found>");
            }
            for view in views {
                write_user_view(&mut report, view);
            }
        }
        Materialized::Tickets(views) => {
            report.heading(0, "TICKETS");
            if views.is_empty() {
                report.line(0, "<No results found>");
            }
            for view in views {
                write_ticket_view(&mut report, view);
            }
        }
    }
    report.finish()
}

pub fn render_json(results: &Materialized<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Searchable fields of each kind in `kinds`, one per line.
pub fn render_fields(kinds: &[EntityKind]) -> String {
    let mut report = Report::default();
    for &kind in kinds {
        report.line(0, format!("{} ({kind}):", kind.type_name()));
        for info in describe_fields(kind) {
            report.line(1, format!("{:<18} {}", info.name, info.kind));
        }
    }
    report.finish()
}

pub fn render_stats(stats: &ContextStats) -> String {
    let mut report = Report::default();
    report.line(0, format!("organizations: {}", stats.organizations));
    report.line(0, format!("users:         {}", stats.users));
    report.line(0, format!("tickets:       {}", stats.tickets));
    report.line(
        0,
        format!(
            "indexed ids:   {} organizations, {} users",
            stats.indexed_organization_ids, stats.indexed_user_ids
        ),
    );
    report.line(
        0,
        format!(
            "buckets:       {} orgs with users, {} orgs with tickets, {} submitters, {} assignees",
            stats.organizations_with_users,
            stats.organizations_with_tickets,
            stats.submitters,
            stats.assignees
        ),
    );
    report.finish()
}

// ============================================================================
// Views
// ============================================================================

fn write_organization_view(report: &mut Report, view: &OrganizationView<'_>) {
    report.blank();
    write_organization(report, 0, view.organization);

    report.blank();
    report.heading(1, "ASSOCIATED USERS");
    if view.associated_users.is_empty() {
        report.line(1, "<No associated users found for this organization>");
    }
    for user in &view.associated_users {
        report.blank();
        write_user(report, 1, user);
    }

    report.blank();
    report.heading(1, "ASSOCIATED TICKETS");
    if view.associated_tickets.is_empty() {
        report.line(1, "<No associated tickets found for this organization>");
    }
    for ticket in &view.associated_tickets {
        report.blank();
        write_ticket(report, 1, ticket);
    }
}

fn write_user_view(report: &mut Report, view: &UserView<'_>) {
    report.blank();
    write_user(report, 0, view.user);

    report.blank();
    report.heading(1, "ASSOCIATED ORGANIZATION");
    match view.organization {
        Some(org) => {
            report.blank();
            write_organization(report, 1, org);
        }
        None => report.line(1, "<No organization found for this user>"),
    }

    report.blank();
    report.heading(1, "TICKETS (SUBMITTED)");
    if view.submitted_tickets.is_empty() {
        report.line(1, "<No submitted tickets found for this user>");
    }
    for ticket in &view.submitted_tickets {
        report.blank();
        write_ticket(report, 1, ticket);
    }

    report.blank();
    report.heading(1, "TICKETS (ASSIGNED)");
    if view.assigned_tickets.is_empty() {
        report.line(1, "<No assigned tickets found for this user>");
    }
    for ticket in &view.assigned_tickets {
        report.blank();
        write_ticket(report, 1, ticket);
    }
}

fn write_ticket_view(report: &mut Report, view: &TicketView<'_>) {
    report.blank();
    write_ticket(report, 0, view.ticket);

    report.blank();
    report.heading(1, "ASSOCIATED ORGANIZATION");
    match view.organization {
        Some(org) => {
            report.blank();
            write_organization(report, 1, org);
        }
        None => report.line(1, "<No organization found for this ticket>"),
    }

    for (title, user, missing) in [
        ("SUBMITTER", view.submitter, "<No submitter found for this ticket>"),
        ("ASSIGNEE", view.assignee, "<No assignee found for this ticket>"),
    ] {
        report.blank();
        report.heading(1, title);
        match user {
            Some(user) => {
                report.blank();
                write_user(report, 1, user);
            }
            None => report.line(1, missing),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

fn write_organization(report: &mut Report, indent: usize, org: &Organization) {
    report.line(indent, format!("Organization ID: {}", org.id));
    report.line(indent, format!("Name: {}", org.name));
    report.line(indent, format!("URL: {}", org.url));
    report.line(indent, format!("External ID: {}", org.external_id));
    report.line(indent, format!("Domain Names: {}", list(&org.domain_names)));
    report.line(indent, format!("Created At: {}", org.created_at));
    report.line(indent, format!("Details: {}", org.details));
    report.line(indent, format!("Shared Tickets: {}", org.shared_tickets));
    report.line(indent, format!("Tags: {}", list(&org.tags)));
}

fn write_user(report: &mut Report, indent: usize, user: &User) {
    report.line(indent, format!("ID: {}", user.id));
    report.line(indent, format!("Name: {}", user.name));
    report.line(indent, format!("URL: {}", user.url));
    report.line(indent, format!("External ID: {}", user.external_id));
    report.line(indent, format!("Alias: {}", user.alias));
    report.line(indent, format!("Created At: {}", user.created_at));
    report.line(indent, format!("Active: {}", user.active));
    report.line(indent, format!("Verified: {}", user.verified));
    report.line(indent, format!("Shared: {}", user.shared));
    report.line(indent, format!("Locale: {}", user.locale));
    report.line(indent, format!("Time Zone: {}", user.timezone));
    report.line(indent, format!("Last Login At: {}", user.last_login_at));
    report.line(indent, format!("Email: {}", user.email));
    report.line(indent, format!("Phone: {}", user.phone));
    report.line(indent, format!("Signature: {}", user.signature));
    report.line(indent, format!("Tags: {}", list(&user.tags)));
    report.line(indent, format!("Suspended: {}", user.suspended));
    report.line(indent, format!("Role: {}", user.role));
    report.line(indent, format!("Organization: {}", user.organization_id));
}

fn write_ticket(report: &mut Report, indent: usize, ticket: &Ticket) {
    report.line(indent, format!("Ticket ID: {}", ticket.id));
    report.line(indent, format!("URL: {}", ticket.url));
    report.line(indent, format!("External ID: {}", ticket.external_id));
    report.line(indent, format!("Created At: {}", ticket.created_at));
    report.line(indent, format!("Priority: {}", ticket.priority));
    report.line(indent, format!("Status: {}", ticket.status));
    report.line(indent, format!("Type: {}", ticket.ticket_type));
    report.line(indent, format!("Subject: {}", ticket.subject));
    report.line(indent, format!("Description: {}", ticket.description));
    report.line(indent, format!("Tags: {}", list(&ticket.tags)));
    report.line(indent, format!("Organization: {}", ticket.organization_id));
    report.line(indent, format!("Has Incidents: {}", ticket.has_incidents));
    report.line(indent, format!("Due At: {}", ticket.due_at));
    report.line(indent, format!("Submitter: {}", ticket.submitter_id));
    report.line(indent, format!("Assignee: {}", ticket.assignee_id));
    report.line(indent, format!("Via: {}", ticket.via));
}

#[cfg(test)]
mod tests {
    use super::*;
    use zensearch_core::{EntityStore, SearchContext};

    fn context() -> SearchContext {
        let orgs = vec![Organization {
            id: 104,
            name: "Xylar".to_string(),
            tags: vec!["Cherry".to_string(), "Collier".to_string()],
            ..Default::default()
        }];
        let users = vec![User {
            id: 5,
            name: "Loraine Pittman".to_string(),
            organization_id: 104,
            ..Default::default()
        }];
        let tickets = vec![Ticket {
            id: "abc".to_string(),
            organization_id: 104,
            submitter_id: 5,
            assignee_id: 77,
            ..Default::default()
        }];
        SearchContext::new(EntityStore::new(orgs, users, tickets))
    }

    #[test]
    fn empty_results_say_so() {
        let ctx = context();
        let hits = ctx.query(EntityKind::User, "Name", "Nobody").unwrap();
        let text = render_text(&ctx.materialize(&hits));
        assert!(text.contains("USERS\n-----"));
        assert!(text.contains("<No results found>"));
    }

    #[test]
    fn organization_report_lists_associations() {
        let ctx = context();
        let hits = ctx.query(EntityKind::Organization, "ID", "104").unwrap();
        let text = render_text(&ctx.materialize(&hits));
        assert!(text.contains("Organization ID: 104"));
        assert!(text.contains("Tags: [Cherry Collier]"));
        assert!(text.contains("\tName: Loraine Pittman"));
        assert!(text.contains("\tTicket ID: abc"));
    }

    #[test]
    fn absent_references_are_marked() {
        let ctx = context();
        let hits = ctx.query(EntityKind::Ticket, "ID", "abc").unwrap();
        let text = render_text(&ctx.materialize(&hits));
        assert!(text.contains("\tName: Loraine Pittman"));
        assert!(text.contains("<No assignee found for this ticket>"));
    }

    #[test]
    fn json_report_is_an_array_of_views() {
        let ctx = context();
        let hits = ctx.query(EntityKind::User, "ID", "5").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&ctx.materialize(&hits)).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Loraine Pittman");
        assert_eq!(json[0]["organization"]["name"], "Xylar");
        assert_eq!(json[0]["submitted_tickets"][0]["_id"], "abc");
        assert_eq!(json[0]["assigned_tickets"], serde_json::json!([]));
    }

    #[test]
    fn field_listing_names_kind_tags() {
        let text = render_fields(&[EntityKind::Ticket]);
        assert!(text.starts_with("Ticket (ticket):"));
        assert!(text.contains("\tHasIncidents"));
        assert!(text.contains("string list"));
        assert!(!text.contains("Organization (org):"));
    }

    #[test]
    fn stats_report_counts() {
        let text = render_stats(&context().stats());
        assert!(text.contains("organizations: 1"));
        assert!(text.contains("1 submitters, 1 assignees"));
    }
}
