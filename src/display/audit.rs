//! Audit record display formatting
//!
//! Formats audit records for terminal output in table and detail views.

use crate::audit::{generate_detailed_diff, AuditRecord};

/// Format a list of audit records as a table
pub fn format_audit_list(records: &[AuditRecord]) -> String {
    if records.is_empty() {
        return "No audit records found.".to_string();
    }

    let auditable: Vec<String> = records
        .iter()
        .map(|r| r.auditable().to_string())
        .collect();
    let actors: Vec<String> = records
        .iter()
        .map(|r| r.actor().map_or_else(|| "-".to_string(), |actor| actor.to_string()))
        .collect();

    let auditable_width = auditable.iter().map(|s| s.len()).max().unwrap_or(6).max(6);
    let actor_width = actors.iter().map(|s| s.len()).max().unwrap_or(5).max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<20}  {:<8}  {:<auditable_width$}  {:<actor_width$}  {}\n",
        "ID",
        "Created",
        "Event",
        "Entity",
        "Actor",
        "Fields",
        auditable_width = auditable_width,
        actor_width = actor_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<20}  {:-<8}  {:-<auditable_width$}  {:-<actor_width$}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        auditable_width = auditable_width,
        actor_width = actor_width,
    ));

    for ((record, entity), actor) in records.iter().zip(&auditable).zip(&actors) {
        output.push_str(&format!(
            "{:<12}  {:<20}  {:<8}  {:<auditable_width$}  {:<actor_width$}  {}\n",
            record.id.to_string(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.event().as_str(),
            entity,
            actor,
            record.modified().modified_keys().join(","),
            auditable_width = auditable_width,
            actor_width = actor_width,
        ));
    }

    output.push_str(&format!("\n{} record(s)\n", records.len()));
    output
}

/// Format one audit record in detail
pub fn format_audit_details(record: &AuditRecord, detailed: bool) -> String {
    let mut output = record.format_human_readable();
    output.push('\n');

    if detailed {
        let old = serde_json::Value::Object(record.old_values().clone());
        let new = serde_json::Value::Object(record.new_values().clone());
        for change in generate_detailed_diff(&old, &new) {
            output.push_str(&format!("    {}\n", change));
        }
    }

    output
}
