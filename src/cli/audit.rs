//! Audit log CLI commands
//!
//! Read-only inspection of a JSONL audit log.

use clap::Subcommand;

use crate::audit::{AuditId, AuditRecord, AuditStore, JsonlAuditStore, LifecycleEvent};
use crate::display::{format_audit_details, format_audit_list};
use crate::error::{AuditError, AuditResult};

/// Audit log subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit records, oldest first
    List {
        /// Only records for this entity type
        #[arg(short = 't', long = "type")]
        entity_type: Option<String>,
        /// Only records for this entity id
        #[arg(short, long)]
        id: Option<String>,
        /// Only records for this event (created, updated, deleted, restored)
        #[arg(short, long)]
        event: Option<String>,
        /// Show at most the last N matching records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show one audit record with its changes
    Show {
        /// Audit ID (aud-xxxxxxxx prefix or full UUID)
        audit: String,
        /// Include nested field changes
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Record filter built from `list` arguments
#[derive(Debug, Default)]
pub struct RecordFilter {
    pub entity_type: Option<String>,
    pub id: Option<String>,
    pub event: Option<LifecycleEvent>,
}

impl RecordFilter {
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.entity_type
            .as_deref()
            .map_or(true, |t| record.draft.auditable_type == t)
            && self
                .id
                .as_deref()
                .map_or(true, |id| record.draft.auditable_id == id)
            && self.event.map_or(true, |e| record.event() == e)
    }
}

/// Find a record by full id or by its displayed `aud-xxxxxxxx` form
///
/// A short form shared by several records is an error rather than a guess.
pub fn find_record(store: &JsonlAuditStore, identifier: &str) -> AuditResult<AuditRecord> {
    if let Ok(id) = identifier.parse::<AuditId>() {
        if let Some(record) = store.find(id)? {
            return Ok(record);
        }
    }

    let wanted = identifier.trim();
    let mut matches: Vec<AuditRecord> = store
        .read_all()?
        .into_iter()
        .filter(|r| r.id.to_string() == wanted)
        .collect();

    match matches.len() {
        0 => Err(AuditError::audit_not_found(identifier)),
        1 => Ok(matches.remove(0)),
        n => Err(AuditError::audit_ambiguous(identifier, n)),
    }
}

/// Handle an audit log command
pub fn handle_audit_command(store: &JsonlAuditStore, cmd: AuditCommands) -> AuditResult<()> {
    match cmd {
        AuditCommands::List {
            entity_type,
            id,
            event,
            limit,
        } => {
            let event = event.map(|e| e.parse::<LifecycleEvent>()).transpose()?;
            let filter = RecordFilter {
                entity_type,
                id,
                event,
            };

            let mut records: Vec<AuditRecord> = store
                .read_all()?
                .into_iter()
                .filter(|r| filter.matches(r))
                .collect();

            if let Some(limit) = limit {
                let start = records.len().saturating_sub(limit);
                records.drain(..start);
            }

            print!("{}", format_audit_list(&records));
        }

        AuditCommands::Show { audit, detailed } => {
            let record = find_record(store, &audit)?;
            print!("{}", format_audit_details(&record, detailed));
        }
    }

    Ok(())
}
