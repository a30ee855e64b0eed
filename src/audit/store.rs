//! Audit store contract and an in-memory implementation

use std::sync::RwLock;

use super::entity::EntityIdentity;
use super::record::{AuditDraft, AuditId, AuditRecord};
use crate::error::{AuditError, AuditResult};

/// Durable home of audit records
///
/// `create` must persist every draft field verbatim and assign a unique id.
/// It is all-or-nothing: on error no record exists.
pub trait AuditStore: Send + Sync {
    /// Persist a draft, returning the durable record
    fn create(&self, draft: AuditDraft) -> AuditResult<AuditRecord>;

    /// Every audit of one entity, oldest first
    fn audits_for(&self, identity: &EntityIdentity) -> AuditResult<Vec<AuditRecord>>;

    /// Look up a single record
    fn find(&self, id: AuditId) -> AuditResult<Option<AuditRecord>>;
}

/// Audit store held in process memory
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, oldest first
    pub fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        let records = self.records.read().map_err(|e| {
            AuditError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(records.clone())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for MemoryAuditStore {
    fn create(&self, draft: AuditDraft) -> AuditResult<AuditRecord> {
        let mut records = self.records.write().map_err(|e| {
            AuditError::Persistence(format!("Failed to acquire write lock: {}", e))
        })?;

        let record = AuditRecord::from_draft(draft);
        records.push(record.clone());
        Ok(record)
    }

    fn audits_for(&self, identity: &EntityIdentity) -> AuditResult<Vec<AuditRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.is_for(identity))
            .collect())
    }

    fn find(&self, id: AuditId) -> AuditResult<Option<AuditRecord>> {
        Ok(self.records()?.into_iter().find(|r| r.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entity::Attributes;
    use crate::audit::event::LifecycleEvent;
    use serde_json::json;

    fn draft(entity_type: &str, id: &str) -> AuditDraft {
        AuditDraft {
            old_values: Attributes::new(),
            new_values: json!({"name": "A"}).as_object().cloned().unwrap(),
            event: LifecycleEvent::Created,
            auditable_id: id.to_string(),
            auditable_type: entity_type.to_string(),
            actor_id: None,
            actor_type: None,
            origin_url: "console".to_string(),
            client_address: None,
            client_agent: None,
        }
    }

    #[test]
    fn test_create_persists_verbatim() {
        let store = MemoryAuditStore::new();
        let record = store.create(draft("people", "1")).unwrap();

        assert_eq!(record.draft, draft("people", "1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find(record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = MemoryAuditStore::new();
        let a = store.create(draft("people", "1")).unwrap();
        let b = store.create(draft("people", "1")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_audits_for_filters_by_identity() {
        let store = MemoryAuditStore::new();
        store.create(draft("people", "1")).unwrap();
        store.create(draft("people", "2")).unwrap();
        store.create(draft("orders", "1")).unwrap();
        store.create(draft("people", "1")).unwrap();

        let audits = store
            .audits_for(&EntityIdentity::new("people", "1"))
            .unwrap();
        assert_eq!(audits.len(), 2);
        assert!(audits.iter().all(|r| r.auditable().id == "1"));
    }

    #[test]
    fn test_find_missing() {
        let store = MemoryAuditStore::new();
        assert!(store.is_empty());
        assert_eq!(store.find(AuditId::new()).unwrap(), None);
    }
}
