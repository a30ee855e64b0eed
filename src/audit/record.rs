//! Audit record data structures
//!
//! `AuditDraft` is a fully assembled record that has not been persisted yet.
//! `AuditRecord` is what the store hands back: the same fields plus the
//! identity and timestamp the store assigned. Records are never mutated
//! after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

use super::diff::generate_diff;
use super::entity::{Attributes, EntityIdentity, TrackedEntity};
use super::event::LifecycleEvent;

/// Identity of a persisted audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(Uuid);

impl AuditId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aud-{}", &self.0.to_string()[..8])
    }
}

impl From<Uuid> for AuditId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for AuditId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("aud-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An assembled audit record, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDraft {
    pub old_values: Attributes,
    pub new_values: Attributes,
    pub event: LifecycleEvent,
    pub auditable_id: String,
    pub auditable_type: String,
    pub actor_id: Option<String>,
    pub actor_type: Option<String>,
    pub origin_url: String,
    pub client_address: Option<IpAddr>,
    pub client_agent: Option<String>,
}

impl AuditDraft {
    /// Polymorphic reference to the audited entity
    pub fn auditable(&self) -> EntityIdentity {
        EntityIdentity::new(&self.auditable_type, &self.auditable_id)
    }
}

/// A persisted audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,

    /// When the store created the record (UTC)
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub draft: AuditDraft,
}

impl AuditRecord {
    /// Persist-side constructor used by stores
    pub fn from_draft(draft: AuditDraft) -> Self {
        Self {
            id: AuditId::new(),
            created_at: Utc::now(),
            draft,
        }
    }

    pub fn event(&self) -> LifecycleEvent {
        self.draft.event
    }

    pub fn old_values(&self) -> &Attributes {
        &self.draft.old_values
    }

    pub fn new_values(&self) -> &Attributes {
        &self.draft.new_values
    }

    pub fn auditable(&self) -> EntityIdentity {
        self.draft.auditable()
    }

    /// The actor who made the change, when one was resolved
    pub fn actor(&self) -> Option<EntityIdentity> {
        match (&self.draft.actor_type, &self.draft.actor_id) {
            (Some(actor_type), Some(id)) => Some(EntityIdentity::new(actor_type, id)),
            _ => None,
        }
    }

    /// The audited entity rebuilt from the old values; `None` if there are none
    pub fn old_entity(&self) -> Option<TrackedEntity> {
        self.entity_from(&self.draft.old_values)
    }

    /// The audited entity rebuilt from the new values; `None` if there are none
    pub fn new_entity(&self) -> Option<TrackedEntity> {
        self.entity_from(&self.draft.new_values)
    }

    fn entity_from(&self, values: &Attributes) -> Option<TrackedEntity> {
        if values.is_empty() {
            return None;
        }
        Some(TrackedEntity::persisted(
            &self.draft.auditable_type,
            &self.draft.auditable_id,
            values.clone(),
        ))
    }

    /// Whether this record belongs to the given entity
    pub fn is_for(&self, identity: &EntityIdentity) -> bool {
        self.draft.auditable_id == identity.id && self.draft.auditable_type == identity.entity_type
    }

    /// Modified attributes with both sides side by side
    pub fn modified(&self) -> ModifiedAttributes {
        ModifiedAttributes::from_values(&self.draft.old_values, &self.draft.new_values)
    }

    /// Format the record for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.draft.event.as_str().to_uppercase(),
            self.draft.auditable_type,
            self.draft.auditable_id
        );

        if let (Some(actor_type), Some(actor_id)) = (&self.draft.actor_type, &self.draft.actor_id)
        {
            output.push_str(&format!(" by {}#{}", actor_type, actor_id));
        }

        output.push_str(&format!("\n  Origin: {}", self.draft.origin_url));
        if let Some(address) = &self.draft.client_address {
            output.push_str(&format!("\n  Address: {}", address));
        }
        if let Some(agent) = &self.draft.client_agent {
            output.push_str(&format!("\n  Agent: {}", agent));
        }

        let old = serde_json::Value::Object(self.draft.old_values.clone());
        let new = serde_json::Value::Object(self.draft.new_values.clone());
        if let Some(diff) = generate_diff(&old, &new) {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// Old and new value of one modified attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Modification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<serde_json::Value>,
}

/// Per-attribute view over an audit's old and new values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModifiedAttributes(BTreeMap<String, Modification>);

impl ModifiedAttributes {
    pub fn from_values(old: &Attributes, new: &Attributes) -> Self {
        let mut modified: BTreeMap<String, Modification> = BTreeMap::new();

        for (attribute, value) in new {
            modified.entry(attribute.clone()).or_default().new = Some(value.clone());
        }
        for (attribute, value) in old {
            modified.entry(attribute.clone()).or_default().old = Some(value.clone());
        }

        Self(modified)
    }

    /// Names of every modified attribute, sorted
    pub fn modified_keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn get(&self, attribute: &str) -> Option<&Modification> {
        self.0.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
