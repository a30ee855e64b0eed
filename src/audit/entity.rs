//! Auditable entity capability
//!
//! `AuditableEntity` is what the engine needs from a domain object: its
//! identity, its current attributes, which of them changed since they were
//! last persisted and what they were before, and its audit policy.
//!
//! Host types can implement the trait directly, or compose the helpers here:
//!
//! - `TrackedAttributes`: current/original attribute maps with dirty tracking
//! - `AuditPolicy`: include/exclude lists and the auditable event set
//! - `TrackedEntity`: a ready-made entity built from the two above

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::event::LifecycleEvent;
use crate::error::{AuditError, AuditResult};

/// Attribute name to native value
pub type Attributes = Map<String, Value>;

/// Polymorphic reference to an entity: its id plus its type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityIdentity {
    pub id: String,
    pub entity_type: String,
}

impl EntityIdentity {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
        }
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity_type, self.id)
    }
}

/// A domain object whose attribute changes are audited
pub trait AuditableEntity {
    /// Identity of the entity; stable for one audit computation
    fn identity(&self) -> EntityIdentity;

    /// Every attribute currently set on the entity
    fn current_attributes(&self) -> &Attributes;

    /// Attributes changed since the last persisted state, with their current values
    fn dirty_attributes(&self) -> Attributes;

    /// Last persisted value of an attribute
    fn original_value(&self, attribute: &str) -> Option<&Value>;

    /// Attributes included in audits. Empty means all.
    fn audit_include(&self) -> &[String] {
        &[]
    }

    /// Attributes never audited
    fn audit_exclude(&self) -> &[String] {
        &[]
    }

    /// Events that trigger an audit
    fn auditable_events(&self) -> &[LifecycleEvent] {
        &LifecycleEvent::ALL
    }

    /// The event the next audit is for, if any
    fn current_audit_event(&self) -> Option<LifecycleEvent>;

    /// Record (or clear) the event the next audit is for
    fn mark_audit_event(&mut self, event: Option<LifecycleEvent>);

    /// Set the audit event by name.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Configuration` for unknown event names and for
    /// events this entity is not configured to audit.
    fn set_audit_event(&mut self, name: &str) -> AuditResult<()> {
        let event: LifecycleEvent = name.parse()?;

        if !self.auditable_events().contains(&event) {
            return Err(AuditError::Configuration(format!(
                "Event \"{}\" is not auditable for {}",
                event,
                self.identity().entity_type
            )));
        }

        self.mark_audit_event(Some(event));
        Ok(())
    }
}

/// Current and last-persisted attribute maps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedAttributes {
    current: Attributes,
    original: Attributes,
}

impl TrackedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from attributes loaded from storage (nothing dirty)
    pub fn from_persisted(attributes: Attributes) -> Self {
        Self {
            original: attributes.clone(),
            current: attributes,
        }
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.current.insert(attribute.into(), value.into());
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.current.get(attribute)
    }

    pub fn current(&self) -> &Attributes {
        &self.current
    }

    pub fn original_value(&self, attribute: &str) -> Option<&Value> {
        self.original.get(attribute)
    }

    /// Attributes that are new or differ from their original value
    pub fn dirty(&self) -> Attributes {
        self.current
            .iter()
            .filter(|(key, value)| self.original.get(key.as_str()) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.current
            .iter()
            .any(|(key, value)| self.original.get(key.as_str()) != Some(value))
    }

    /// Mark the current state as persisted
    pub fn sync_original(&mut self) {
        self.original = self.current.clone();
    }
}

/// Per-entity audit policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPolicy {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_events")]
    pub events: Vec<LifecycleEvent>,
}

fn default_events() -> Vec<LifecycleEvent> {
    LifecycleEvent::ALL.to_vec()
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            events: default_events(),
        }
    }
}

impl AuditPolicy {
    pub fn include<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn events(mut self, events: impl IntoIterator<Item = LifecycleEvent>) -> Self {
        self.events = events.into_iter().collect();
        self
    }
}

/// Generic auditable entity composed from the helpers above
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    identity: EntityIdentity,
    attributes: TrackedAttributes,
    policy: AuditPolicy,
    audit_event: Option<LifecycleEvent>,
}

impl TrackedEntity {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            identity: EntityIdentity::new(entity_type, id),
            attributes: TrackedAttributes::new(),
            policy: AuditPolicy::default(),
            audit_event: None,
        }
    }

    /// Entity loaded from storage with the given persisted attributes
    pub fn persisted(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            attributes: TrackedAttributes::from_persisted(attributes),
            ..Self::new(entity_type, id)
        }
    }

    pub fn with_policy(mut self, policy: AuditPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(attribute, value);
        self
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.set(attribute, value);
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn attributes(&self) -> &TrackedAttributes {
        &self.attributes
    }

    pub fn policy(&self) -> &AuditPolicy {
        &self.policy
    }

    pub fn sync_original(&mut self) {
        self.attributes.sync_original();
    }
}

impl AuditableEntity for TrackedEntity {
    fn identity(&self) -> EntityIdentity {
        self.identity.clone()
    }

    fn current_attributes(&self) -> &Attributes {
        self.attributes.current()
    }

    fn dirty_attributes(&self) -> Attributes {
        self.attributes.dirty()
    }

    fn original_value(&self, attribute: &str) -> Option<&Value> {
        self.attributes.original_value(attribute)
    }

    fn audit_include(&self) -> &[String] {
        &self.policy.include
    }

    fn audit_exclude(&self) -> &[String] {
        &self.policy.exclude
    }

    fn auditable_events(&self) -> &[LifecycleEvent] {
        &self.policy.events
    }

    fn current_audit_event(&self) -> Option<LifecycleEvent> {
        self.audit_event
    }

    fn mark_audit_event(&mut self, event: Option<LifecycleEvent>) {
        self.audit_event = event;
    }
}
