//! Audit orchestration
//!
//! `Auditor::execute` is the single entry point lifecycle hooks call. One
//! invocation runs strictly in sequence:
//!
//! 1. readiness: switches and the entity's event, sampled once
//! 2. extraction of the change set
//! 3. building the draft (skipped when nothing changed)
//! 4. persisting through the store
//! 5. publishing one notification
//!
//! Nothing is published unless the store created the record.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::builder::AuditRecordBuilder;
use super::changes::extract;
use super::entity::AuditableEntity;
use super::event::LifecycleEvent;
use super::notify::{AuditNotification, AuditSubscriber, NotificationChannel};
use super::record::{AuditDraft, AuditRecord};
use super::resolver::ContextResolverSet;
use super::store::AuditStore;
use super::switch::AuditSwitches;
use crate::error::{AuditError, AuditResult};

/// Why an entity is not ready for auditing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReadyReason {
    /// Auditing is switched off for the entity type or for console runs
    Disabled,
    /// No audit event is set on the entity
    NoEvent,
    /// The event is not in the entity's auditable set
    EventNotAuditable(LifecycleEvent),
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "auditing disabled"),
            Self::NoEvent => write!(f, "no audit event set"),
            Self::EventNotAuditable(event) => write!(f, "event {} not audited", event),
        }
    }
}

/// Result of one `execute` call
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// Policy says there is nothing to do
    NotReady(NotReadyReason),
    /// Nothing auditable changed
    Skipped,
    /// A record was persisted and published
    Audited(AuditRecord),
}

impl AuditOutcome {
    pub fn record(&self) -> Option<&AuditRecord> {
        match self {
            Self::Audited(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_audited(&self) -> bool {
        matches!(self, Self::Audited(_))
    }
}

/// Drives extraction, building, persistence and notification
pub struct Auditor {
    store: Arc<dyn AuditStore>,
    resolvers: ContextResolverSet,
    notifications: NotificationChannel,
    switches: Arc<AuditSwitches>,
}

impl Auditor {
    /// Auditor with detached context, no subscribers and its own switches
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self {
            store,
            resolvers: ContextResolverSet::detached(),
            notifications: NotificationChannel::new(),
            switches: Arc::new(AuditSwitches::default()),
        }
    }

    pub fn with_resolvers(mut self, resolvers: ContextResolverSet) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn with_notifications(mut self, notifications: NotificationChannel) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn with_switches(mut self, switches: Arc<AuditSwitches>) -> Self {
        self.switches = switches;
        self
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn AuditSubscriber>) {
        self.notifications.subscribe(subscriber);
    }

    pub fn switches(&self) -> &Arc<AuditSwitches> {
        &self.switches
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    /// The event to audit, or why there is none
    pub fn readiness<E: AuditableEntity + ?Sized>(
        &self,
        entity: &E,
    ) -> Result<LifecycleEvent, NotReadyReason> {
        if !self.switches.is_enabled_for(&entity.identity().entity_type) {
            return Err(NotReadyReason::Disabled);
        }

        let event = entity.current_audit_event().ok_or(NotReadyReason::NoEvent)?;
        if !entity.auditable_events().contains(&event) {
            return Err(NotReadyReason::EventNotAuditable(event));
        }

        Ok(event)
    }

    pub fn ready_for_auditing<E: AuditableEntity + ?Sized>(&self, entity: &E) -> bool {
        self.readiness(entity).is_ok()
    }

    /// Audit data for the entity's current event, `None` when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Configuration` when the entity is not ready.
    pub fn to_audit<E: AuditableEntity + ?Sized>(
        &self,
        entity: &E,
    ) -> AuditResult<Option<AuditDraft>> {
        let event = self.readiness(entity).map_err(|reason| {
            AuditError::Configuration(format!(
                "A valid audit event has not been set ({})",
                reason
            ))
        })?;

        Ok(self.draft_for(entity, event))
    }

    fn draft_for<E: AuditableEntity + ?Sized>(
        &self,
        entity: &E,
        event: LifecycleEvent,
    ) -> Option<AuditDraft> {
        let changes = extract(event, entity);
        AuditRecordBuilder::new(&self.resolvers).build(entity, event, changes)
    }

    /// Audit the entity's current event
    ///
    /// # Errors
    ///
    /// Store failures are returned unchanged; no notification is published.
    pub fn execute<E: AuditableEntity>(&self, entity: &E) -> AuditResult<AuditOutcome> {
        let identity = entity.identity();

        let event = match self.readiness(entity) {
            Ok(event) => event,
            Err(reason) => {
                debug!(
                    auditable_type = %identity.entity_type,
                    auditable_id = %identity.id,
                    reason = %reason,
                    "Not ready for auditing"
                );
                return Ok(AuditOutcome::NotReady(reason));
            }
        };

        let Some(draft) = self.draft_for(entity, event) else {
            debug!(
                auditable_type = %identity.entity_type,
                auditable_id = %identity.id,
                event = %event,
                "No auditable changes, skipping"
            );
            return Ok(AuditOutcome::Skipped);
        };

        let record = self.store.create(draft).map_err(|e| {
            error!(
                auditable_type = %identity.entity_type,
                auditable_id = %identity.id,
                event = %event,
                error = %e,
                "Failed to create audit record"
            );
            e
        })?;

        info!(
            audit_id = %record.id,
            auditable_type = %identity.entity_type,
            auditable_id = %identity.id,
            event = %event,
            "Audit record created"
        );

        self.notifications.publish(&AuditNotification {
            entity,
            record: Some(&record),
        });

        Ok(AuditOutcome::Audited(record))
    }

    /// Lifecycle hook entry: set `event` on the entity and audit it.
    ///
    /// An event outside the entity's auditable set clears the entity's event
    /// and resolves to `NotReady(EventNotAuditable)`, or `NotReady(Disabled)`
    /// when auditing is off for the type.
    pub fn observe<E: AuditableEntity>(
        &self,
        entity: &mut E,
        event: LifecycleEvent,
    ) -> AuditResult<AuditOutcome> {
        if entity.auditable_events().contains(&event) {
            entity.mark_audit_event(Some(event));
            return self.execute(entity);
        }

        entity.mark_audit_event(None);

        let identity = entity.identity();
        let reason = if self.switches.is_enabled_for(&identity.entity_type) {
            NotReadyReason::EventNotAuditable(event)
        } else {
            NotReadyReason::Disabled
        };
        debug!(
            auditable_type = %identity.entity_type,
            auditable_id = %identity.id,
            reason = %reason,
            "Not ready for auditing"
        );

        Ok(AuditOutcome::NotReady(reason))
    }
}
