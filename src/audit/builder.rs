//! Audit record assembly

use super::changes::ChangeSet;
use super::entity::AuditableEntity;
use super::event::LifecycleEvent;
use super::record::AuditDraft;
use super::resolver::ContextResolverSet;

/// Assembles audit drafts from extracted changes and resolved context
pub struct AuditRecordBuilder<'a> {
    resolvers: &'a ContextResolverSet,
}

impl<'a> AuditRecordBuilder<'a> {
    pub fn new(resolvers: &'a ContextResolverSet) -> Self {
        Self { resolvers }
    }

    /// Build a draft, or `None` when there are no changes to record.
    ///
    /// Resolvers are queried here, at build time, and never for an empty
    /// change set.
    pub fn build<E: AuditableEntity + ?Sized>(
        &self,
        entity: &E,
        event: LifecycleEvent,
        changes: ChangeSet,
    ) -> Option<AuditDraft> {
        if changes.is_empty() {
            return None;
        }

        let identity = entity.identity();
        let context = self.resolvers.resolve();
        let (actor_id, actor_type) = match context.actor {
            Some(actor) => (Some(actor.id), Some(actor.actor_type)),
            None => (None, None),
        };

        Some(AuditDraft {
            old_values: changes.old,
            new_values: changes.new,
            event,
            auditable_id: identity.id,
            auditable_type: identity.entity_type,
            actor_id,
            actor_type,
            origin_url: context.origin_url,
            client_address: context.client_address,
            client_agent: context.client_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::changes::extract;
    use crate::audit::entity::TrackedEntity;
    use crate::audit::resolver::{Actor, CONSOLE_ORIGIN};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_build_created_record() {
        let resolvers = ContextResolverSet::detached();
        let entity = TrackedEntity::new("people", "1").with("name", "A").with("age", 1);
        let changes = extract(LifecycleEvent::Created, &entity);

        let draft = AuditRecordBuilder::new(&resolvers)
            .build(&entity, LifecycleEvent::Created, changes)
            .unwrap();

        assert_eq!(json!(draft.new_values), json!({"name": "A", "age": 1}));
        assert!(draft.old_values.is_empty());
        assert_eq!(draft.event, LifecycleEvent::Created);
        assert_eq!(draft.auditable_id, "1");
        assert_eq!(draft.auditable_type, "people");
        assert_eq!(draft.actor_id, None);
        assert_eq!(draft.actor_type, None);
        assert_eq!(draft.origin_url, CONSOLE_ORIGIN);
    }

    #[test]
    fn test_actor_fills_both_reference_fields() {
        let resolvers =
            ContextResolverSet::detached().with_actor(|| Some(Actor::new("admins", "9")));
        let entity = TrackedEntity::new("people", "1").with("name", "A");
        let changes = extract(LifecycleEvent::Deleted, &entity);

        let draft = AuditRecordBuilder::new(&resolvers)
            .build(&entity, LifecycleEvent::Deleted, changes)
            .unwrap();

        assert_eq!(draft.actor_id.as_deref(), Some("9"));
        assert_eq!(draft.actor_type.as_deref(), Some("admins"));
    }

    #[test]
    fn test_empty_changes_build_nothing_and_skip_resolvers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let resolvers = ContextResolverSet::detached().with_client_agent(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("agent".to_string())
        });
        let entity = TrackedEntity::new("people", "1");

        let draft = AuditRecordBuilder::new(&resolvers).build(
            &entity,
            LifecycleEvent::Updated,
            ChangeSet::default(),
        );

        assert!(draft.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
