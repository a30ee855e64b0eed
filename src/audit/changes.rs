//! Change extraction
//!
//! Computes the old/new attribute pairs for a lifecycle event, subject to
//! the entity's attribute filter. Each event has exactly one extraction
//! routine; restore is delete in reverse.

use serde::{Deserialize, Serialize};

use super::entity::{Attributes, AuditableEntity};
use super::event::LifecycleEvent;
use super::filter::AttributeFilter;

/// Paired old/new attribute values for one audit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub old: Attributes,
    pub new: Attributes,
}

impl ChangeSet {
    pub fn new(old: Attributes, new: Attributes) -> Self {
        Self { old, new }
    }

    /// Nothing to audit on either side
    pub fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }

    /// Swap old and new
    pub fn inverted(self) -> Self {
        Self {
            old: self.new,
            new: self.old,
        }
    }
}

/// Extraction routine for one event
type Extraction<E> = fn(&E) -> ChangeSet;

/// The extraction routine for an event
fn extraction_for<E: AuditableEntity + ?Sized>(event: LifecycleEvent) -> Extraction<E> {
    match event {
        LifecycleEvent::Created => created,
        LifecycleEvent::Updated => updated,
        LifecycleEvent::Deleted => deleted,
        LifecycleEvent::Restored => restored,
    }
}

/// Compute the change set of `entity` for `event`
pub fn extract<E: AuditableEntity + ?Sized>(event: LifecycleEvent, entity: &E) -> ChangeSet {
    extraction_for::<E>(event)(entity)
}

fn filter_of<E: AuditableEntity + ?Sized>(entity: &E) -> AttributeFilter<'_> {
    AttributeFilter::new(entity.audit_include(), entity.audit_exclude())
}

/// Every auditable attribute currently set
fn auditable_current<E: AuditableEntity + ?Sized>(entity: &E) -> Attributes {
    let filter = filter_of(entity);
    entity
        .current_attributes()
        .iter()
        .filter(|(attribute, _)| filter.is_auditable(attribute))
        .map(|(attribute, value)| (attribute.clone(), value.clone()))
        .collect()
}

fn created<E: AuditableEntity + ?Sized>(entity: &E) -> ChangeSet {
    ChangeSet::new(Attributes::new(), auditable_current(entity))
}

fn updated<E: AuditableEntity + ?Sized>(entity: &E) -> ChangeSet {
    let filter = filter_of(entity);
    let mut old = Attributes::new();
    let mut new = Attributes::new();

    for (attribute, value) in entity.dirty_attributes() {
        if !filter.is_auditable(&attribute) {
            continue;
        }

        let original = entity
            .original_value(&attribute)
            .cloned()
            .unwrap_or_default();
        old.insert(attribute.clone(), original);
        new.insert(attribute, value);
    }

    ChangeSet::new(old, new)
}

fn deleted<E: AuditableEntity + ?Sized>(entity: &E) -> ChangeSet {
    ChangeSet::new(auditable_current(entity), Attributes::new())
}

fn restored<E: AuditableEntity + ?Sized>(entity: &E) -> ChangeSet {
    deleted(entity).inverted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entity::{AuditPolicy, TrackedEntity};
    use serde_json::json;

    fn person() -> TrackedEntity {
        TrackedEntity::new("people", "1").with("name", "A").with("age", 1)
    }

    fn saved_person(policy: AuditPolicy) -> TrackedEntity {
        let mut entity = person().with_policy(policy);
        entity.sync_original();
        entity
    }

    #[test]
    fn test_created_has_empty_old() {
        let changes = extract(LifecycleEvent::Created, &person());
        assert!(changes.old.is_empty());
        assert_eq!(json!(changes.new), json!({"name": "A", "age": 1}));
    }

    #[test]
    fn test_created_respects_include() {
        let entity = person().with_policy(AuditPolicy::default().include(["name"]));
        let changes = extract(LifecycleEvent::Created, &entity);
        assert_eq!(json!(changes.new), json!({"name": "A"}));
    }

    #[test]
    fn test_updated_pairs_only_dirty_attributes() {
        let mut entity = saved_person(AuditPolicy::default());
        entity.set("age", 2);

        let changes = extract(LifecycleEvent::Updated, &entity);
        assert_eq!(json!(changes.old), json!({"age": 1}));
        assert_eq!(json!(changes.new), json!({"age": 2}));
    }

    #[test]
    fn test_updated_excluded_attribute_is_dropped_from_both_sides() {
        let mut entity = saved_person(AuditPolicy::default().exclude(["age"]));
        entity.set("age", 2);

        let changes = extract(LifecycleEvent::Updated, &entity);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_updated_new_attribute_has_null_old_value() {
        let mut entity = saved_person(AuditPolicy::default());
        entity.set("email", "a@example.com");

        let changes = extract(LifecycleEvent::Updated, &entity);
        assert_eq!(json!(changes.old), json!({"email": null}));
        assert_eq!(json!(changes.new), json!({"email": "a@example.com"}));
    }

    #[test]
    fn test_updated_keys_are_paired() {
        let mut entity = saved_person(AuditPolicy::default().exclude(["name"]));
        entity.set("name", "B");
        entity.set("age", 3);
        entity.set("tags", json!(["x", "y"]));

        let changes = extract(LifecycleEvent::Updated, &entity);
        let old_keys: Vec<_> = changes.old.keys().collect();
        let new_keys: Vec<_> = changes.new.keys().collect();
        assert_eq!(old_keys, new_keys);
        assert!(!changes.old.contains_key("name"));
    }

    #[test]
    fn test_deleted_has_empty_new() {
        let entity = TrackedEntity::new("accounts", "7").with("status", "active");
        let changes = extract(LifecycleEvent::Deleted, &entity);
        assert_eq!(json!(changes.old), json!({"status": "active"}));
        assert!(changes.new.is_empty());
    }

    #[test]
    fn test_restored_is_inverse_of_deleted() {
        let policies = [
            AuditPolicy::default(),
            AuditPolicy::default().include(["name"]),
            AuditPolicy::default().exclude(["name"]),
            AuditPolicy::default().include(["age"]).exclude(["age"]),
        ];

        for policy in policies {
            let entity = person().with_policy(policy);
            let deleted = extract(LifecycleEvent::Deleted, &entity);
            let restored = extract(LifecycleEvent::Restored, &entity);
            assert_eq!(restored, deleted.inverted());
        }
    }

    #[test]
    fn test_restored_status_scenario() {
        let entity = TrackedEntity::new("accounts", "7").with("status", "active");
        let changes = extract(LifecycleEvent::Restored, &entity);
        assert!(changes.old.is_empty());
        assert_eq!(json!(changes.new), json!({"status": "active"}));
    }

    #[test]
    fn test_nested_values_are_preserved() {
        let entity = TrackedEntity::new("docs", "1")
            .with("meta", json!({"a": [1, 2, {"b": null}]}))
            .with("ratio", 0.5)
            .with("flag", true);

        let changes = extract(LifecycleEvent::Created, &entity);
        assert_eq!(changes.new["meta"], json!({"a": [1, 2, {"b": null}]}));
        assert_eq!(changes.new["ratio"], json!(0.5));
        assert_eq!(changes.new["flag"], json!(true));
    }
}
