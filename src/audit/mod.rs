//! Change-auditing engine
//!
//! Computes a policy-filtered record of what changed on an entity for a
//! lifecycle event, enriches it with context, persists it and notifies
//! subscribers.
//!
//! # Architecture
//!
//! - `filter`: include/exclude eligibility of single attributes
//! - `changes`: per-event extraction of old/new attribute pairs
//! - `resolver`: independent providers of actor, origin, address and agent
//! - `builder`: assembles an `AuditDraft`, or nothing for an empty change set
//! - `store` / `logger`: the persistence contract, in-memory and JSONL stores
//! - `notify`: subscribers told about each persisted record
//! - `switch`: process-wide enable/disable state
//! - `auditor`: the orchestrator hooks call
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use change_audit::audit::{Auditor, LifecycleEvent, MemoryAuditStore, TrackedEntity};
//!
//! let auditor = Auditor::new(Arc::new(MemoryAuditStore::new()));
//!
//! let mut person = TrackedEntity::new("people", "1").with("name", "A");
//! auditor.observe(&mut person, LifecycleEvent::Created)?;
//!
//! person.sync_original();
//! person.set("name", "B");
//! auditor.observe(&mut person, LifecycleEvent::Updated)?;
//! ```

mod auditor;
mod builder;
mod changes;
mod diff;
mod entity;
mod event;
mod filter;
mod logger;
mod notify;
mod record;
mod resolver;
mod store;
mod switch;

pub use auditor::{AuditOutcome, Auditor, NotReadyReason};
pub use builder::AuditRecordBuilder;
pub use changes::{extract, ChangeSet};
pub use diff::{generate_detailed_diff, generate_diff};
pub use entity::{
    Attributes, AuditPolicy, AuditableEntity, EntityIdentity, TrackedAttributes, TrackedEntity,
};
pub use event::LifecycleEvent;
pub use filter::{is_auditable, AttributeFilter};
pub use logger::JsonlAuditStore;
pub use notify::{
    AuditNotification, AuditSubscriber, AuditedMessage, ChannelSubscriber, NotificationChannel,
};
pub use record::{AuditDraft, AuditId, AuditRecord, ModifiedAttributes, Modification};
pub use resolver::{
    Actor, ActorResolver, ClientAgentResolver, ContextResolverSet, Detached,
    NetworkAddressResolver, OriginResolver, RequestContext, RequestScope, ResolvedContext,
    ScopedActor, ScopedClientAgent, ScopedNetworkAddress, ScopedOrigin, CONSOLE_ORIGIN,
};
pub use store::{AuditStore, MemoryAuditStore};
pub use switch::{AuditSwitches, ExecutionMode};
