//! change-audit - policy-filtered change auditing for entity lifecycles
//!
//! Given a mutable entity and a lifecycle event (created, updated, deleted,
//! restored), the engine computes the minimal old/new record of what
//! changed, enriches it with actor and request context, persists it as an
//! immutable audit record and notifies subscribers.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `audit`: the engine (filtering, extraction, building, stores, notification)
//! - `config`: data directory and persisted settings
//! - `error`: custom error types
//! - `logging`: tracing subscriber setup
//! - `cli` / `display`: audit log inspection for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use change_audit::audit::{Auditor, JsonlAuditStore, LifecycleEvent, TrackedEntity};
//! use change_audit::config::{AuditPaths, Settings};
//!
//! let paths = AuditPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let auditor = Auditor::new(Arc::new(JsonlAuditStore::new(paths.audit_log())))
//!     .with_switches(settings.switches(Default::default()));
//!
//! let mut order = TrackedEntity::new("orders", "17").with("status", "open");
//! auditor.observe(&mut order, LifecycleEvent::Created)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;

pub use audit::{AuditOutcome, AuditRecord, AuditableEntity, Auditor, LifecycleEvent};
pub use error::{AuditError, AuditResult};
