//! Process-wide auditing switches
//!
//! Auditing can be turned off per entity type at any time, and can be
//! suppressed for console (non-interactive) runs. A toggle affects
//! invocations that evaluate readiness after it; an audit already past that
//! point runs to completion.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock, RwLock};

/// How the host process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Serving interactive requests
    #[default]
    Interactive,
    /// Scripts, seeders, maintenance commands
    Console,
}

/// Shared enable/disable state consulted by the auditor
#[derive(Debug)]
pub struct AuditSwitches {
    disabled: RwLock<HashSet<String>>,
    mode: ExecutionMode,
    audit_in_console: bool,
}

impl Default for AuditSwitches {
    fn default() -> Self {
        Self::new(ExecutionMode::default(), true)
    }
}

impl AuditSwitches {
    pub fn new(mode: ExecutionMode, audit_in_console: bool) -> Self {
        Self {
            disabled: RwLock::new(HashSet::new()),
            mode,
            audit_in_console,
        }
    }

    /// The process-wide instance, created on first use with defaults
    pub fn global() -> Arc<AuditSwitches> {
        static GLOBAL: OnceLock<Arc<AuditSwitches>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(AuditSwitches::default()))
            .clone()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn audit_in_console(&self) -> bool {
        self.audit_in_console
    }

    /// Stop auditing an entity type
    pub fn disable(&self, entity_type: impl Into<String>) {
        let mut disabled = self.disabled.write().unwrap_or_else(|e| e.into_inner());
        disabled.insert(entity_type.into());
    }

    /// Resume auditing an entity type
    pub fn enable(&self, entity_type: &str) {
        let mut disabled = self.disabled.write().unwrap_or_else(|e| e.into_inner());
        disabled.remove(entity_type);
    }

    pub fn is_disabled(&self, entity_type: &str) -> bool {
        let disabled = self.disabled.read().unwrap_or_else(|e| e.into_inner());
        disabled.contains(entity_type)
    }

    /// Whether console runs are being suppressed right now
    pub fn console_suppressed(&self) -> bool {
        self.mode == ExecutionMode::Console && !self.audit_in_console
    }

    /// Whether audits of `entity_type` should run
    pub fn is_enabled_for(&self, entity_type: &str) -> bool {
        !self.console_suppressed() && !self.is_disabled(entity_type)
    }
}
