//! CLI command handlers
//!
//! Bridges clap argument parsing with the audit stores.

pub mod audit;

pub use audit::{handle_audit_command, AuditCommands};
