//! Configuration module for change-audit
//!
//! - Data directory resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::Settings;
