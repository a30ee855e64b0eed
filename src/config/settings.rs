//! Persisted settings for change-audit
//!
//! Controls the console auditing policy, entity types with auditing off at
//! start, and the default log level.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::paths::AuditPaths;
use crate::audit::{AuditSwitches, ExecutionMode};
use crate::error::AuditError;

/// User settings for change-audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Whether console runs (seeders, scripts) are audited
    #[serde(default = "default_audit_in_console")]
    pub audit_in_console: bool,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Entity types with auditing disabled at start
    #[serde(default)]
    pub disabled_types: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_in_console() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            audit_in_console: default_audit_in_console(),
            log_level: default_log_level(),
            disabled_types: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| AuditError::Settings(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Settings(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AuditError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Switches reflecting these settings, for a process running in `mode`
    pub fn switches(&self, mode: ExecutionMode) -> Arc<AuditSwitches> {
        let switches = AuditSwitches::new(mode, self.audit_in_console);
        for entity_type in &self.disabled_types {
            switches.disable(entity_type.as_str());
        }
        Arc::new(switches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.audit_in_console);
        assert_eq!(settings.log_level, "info");
        assert!(settings.disabled_types.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            audit_in_console: false,
            disabled_types: vec!["sessions".to_string()],
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert!(settings.audit_in_console);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_invalid_file_is_settings_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, AuditError::Settings(_)));
    }

    #[test]
    fn test_switches_from_settings() {
        let settings = Settings {
            audit_in_console: false,
            disabled_types: vec!["sessions".to_string()],
            ..Settings::default()
        };

        let interactive = settings.switches(ExecutionMode::Interactive);
        assert!(interactive.is_enabled_for("people"));
        assert!(!interactive.is_enabled_for("sessions"));

        let console = settings.switches(ExecutionMode::Console);
        assert!(!console.is_enabled_for("people"));
    }
}
