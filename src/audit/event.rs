//! Lifecycle events that trigger an audit

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// Why a change is being audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    /// Entity was created
    Created,
    /// Entity was updated
    Updated,
    /// Entity was deleted
    Deleted,
    /// A deleted entity was restored
    Restored,
}

impl LifecycleEvent {
    /// Every event, in lifecycle order. Also the default auditable set.
    pub const ALL: [LifecycleEvent; 4] = [
        LifecycleEvent::Created,
        LifecycleEvent::Updated,
        LifecycleEvent::Deleted,
        LifecycleEvent::Restored,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Restored => "restored",
        }
    }

    /// Parse an event name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "restored" => Some(Self::Restored),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            AuditError::Configuration(format!(
                "Unable to handle \"{}\" event, no attribute extraction is defined for it",
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_as_str() {
        assert_eq!(LifecycleEvent::Created.as_str(), "created");
        assert_eq!(LifecycleEvent::Restored.to_string(), "restored");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(LifecycleEvent::parse("Updated"), Some(LifecycleEvent::Updated));
        assert_eq!(LifecycleEvent::parse(" DELETED "), Some(LifecycleEvent::Deleted));
        assert_eq!(LifecycleEvent::parse("archived"), None);
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "archived".parse::<LifecycleEvent>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LifecycleEvent::Deleted).unwrap();
        assert_eq!(json, r#""deleted""#);

        let event: LifecycleEvent = serde_json::from_str(r#""restored""#).unwrap();
        assert_eq!(event, LifecycleEvent::Restored);
    }
}
