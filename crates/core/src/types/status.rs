//! Status enums for backend records.

use serde::{Deserialize, Serialize};

/// Activation status of a backend record (accounts, categories).
///
/// The legacy backend serializes these in Spanish; the aliases accept both
/// spellings so old payloads keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    #[serde(alias = "activo")]
    Active,
    #[serde(alias = "inactivo")]
    Inactive,
    #[serde(alias = "suspendido")]
    Suspended,
    /// Catch-all for values introduced server-side after this client shipped.
    #[serde(other)]
    Unknown,
}

impl RecordStatus {
    /// Whether the record is usable by the client.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_english() {
        let status: RecordStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, RecordStatus::Active);
    }

    #[test]
    fn test_deserialize_legacy_spanish() {
        let status: RecordStatus = serde_json::from_str("\"activo\"").unwrap();
        assert_eq!(status, RecordStatus::Active);
        let status: RecordStatus = serde_json::from_str("\"inactivo\"").unwrap();
        assert_eq!(status, RecordStatus::Inactive);
    }

    #[test]
    fn test_deserialize_unknown_value() {
        let status: RecordStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, RecordStatus::Unknown);
    }

    #[test]
    fn test_is_active() {
        assert!(RecordStatus::Active.is_active());
        assert!(!RecordStatus::Suspended.is_active());
    }
}
