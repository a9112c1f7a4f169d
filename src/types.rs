//! Core types for ixp-mirror

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier of an exchange in the exchange-registry directory
///
/// The registry serves ids as strings but has historically also emitted bare
/// numbers, so deserialization accepts both. The id is appended verbatim to
/// the per-exchange endpoint URLs and embedded in the cache file names.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExchangeId(pub String);

impl ExchangeId {
    /// Create a new ExchangeId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExchangeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ExchangeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(i64),
        }

        Ok(match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => Self(s),
            StringOrNumber::Number(n) => Self(n.to_string()),
        })
    }
}

/// Lifecycle status of an exchange as reported by the registry directory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExchangeStatus {
    /// Operational exchange
    Active,
    /// Announced but not yet operational; still carries sub-resources
    Planned,
    /// Any other status (inactive, decommissioned, unknown)
    Other,
}

impl<'de> Deserialize<'de> for ExchangeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let status = String::deserialize(deserializer)?;
        Ok(match status.as_str() {
            "Active" => Self::Active,
            "Planned" => Self::Planned,
            _ => Self::Other,
        })
    }
}

impl ExchangeStatus {
    /// Whether exchanges with this status get their sub-resources mirrored
    pub fn qualifies(&self) -> bool {
        matches!(self, Self::Active | Self::Planned)
    }
}

/// One entry of the exchange-registry directory resource
///
/// Only the fields the refresh logic needs are modeled; the full directory
/// document is persisted separately through the mapping codec.
#[derive(Clone, Debug, Deserialize)]
pub struct ExchangeRecord {
    /// Registry identifier of the exchange
    pub id: ExchangeId,
    /// Directory status ("stat" in the upstream document)
    #[serde(rename = "stat")]
    pub status: ExchangeStatus,
}

/// Outcome of one stage driver, reported to the run orchestrator
///
/// A stage either fully succeeded or it failed; no granular error travels
/// upward past the driver boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageOutcome {
    /// Which dataset family the stage refreshed
    pub stage: StageKind,
    /// Whether the stage completed successfully
    pub success: bool,
}

/// The three dataset families a refresh run covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Peering-registry (PeeringDB) dataset
    Peering,
    /// Exchange-registry (PCH) dataset
    Exchanges,
    /// Routing-prefix snapshot (RouteViews)
    Routeviews,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peering => write!(f, "PDB"),
            Self::Exchanges => write!(f, "PCH"),
            Self::Routeviews => write!(f, "RouteViews"),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_record_deserializes_string_id() {
        let record: ExchangeRecord =
            serde_json::from_str(r#"{"id": "42", "stat": "Active", "name": "Example IX"}"#)
                .unwrap();
        assert_eq!(record.id, ExchangeId::from("42"));
        assert!(record.status.qualifies());
    }

    #[test]
    fn test_exchange_record_deserializes_numeric_id() {
        let record: ExchangeRecord =
            serde_json::from_str(r#"{"id": 42, "stat": "Planned"}"#).unwrap();
        assert_eq!(record.id.as_str(), "42");
        assert!(record.status.qualifies());
    }

    #[test]
    fn test_unknown_status_does_not_qualify() {
        let record: ExchangeRecord =
            serde_json::from_str(r#"{"id": "7", "stat": "Decommissioned"}"#).unwrap();
        assert_eq!(record.status, ExchangeStatus::Other);
        assert!(!record.status.qualifies());
    }
}
