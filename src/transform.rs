//! Mapping import/export collaborator
//!
//! The downstream path-analysis tool consumes the exchange-registry artifacts
//! through its own JSON-transform component. This module specifies that
//! component at its interface ([`MappingCodec`]) and ships a plain
//! serde_json-backed implementation so the crate works standalone.

use crate::error::Result;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Exports and imports JSON mappings on behalf of the downstream consumer
///
/// `import_mapping` deliberately reports failure in-band as a flag rather
/// than an error: a single unreadable cache entry must degrade to one missing
/// key in the merged artifact, never abort the merge.
pub trait MappingCodec: Send + Sync {
    /// Write `mapping` to `path` as a JSON document
    fn export_mapping(&self, mapping: &Value, path: &Path) -> Result<()>;

    /// Read a JSON mapping from `path`
    ///
    /// Returns the decoded value and a success flag; on failure the value is
    /// `Value::Null` and the flag is `false`.
    fn import_mapping(&self, path: &Path) -> (Value, bool);
}

/// Default [`MappingCodec`] backed by serde_json files on disk
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMappingCodec;

impl MappingCodec for JsonMappingCodec {
    fn export_mapping(&self, mapping: &Value, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string(mapping)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn import_mapping(&self, path: &Path) -> (Value, bool) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "mapping file unreadable");
                return (Value::Null, false);
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => (value, true),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "mapping file is not valid JSON");
                (Value::Null, false)
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_then_import_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("mapping.json");
        let codec = JsonMappingCodec;

        let mapping = json!({"17": {"subnet": "192.0.2.0/24"}});
        codec.export_mapping(&mapping, &path).unwrap();

        let (imported, ok) = codec.import_mapping(&path);
        assert!(ok);
        assert_eq!(imported, mapping);
    }

    #[test]
    fn test_import_missing_file_reports_failure_in_band() {
        let temp = tempfile::tempdir().unwrap();
        let codec = JsonMappingCodec;
        let (value, ok) = codec.import_mapping(&temp.path().join("absent.json"));
        assert!(!ok);
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_import_malformed_file_reports_failure_in_band() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("garbage.json");
        std::fs::write(&path, "{truncated").unwrap();

        let codec = JsonMappingCodec;
        let (value, ok) = codec.import_mapping(&path);
        assert!(!ok);
        assert_eq!(value, Value::Null);
    }
}
