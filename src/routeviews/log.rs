//! Snapshot version resolution from the CAIDA creation log
//!
//! The log is a tab-delimited text file whose second-to-last line names the
//! newest snapshot in its third field (the final line is a blank trailer):
//!
//! ```text
//! <serial>\t<date>\t<path/to/snapshot.pfx2as.gz>
//! ```
//!
//! This parser is deliberately coupled to that exact layout because the
//! upstream provider defines it; a provider-side format change breaks the
//! stage (reported as a failure, never a panic) rather than being papered
//! over here.

use crate::error::{Error, Result};

/// Field index of the snapshot file name within a log line
const SNAPSHOT_NAME_FIELD: usize = 2;

/// Extract the current snapshot file name from the creation log contents
pub fn parse_snapshot_name(log: &str) -> Result<String> {
    let lines: Vec<&str> = log.split('\n').collect();
    if lines.len() < 2 {
        return Err(Error::LogFormat {
            reason: format!("expected at least 2 lines, got {}", lines.len()),
        });
    }

    // Last line is the blank trailer; the newest entry sits just above it.
    let entry = lines[lines.len() - 2];
    let name = entry
        .split('\t')
        .nth(SNAPSHOT_NAME_FIELD)
        .ok_or_else(|| Error::LogFormat {
            reason: format!("entry line has no field {}: {:?}", SNAPSHOT_NAME_FIELD, entry),
        })?;

    if name.is_empty() {
        return Err(Error::LogFormat {
            reason: format!("empty snapshot name in entry line {:?}", entry),
        });
    }

    Ok(name.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_third_field_of_second_to_last_line() {
        let log = "a\tb\tfileX.gz\n";
        assert_eq!(parse_snapshot_name(log).unwrap(), "fileX.gz");
    }

    #[test]
    fn test_resolves_newest_of_many_entries() {
        let log = "1\t2024-01\told.pfx2as.gz\n2\t2024-02\tnew.pfx2as.gz\n";
        assert_eq!(parse_snapshot_name(log).unwrap(), "new.pfx2as.gz");
    }

    #[test]
    fn test_single_line_log_fails_without_panicking() {
        let err = parse_snapshot_name("just one line, no trailer").unwrap_err();
        assert!(matches!(err, Error::LogFormat { .. }));
    }

    #[test]
    fn test_empty_log_fails() {
        assert!(matches!(
            parse_snapshot_name("").unwrap_err(),
            Error::LogFormat { .. }
        ));
    }

    #[test]
    fn test_entry_with_too_few_fields_fails() {
        let err = parse_snapshot_name("serial only\n").unwrap_err();
        assert!(matches!(err, Error::LogFormat { .. }));
    }
}
