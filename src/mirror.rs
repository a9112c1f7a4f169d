//! Run orchestration for a full mirror refresh
//!
//! [`Mirror::refresh`] resets the dataset tree, runs the three stage drivers
//! concurrently, ANDs their outcomes, and writes the completion marker on
//! overall success. Stage failures surface only as the boolean result; the
//! lone hard error is a destination root that cannot be (re)created.

use crate::config::MirrorConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::layout::MirrorLayout;
use crate::transform::{JsonMappingCodec, MappingCodec};
use crate::types::{StageKind, StageOutcome};
use crate::{pch, pdb, routeviews};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Contents of the completion marker file
const COMPLETION_MARKER: &str = "1";

/// Refreshes the local dataset mirror
///
/// Holds the immutable configuration, the shared HTTP fetcher, and the
/// mapping codec the exchange-registry stage hands its artifacts to.
pub struct Mirror {
    config: Arc<MirrorConfig>,
    layout: MirrorLayout,
    fetcher: Fetcher,
    codec: Arc<dyn MappingCodec>,
}

impl Mirror {
    /// Create a mirror with the default JSON mapping codec
    pub fn new(config: MirrorConfig) -> Result<Self> {
        Self::with_codec(config, Arc::new(JsonMappingCodec))
    }

    /// Create a mirror that persists exchange-registry artifacts through the
    /// given codec (the downstream consumer's JSON-transform component)
    pub fn with_codec(config: MirrorConfig, codec: Arc<dyn MappingCodec>) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(config.fetch_timeout)?;
        let layout = MirrorLayout::new(&config.destination_root);
        Ok(Self {
            config: Arc::new(config),
            layout,
            fetcher,
            codec,
        })
    }

    /// The destination root the dataset tree is created under
    pub fn destination_root(&self) -> &Path {
        self.layout.root()
    }

    /// Run a full refresh of all three datasets
    ///
    /// Deletes and recreates the dataset tree, runs the three stage drivers
    /// concurrently, and returns `Ok(true)` iff all of them succeeded — in
    /// which case the completion marker has been written. On `Ok(false)` the
    /// partially populated tree is left as-is and the run must be re-invoked
    /// from scratch; there is no resume.
    ///
    /// # Errors
    ///
    /// Returns an error only when the destination tree itself cannot be
    /// prepared or the marker cannot be written.
    pub async fn refresh(&self) -> Result<bool> {
        self.prepare_tree().await?;

        let (peering, exchanges, snapshots) = tokio::join!(
            pdb::refresh(&self.fetcher, &self.config, &self.layout),
            pch::refresh(&self.fetcher, &self.config, &self.layout, Arc::clone(&self.codec)),
            routeviews::refresh(&self.fetcher, &self.config, &self.layout),
        );

        let outcomes = [
            StageOutcome {
                stage: StageKind::Peering,
                success: peering,
            },
            StageOutcome {
                stage: StageKind::Exchanges,
                success: exchanges,
            },
            StageOutcome {
                stage: StageKind::Routeviews,
                success: snapshots,
            },
        ];

        let success = outcomes.iter().all(|o| o.success);
        if success {
            tokio::fs::write(self.layout.completion_marker(), COMPLETION_MARKER).await?;
            info!("mirror refresh complete, marker written");
        } else {
            for outcome in outcomes.iter().filter(|o| !o.success) {
                warn!(stage = %outcome.stage, "stage failed; mirror is stale");
            }
        }
        Ok(success)
    }

    /// Destructive reset of the dataset tree
    ///
    /// The `database/` subtree never survives between runs, and any marker
    /// left by an earlier successful run is removed so its presence always
    /// reflects the most recent run.
    async fn prepare_tree(&self) -> Result<()> {
        let database = self.layout.database_dir();
        if database.exists() {
            tokio::fs::remove_dir_all(&database).await?;
        }
        tokio::fs::create_dir_all(self.layout.pdb_dir()).await?;
        tokio::fs::create_dir_all(self.layout.pch_dir()).await?;
        tokio::fs::create_dir_all(self.layout.routeviews_dir()).await?;
        tokio::fs::create_dir_all(self.layout.configuration_dir()).await?;

        let marker = self.layout.completion_marker();
        if marker.exists() {
            tokio::fs::remove_file(&marker).await?;
        }
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_resets_dataset_subtrees() {
        let temp = tempfile::tempdir().unwrap();
        let layout = MirrorLayout::new(temp.path());

        // Stale state from a previous run
        std::fs::create_dir_all(layout.pdb_dir()).unwrap();
        std::fs::write(layout.pdb_file("ixpfx"), "stale").unwrap();
        std::fs::create_dir_all(layout.temp_files_dir()).unwrap();
        std::fs::write(layout.temp_files_dir().join("subnet_1.json"), "stale").unwrap();

        let config = MirrorConfig {
            destination_root: temp.path().to_path_buf(),
            ..Default::default()
        };
        let mirror = Mirror::new(config).unwrap();
        mirror.prepare_tree().await.unwrap();

        assert!(layout.pdb_dir().exists());
        assert!(layout.pch_dir().exists());
        assert!(layout.routeviews_dir().exists());
        assert!(!layout.pdb_file("ixpfx").exists());
        assert!(!layout.temp_files_dir().exists());
    }

    #[tokio::test]
    async fn test_prepare_tree_removes_stale_marker() {
        let temp = tempfile::tempdir().unwrap();
        let layout = MirrorLayout::new(temp.path());
        std::fs::create_dir_all(layout.configuration_dir()).unwrap();
        std::fs::write(layout.completion_marker(), "1").unwrap();

        let config = MirrorConfig {
            destination_root: temp.path().to_path_buf(),
            ..Default::default()
        };
        let mirror = Mirror::new(config).unwrap();
        mirror.prepare_tree().await.unwrap();

        // Marker presence must reflect the current run, not the previous one
        assert!(!layout.completion_marker().exists());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MirrorConfig {
            fanout_workers: 0,
            ..Default::default()
        };
        assert!(Mirror::new(config).is_err());
    }

    #[test]
    fn test_destination_root_accessor() {
        let config = MirrorConfig {
            destination_root: std::path::PathBuf::from("/srv/mirror"),
            ..Default::default()
        };
        let mirror = Mirror::new(config).unwrap();
        assert_eq!(mirror.destination_root(), Path::new("/srv/mirror"));
    }
}
