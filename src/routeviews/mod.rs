//! Routing-prefix snapshot stage driver
//!
//! Refreshes `database/RouteViews/`: resolves the current snapshot name from
//! the CAIDA creation log, fetches the archive, decompresses it, and removes
//! the transients. Reports one boolean outcome; no error crosses this
//! boundary into the run orchestrator.

pub(crate) mod log;

use crate::config::MirrorConfig;
use crate::decompress;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::layout::MirrorLayout;
use crate::types::StageKind;
use tracing::{info, warn};
use url::Url;

/// Refresh the routing-snapshot subtree, reporting success as a boolean
pub(crate) async fn refresh(fetcher: &Fetcher, config: &MirrorConfig, layout: &MirrorLayout) -> bool {
    info!(stage = %StageKind::Routeviews, "started refreshing RouteViews dataset");
    match run(fetcher, config, layout).await {
        Ok(snapshot) => {
            info!(stage = %StageKind::Routeviews, snapshot, "RouteViews dataset has been updated");
            true
        }
        Err(e) => {
            warn!(stage = %StageKind::Routeviews, error = %e, "RouteViews dataset cannot be updated");
            false
        }
    }
}

async fn run(fetcher: &Fetcher, config: &MirrorConfig, layout: &MirrorLayout) -> Result<String> {
    let log_path = layout.caida_log();
    fetcher
        .fetch_bytes_to(&config.routeviews.log_url, &log_path)
        .await?;

    let log_contents = tokio::fs::read_to_string(&log_path).await?;
    let snapshot = log::parse_snapshot_name(&log_contents)?;

    let archive_url = Url::parse(&config.routeviews.archive_base_url)?.join(&snapshot)?;
    let archive_path = layout.routeviews_archive();
    fetcher
        .fetch_bytes_to(archive_url.as_str(), &archive_path)
        .await?;

    decompress::gunzip(&archive_path, &layout.routeviews_file()).await?;

    // Only the decompressed snapshot survives a successful stage.
    tokio::fs::remove_file(&archive_path).await?;
    tokio::fs::remove_file(&log_path).await?;

    Ok(snapshot)
}
