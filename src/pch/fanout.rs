//! Per-exchange fan-out
//!
//! Fetches the two sub-resources (subnet, membership) for every pending
//! exchange id into the temp-file cache, bounded by a fixed worker pool. A
//! worker's failure is caught and logged with its exchange id and never
//! aborts sibling workers; the caller learns about missing entries only from
//! the collected outcomes and the absence of cache files.

use crate::fetcher::Fetcher;
use crate::layout::MirrorLayout;
use crate::types::ExchangeId;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Outcome of one exchange's fetch pair
#[derive(Clone, Debug)]
pub(crate) struct FanoutOutcome {
    /// The exchange this pair of fetches was for
    pub(crate) id: ExchangeId,
    /// Whether both cache files were fetched successfully
    pub(crate) fetched: bool,
}

/// Fetch the subnet and membership sub-resources for every id in `pending`
///
/// Runs at most `workers` fetch pairs concurrently and always drains fully;
/// the returned outcomes cover every submitted id exactly once.
pub(crate) async fn fetch_exchange_files(
    fetcher: &Fetcher,
    layout: &MirrorLayout,
    subnet_base_url: &str,
    membership_base_url: &str,
    pending: Vec<ExchangeId>,
    workers: usize,
) -> Vec<FanoutOutcome> {
    stream::iter(pending)
        .map(|id| async move {
            let fetched = match fetch_pair(fetcher, layout, subnet_base_url, membership_base_url, &id)
                .await
            {
                Ok(()) => {
                    debug!(exchange = %id, "cached subnet and membership resources");
                    true
                }
                Err(e) => {
                    warn!(exchange = %id, error = %e, "failed to fetch exchange sub-resources");
                    false
                }
            };
            FanoutOutcome { id, fetched }
        })
        .buffer_unordered(workers)
        .collect()
        .await
}

async fn fetch_pair(
    fetcher: &Fetcher,
    layout: &MirrorLayout,
    subnet_base_url: &str,
    membership_base_url: &str,
    id: &ExchangeId,
) -> crate::error::Result<()> {
    let subnet_url = format!("{}{}", subnet_base_url, id);
    fetcher
        .fetch_bytes_to(&subnet_url, &layout.subnet_cache(id))
        .await?;

    let membership_url = format!("{}{}", membership_base_url, id);
    fetcher
        .fetch_bytes_to(&membership_url, &layout.membership_cache(id))
        .await?;

    Ok(())
}
