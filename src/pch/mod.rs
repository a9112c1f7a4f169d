//! Exchange-registry stage driver
//!
//! Refreshes `database/PCH/`: fetches the exchange directory, filters it to
//! the active-exchange set, fans out over the exchanges whose sub-resources
//! are not yet cached, and merges every cached pair into the two final
//! mapping artifacts. Reports one boolean outcome.

pub(crate) mod fanout;

use crate::config::MirrorConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::layout::MirrorLayout;
use crate::transform::MappingCodec;
use crate::types::{ExchangeId, ExchangeRecord, StageKind};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Refresh the exchange-registry subtree, reporting success as a boolean
pub(crate) async fn refresh(
    fetcher: &Fetcher,
    config: &MirrorConfig,
    layout: &MirrorLayout,
    codec: Arc<dyn MappingCodec>,
) -> bool {
    info!(stage = %StageKind::Exchanges, "started refreshing PCH dataset");
    match run(fetcher, config, layout, codec).await {
        Ok(active) => {
            info!(stage = %StageKind::Exchanges, exchanges = active, "PCH dataset has been updated");
            true
        }
        Err(e) => {
            warn!(stage = %StageKind::Exchanges, error = %e, "PCH dataset cannot be updated");
            false
        }
    }
}

async fn run(
    fetcher: &Fetcher,
    config: &MirrorConfig,
    layout: &MirrorLayout,
    codec: Arc<dyn MappingCodec>,
) -> Result<usize> {
    let directory = fetcher.fetch_json(&config.exchanges.directory_url).await?;
    codec.export_mapping(&directory, &layout.exchange_directory())?;

    let entries: Vec<Value> = serde_json::from_value(directory)?;
    let active = active_exchanges(&entries)?;

    tokio::fs::create_dir_all(layout.temp_files_dir()).await?;

    // Presence of both cache files skips the fetch pair; this is the only
    // idempotence mechanism and it is not content-validated.
    let mut pending = Vec::new();
    for id in &active {
        if layout.exchange_cached(id) {
            info!(exchange = %id, "sub-resources already downloaded, skipping fetch");
        } else {
            pending.push(id.clone());
        }
    }

    if !pending.is_empty() {
        let outcomes = fanout::fetch_exchange_files(
            fetcher,
            layout,
            &config.exchanges.subnet_base_url,
            &config.exchanges.membership_base_url,
            pending,
            config.fanout_workers,
        )
        .await;

        let failed = outcomes.iter().filter(|o| !o.fetched).count();
        if failed > 0 {
            warn!(
                stage = %StageKind::Exchanges,
                failed,
                attempted = outcomes.len(),
                "some exchange sub-resources could not be fetched"
            );
        }
    }

    // The merge reads two cache files per active exchange through the sync
    // codec; run it off the async workers.
    let active_count = active.len();
    let merge_layout = layout.clone();
    let merge_codec = Arc::clone(&codec);
    let (subnets, memberships) =
        tokio::task::spawn_blocking(move || merge_cached(&merge_layout, merge_codec.as_ref(), &active))
            .await
            .map_err(|e| std::io::Error::other(format!("merge task panicked: {}", e)))?;

    codec.export_mapping(&Value::Object(subnets), &layout.subnet_mapping())?;
    codec.export_mapping(&Value::Object(memberships), &layout.membership_mapping())?;

    Ok(active_count)
}

/// Filter the directory entries down to the active-exchange set
///
/// An entry that does not decode (missing id or status, non-object) is a
/// data-shape fault and fails the stage; a directory that cannot be read in
/// full is refused rather than silently thinned.
fn active_exchanges(entries: &[Value]) -> Result<BTreeSet<ExchangeId>> {
    let mut active = BTreeSet::new();
    for entry in entries {
        let record: ExchangeRecord = serde_json::from_value(entry.clone())?;
        if record.status.qualifies() {
            active.insert(record.id);
        }
    }
    Ok(active)
}

/// Assemble the two merged artifacts from the per-exchange cache
///
/// An exchange whose cache entry is missing or unreadable is logged and
/// omitted from the merged mapping rather than failing the stage.
fn merge_cached(
    layout: &MirrorLayout,
    codec: &dyn MappingCodec,
    active: &BTreeSet<ExchangeId>,
) -> (Map<String, Value>, Map<String, Value>) {
    let mut subnets = Map::new();
    let mut memberships = Map::new();

    for id in active {
        let (subnet, subnet_ok) = codec.import_mapping(&layout.subnet_cache(id));
        if subnet_ok {
            subnets.insert(id.to_string(), subnet);
        } else {
            warn!(exchange = %id, "subnet cache entry unusable, omitting from merged mapping");
        }

        let (membership, membership_ok) = codec.import_mapping(&layout.membership_cache(id));
        if membership_ok {
            memberships.insert(id.to_string(), membership);
        } else {
            warn!(exchange = %id, "membership cache entry unusable, omitting from merged mapping");
        }
    }

    (subnets, memberships)
}
