//! Gzip decompression for fetched snapshot archives

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use tokio::task::spawn_blocking;
use tracing::debug;

/// Decompress the gzip archive at `src` into `dest`
///
/// Runs on the blocking thread pool so a large snapshot does not stall the
/// async runtime. Returns the number of decompressed bytes written.
pub async fn gunzip(src: &Path, dest: &Path) -> Result<u64> {
    let src = src.to_path_buf();
    let dest = dest.to_path_buf();
    let src_for_join_err = src.clone();
    let dest_for_closure = dest.clone();

    let written = spawn_blocking(move || -> Result<u64> {
        let input = File::open(&src)?;
        let output = File::create(&dest_for_closure)?;
        let mut decoder = GzDecoder::new(BufReader::new(input));
        let mut writer = BufWriter::new(output);
        io::copy(&mut decoder, &mut writer).map_err(|e| Error::Decompress {
            path: src.clone(),
            reason: e.to_string(),
        })
    })
    .await
    .map_err(|e| Error::Decompress {
        path: src_for_join_err,
        reason: format!("decompression task panicked: {}", e),
    })??;

    debug!(dest = %dest.display(), bytes = written, "decompressed snapshot archive");
    Ok(written)
}
