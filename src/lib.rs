//! # ixp-mirror
//!
//! Refreshes the local dataset mirror consumed by IXP path-analysis tooling.
//! One refresh run fetches three independently versioned datasets into a
//! fixed on-disk tree:
//!
//! - **PDB** — four peering-registry JSON resources
//! - **PCH** — the exchange-registry directory plus two sub-resources per
//!   active exchange, merged into two mapping artifacts
//! - **RouteViews** — the routing-prefix snapshot, version-resolved from a
//!   creation log and decompressed in place
//!
//! The three stages run concurrently, each reporting a single success or
//! failure outcome; the run succeeds iff all three do, in which case a
//! completion marker is written for downstream consumers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ixp_mirror::{Mirror, MirrorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MirrorConfig {
//!         destination_root: "/var/lib/ixp-mirror".into(),
//!         ..Default::default()
//!     };
//!
//!     let mirror = Mirror::new(config)?;
//!     if mirror.refresh().await? {
//!         println!("mirror is fresh");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Gzip decompression for fetched snapshot archives
pub mod decompress;
/// Error types
pub mod error;
/// HTTP resource fetching
pub mod fetcher;
/// On-disk layout of the dataset mirror
pub mod layout;
/// Run orchestration
pub mod mirror;
/// Exchange-registry (PCH) stage
mod pch;
/// Peering-registry (PDB) stage
mod pdb;
/// Routing-prefix snapshot (RouteViews) stage
mod routeviews;
/// Mapping import/export collaborator interface
pub mod transform;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{ExchangeSources, MirrorConfig, PeeringSources, RouteviewsSources};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use layout::MirrorLayout;
pub use mirror::Mirror;
pub use transform::{JsonMappingCodec, MappingCodec};
pub use types::{ExchangeId, ExchangeRecord, ExchangeStatus, StageKind, StageOutcome};
