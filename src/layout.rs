//! On-disk layout of the dataset mirror
//!
//! Every path the refresh run creates or deletes is derived here, relative to
//! one destination root:
//!
//! ```text
//! <root>/database/PDB/{ixpfx,ix,netixlan,ixlan}.json
//! <root>/database/PCH/ixp_exchange.json
//! <root>/database/PCH/ixp_subnets.json
//! <root>/database/PCH/ixp_membership.json
//! <root>/database/PCH/temp_files/{subnet,membership}_<id>.json
//! <root>/database/RouteViews/routeviews         (decompressed snapshot)
//! <root>/database/RouteViews/routeviews.gz      (transient)
//! <root>/database/RouteViews/caidalog.log       (transient)
//! <root>/configuration/check_update.txt         (completion marker)
//! ```

use crate::types::ExchangeId;
use std::path::{Path, PathBuf};

/// Path builder for the mirror's dataset tree
#[derive(Clone, Debug)]
pub struct MirrorLayout {
    root: PathBuf,
}

impl MirrorLayout {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The destination root the tree lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `database/` — deleted and recreated at the start of every run
    pub fn database_dir(&self) -> PathBuf {
        self.root.join("database")
    }

    /// `database/PDB/` — peering-registry subtree
    pub fn pdb_dir(&self) -> PathBuf {
        self.database_dir().join("PDB")
    }

    /// One of the four peering-registry resource files
    pub fn pdb_file(&self, name: &str) -> PathBuf {
        self.pdb_dir().join(format!("{}.json", name))
    }

    /// `database/PCH/` — exchange-registry subtree
    pub fn pch_dir(&self) -> PathBuf {
        self.database_dir().join("PCH")
    }

    /// Persisted exchange directory resource
    pub fn exchange_directory(&self) -> PathBuf {
        self.pch_dir().join("ixp_exchange.json")
    }

    /// Merged subnet mapping artifact
    pub fn subnet_mapping(&self) -> PathBuf {
        self.pch_dir().join("ixp_subnets.json")
    }

    /// Merged membership mapping artifact
    pub fn membership_mapping(&self) -> PathBuf {
        self.pch_dir().join("ixp_membership.json")
    }

    /// `database/PCH/temp_files/` — per-exchange cache used during fan-out
    pub fn temp_files_dir(&self) -> PathBuf {
        self.pch_dir().join("temp_files")
    }

    /// Cached subnet sub-resource for one exchange
    pub fn subnet_cache(&self, id: &ExchangeId) -> PathBuf {
        self.temp_files_dir().join(format!("subnet_{}.json", id))
    }

    /// Cached membership sub-resource for one exchange
    pub fn membership_cache(&self, id: &ExchangeId) -> PathBuf {
        self.temp_files_dir().join(format!("membership_{}.json", id))
    }

    /// Both cache files exist for `id` — treated as "already downloaded"
    ///
    /// Presence only; a zero-byte or stale file still counts. This is the
    /// mirror's sole idempotence mechanism.
    pub fn exchange_cached(&self, id: &ExchangeId) -> bool {
        self.subnet_cache(id).exists() && self.membership_cache(id).exists()
    }

    /// `database/RouteViews/` — routing-snapshot subtree
    pub fn routeviews_dir(&self) -> PathBuf {
        self.database_dir().join("RouteViews")
    }

    /// Decompressed routing-prefix snapshot
    pub fn routeviews_file(&self) -> PathBuf {
        self.routeviews_dir().join("routeviews")
    }

    /// Fetched snapshot archive, deleted after decompression
    pub fn routeviews_archive(&self) -> PathBuf {
        self.routeviews_dir().join("routeviews.gz")
    }

    /// Fetched snapshot creation log, deleted after the stage succeeds
    pub fn caida_log(&self) -> PathBuf {
        self.routeviews_dir().join("caidalog.log")
    }

    /// `configuration/` — holds the completion marker
    pub fn configuration_dir(&self) -> PathBuf {
        self.root.join("configuration")
    }

    /// Completion marker file; present iff the last full run succeeded
    pub fn completion_marker(&self) -> PathBuf {
        self.configuration_dir().join("check_update.txt")
    }
}
