//! Configuration types for ixp-mirror

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source URLs for the peering-registry (PeeringDB) dataset
///
/// Four independent JSON endpoints, each mirrored to its own file under
/// `database/PDB/`. Used as a nested sub-config within [`MirrorConfig`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeeringSources {
    /// IXP prefix endpoint (default: PeeringDB `ixpfx`)
    #[serde(default = "default_ixpfx_url")]
    pub ixpfx_url: String,

    /// Exchange endpoint (default: PeeringDB `ix`)
    #[serde(default = "default_ix_url")]
    pub ix_url: String,

    /// Network-to-LAN endpoint (default: PeeringDB `netixlan`)
    #[serde(default = "default_netixlan_url")]
    pub netixlan_url: String,

    /// Exchange LAN endpoint (default: PeeringDB `ixlan`)
    #[serde(default = "default_ixlan_url")]
    pub ixlan_url: String,
}

impl Default for PeeringSources {
    fn default() -> Self {
        Self {
            ixpfx_url: default_ixpfx_url(),
            ix_url: default_ix_url(),
            netixlan_url: default_netixlan_url(),
            ixlan_url: default_ixlan_url(),
        }
    }
}

/// Source URLs for the exchange-registry (PCH) dataset
///
/// One directory endpoint plus two per-exchange endpoints; the exchange
/// identifier is appended to the base URLs at fetch time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeSources {
    /// Exchange directory endpoint (default: PCH IXP directory)
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Per-exchange subnet endpoint base; the exchange id is appended
    #[serde(default = "default_subnet_base_url")]
    pub subnet_base_url: String,

    /// Per-exchange membership endpoint base; the exchange id is appended
    #[serde(default = "default_membership_base_url")]
    pub membership_base_url: String,
}

impl Default for ExchangeSources {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            subnet_base_url: default_subnet_base_url(),
            membership_base_url: default_membership_base_url(),
        }
    }
}

/// Source URLs for the routing-prefix snapshot (RouteViews via CAIDA)
///
/// The log artifact names the current snapshot file; the archive URL is the
/// snapshot name appended to `archive_base_url`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteviewsSources {
    /// Creation-log endpoint listing available snapshot files
    #[serde(default = "default_caida_log_url")]
    pub log_url: String,

    /// Base URL the resolved snapshot file name is appended to
    #[serde(default = "default_caida_base_url")]
    pub archive_base_url: String,
}

impl Default for RouteviewsSources {
    fn default() -> Self {
        Self {
            log_url: default_caida_log_url(),
            archive_base_url: default_caida_base_url(),
        }
    }
}

/// Main configuration for a mirror refresh
///
/// Read once at construction and passed by shared reference into each stage
/// driver; nothing here is mutated after a [`Mirror`](crate::Mirror) is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Destination root the dataset tree is created under (default: ".")
    #[serde(default = "default_destination_root")]
    pub destination_root: PathBuf,

    /// Peering-registry source URLs
    #[serde(default)]
    pub peering: PeeringSources,

    /// Exchange-registry source URLs
    #[serde(default)]
    pub exchanges: ExchangeSources,

    /// Routing-prefix snapshot source URLs
    #[serde(default)]
    pub routeviews: RouteviewsSources,

    /// Concurrent workers for the per-exchange fan-out (default: 20)
    #[serde(default = "default_fanout_workers")]
    pub fanout_workers: usize,

    /// Per-request timeout (default: 120s; `None` disables the timeout and a
    /// stalled remote can then hang a stage indefinitely)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: Option<Duration>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            destination_root: default_destination_root(),
            peering: PeeringSources::default(),
            exchanges: ExchangeSources::default(),
            routeviews: RouteviewsSources::default(),
            fanout_workers: default_fanout_workers(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl MirrorConfig {
    /// Validate the configuration, returning a descriptive error for the
    /// first invalid setting found
    pub fn validate(&self) -> Result<()> {
        if self.fanout_workers == 0 {
            return Err(Error::config(
                "fanout_workers must be at least 1",
                Some("fanout_workers"),
            ));
        }

        let urls = [
            ("peering.ixpfx_url", &self.peering.ixpfx_url),
            ("peering.ix_url", &self.peering.ix_url),
            ("peering.netixlan_url", &self.peering.netixlan_url),
            ("peering.ixlan_url", &self.peering.ixlan_url),
            ("exchanges.directory_url", &self.exchanges.directory_url),
            ("exchanges.subnet_base_url", &self.exchanges.subnet_base_url),
            (
                "exchanges.membership_base_url",
                &self.exchanges.membership_base_url,
            ),
            ("routeviews.log_url", &self.routeviews.log_url),
            (
                "routeviews.archive_base_url",
                &self.routeviews.archive_base_url,
            ),
        ];
        for (key, url) in urls {
            if url.is_empty() {
                return Err(Error::config(format!("{} must not be empty", key), Some(key)));
            }
        }

        Ok(())
    }
}

fn default_destination_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ixpfx_url() -> String {
    "https://www.peeringdb.com/api/ixpfx".to_string()
}

fn default_ix_url() -> String {
    "https://www.peeringdb.com/api/ix".to_string()
}

fn default_netixlan_url() -> String {
    "https://www.peeringdb.com/api/netixlan".to_string()
}

fn default_ixlan_url() -> String {
    "https://www.peeringdb.com/api/ixlan".to_string()
}

fn default_directory_url() -> String {
    "https://www.pch.net/api/ixp/directory".to_string()
}

fn default_subnet_base_url() -> String {
    "https://www.pch.net/api/ixp/subnets/".to_string()
}

fn default_membership_base_url() -> String {
    "https://www.pch.net/api/ixp/subnet_details/".to_string()
}

fn default_caida_log_url() -> String {
    "http://data.caida.org/datasets/routing/routeviews-prefix2as/pfx2as-creation.log".to_string()
}

fn default_caida_base_url() -> String {
    "http://data.caida.org/datasets/routing/routeviews-prefix2as/".to_string()
}

fn default_fanout_workers() -> usize {
    20
}

fn default_fetch_timeout() -> Option<Duration> {
    Some(Duration::from_secs(120))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MirrorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.fanout_workers, 20);
        assert!(config.fetch_timeout.is_some());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = MirrorConfig {
            fanout_workers: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fanout_workers"));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = MirrorConfig::default();
        config.exchanges.directory_url = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("directory_url"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MirrorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.destination_root, PathBuf::from("."));
        assert!(config.peering.ixpfx_url.contains("peeringdb"));
    }

    #[test]
    fn test_config_partial_override() {
        let config: MirrorConfig =
            serde_json::from_str(r#"{"fanout_workers": 4, "destination_root": "/var/mirror"}"#)
                .unwrap();
        assert_eq!(config.fanout_workers, 4);
        assert_eq!(config.destination_root, PathBuf::from("/var/mirror"));
        assert!(config.exchanges.directory_url.contains("pch.net"));
    }
}
