//! Peering-registry stage driver
//!
//! Refreshes `database/PDB/`: four independent JSON resources, fetched
//! sequentially into fixed destination files. The first failure aborts the
//! remaining fetches and fails the stage.

use crate::config::MirrorConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::layout::MirrorLayout;
use crate::types::StageKind;
use tracing::{info, warn};

/// Refresh the peering-registry subtree, reporting success as a boolean
pub(crate) async fn refresh(fetcher: &Fetcher, config: &MirrorConfig, layout: &MirrorLayout) -> bool {
    info!(stage = %StageKind::Peering, "started refreshing PDB dataset");
    match run(fetcher, config, layout).await {
        Ok(()) => {
            info!(stage = %StageKind::Peering, "PDB dataset has been updated");
            true
        }
        Err(e) => {
            warn!(stage = %StageKind::Peering, error = %e, "PDB dataset cannot be updated");
            false
        }
    }
}

async fn run(fetcher: &Fetcher, config: &MirrorConfig, layout: &MirrorLayout) -> Result<()> {
    let resources = [
        (&config.peering.ixpfx_url, "ixpfx"),
        (&config.peering.ix_url, "ix"),
        (&config.peering.netixlan_url, "netixlan"),
        (&config.peering.ixlan_url, "ixlan"),
    ];

    for (url, name) in resources {
        fetcher.fetch_json_to(url, &layout.pdb_file(name)).await?;
    }
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stage_config(server: &MockServer, root: &std::path::Path) -> MirrorConfig {
        let mut config = MirrorConfig {
            destination_root: root.to_path_buf(),
            ..Default::default()
        };
        config.peering.ixpfx_url = format!("{}/ixpfx", server.uri());
        config.peering.ix_url = format!("{}/ix", server.uri());
        config.peering.netixlan_url = format!("{}/netixlan", server.uri());
        config.peering.ixlan_url = format!("{}/ixlan", server.uri());
        config
    }

    #[tokio::test]
    async fn test_refresh_writes_all_four_resources() {
        let server = MockServer::start().await;
        for name in ["ixpfx", "ix", "netixlan", "ixlan"] {
            Mock::given(method("GET"))
                .and(path(format!("/{}", name)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(format!(r#"{{"data": [], "resource": "{}"}}"#, name)),
                )
                .mount(&server)
                .await;
        }

        let temp = tempfile::tempdir().unwrap();
        let layout = MirrorLayout::new(temp.path());
        std::fs::create_dir_all(layout.pdb_dir()).unwrap();

        let config = stage_config(&server, temp.path());
        let fetcher = Fetcher::new(None).unwrap();
        assert!(refresh(&fetcher, &config, &layout).await);

        for name in ["ixpfx", "ix", "netixlan", "ixlan"] {
            let contents = std::fs::read_to_string(layout.pdb_file(name)).unwrap();
            assert!(contents.contains(name));
        }
    }

    #[tokio::test]
    async fn test_one_failing_resource_fails_the_stage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ixpfx"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ix"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let layout = MirrorLayout::new(temp.path());
        std::fs::create_dir_all(layout.pdb_dir()).unwrap();

        let config = stage_config(&server, temp.path());
        let fetcher = Fetcher::new(None).unwrap();
        assert!(!refresh(&fetcher, &config, &layout).await);

        // The failure aborts the remaining fetches
        assert!(layout.pdb_file("ixpfx").exists());
        assert!(!layout.pdb_file("netixlan").exists());
        assert!(!layout.pdb_file("ixlan").exists());
    }
}
