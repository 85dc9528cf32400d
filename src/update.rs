//! Background update check
//!
//! Runs on its own task while the user goes through login or logout. The
//! result is collected once, after the main operation is done, and only
//! ever produces an informational notice.

use crate::config::UpdateConfig;
use crate::http::{HttpClient, HttpSettings};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Local build number compared against the manifest
pub const BUILD_VERSION: u32 = 1;

pub const PROJECT_URL: &str = "https://github.com/MichaelQian0517/SUDA_WiFi";

/// Handle to a running check
pub struct UpdateCheck {
    handle: Option<JoinHandle<bool>>,
}

impl UpdateCheck {
    /// Start checking in the background. Disabled checks finish immediately.
    pub fn spawn(config: &UpdateConfig) -> Self {
        if !config.enabled {
            return Self { handle: None };
        }

        let config = config.clone();
        let handle = tokio::spawn(async move { has_update(&config).await });
        Self {
            handle: Some(handle),
        }
    }

    pub fn disabled() -> Self {
        Self { handle: None }
    }

    /// Wait up to `grace` for the result. Anything but a confirmed newer
    /// version reads as "no update".
    pub async fn finish(self, grace: Duration) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };

        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(newer)) => newer,
            Ok(Err(e)) => {
                tracing::debug!("Update check task failed: {}", e);
                false
            }
            Err(_) => {
                tracing::debug!("Update check still running, skipping notice");
                false
            }
        }
    }
}

async fn has_update(config: &UpdateConfig) -> bool {
    let settings = HttpSettings {
        timeout: Duration::from_secs(config.timeout),
        connect_timeout: Duration::from_secs(config.timeout),
    };

    let manifest = async {
        let client = HttpClient::new(settings)?;
        let resp = client.get(&config.manifest_url).await?.error_for_status()?;
        resp.text().await
    };

    match manifest.await {
        Ok(text) => match manifest_version(&text, &config.manifest_key) {
            Some(remote) => {
                tracing::debug!("Remote version {}, local {}", remote, BUILD_VERSION);
                remote > BUILD_VERSION
            }
            None => false,
        },
        Err(e) => {
            tracing::debug!("Update check failed: {}", e);
            false
        }
    }
}

/// Version number on the `key:` line of a manifest
pub fn manifest_version(manifest: &str, key: &str) -> Option<u32> {
    manifest
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(':'))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    #[test]
    fn test_manifest_version() {
        let manifest = "otherbuild:9\nsudawifilinuxpython: 3\n";
        assert_eq!(manifest_version(manifest, "sudawifilinuxpython"), Some(3));
        assert_eq!(manifest_version(manifest, "otherbuild"), Some(9));
        assert_eq!(manifest_version(manifest, "missing"), None);
        assert_eq!(manifest_version("sudawifilinuxpython:abc", "sudawifilinuxpython"), None);
    }

    #[test]
    fn test_manifest_key_must_match_whole_prefix() {
        assert_eq!(manifest_version("keyextra:5", "key"), None);
    }

    async fn serve_manifest(body: &'static str) -> String {
        let app = Router::new().route("/.version_check", get(move || async move { body }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/.version_check", addr)
    }

    #[tokio::test]
    async fn test_newer_remote_version_is_reported() {
        let config = UpdateConfig {
            manifest_url: serve_manifest("sudawifilinuxpython:2\n").await,
            ..UpdateConfig::default()
        };

        let check = UpdateCheck::spawn(&config);
        assert!(check.finish(Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_same_version_is_not_an_update() {
        let config = UpdateConfig {
            manifest_url: serve_manifest("sudawifilinuxpython:1\n").await,
            ..UpdateConfig::default()
        };

        let check = UpdateCheck::spawn(&config);
        assert!(!check.finish(Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_disabled_check_reports_nothing() {
        let config = UpdateConfig {
            enabled: false,
            ..UpdateConfig::default()
        };
        assert!(!UpdateCheck::spawn(&config).finish(Duration::from_secs(1)).await);
        assert!(!UpdateCheck::disabled().finish(Duration::from_secs(1)).await);
    }
}
