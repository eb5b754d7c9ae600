use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::synchronise::SyncConfig;

/// Default contents service address when `JUPYTER_BASE_URL` is unset.
const DEFAULT_JUPYTER_BASE_URL: &str = "http://127.0.0.1:8888";

/// Full runtime configuration: sync locations from the static file, the
/// contents service endpoint and credentials from the environment.
#[derive(Debug)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub jupyter_base_url: String,
    pub jupyter_token: Option<String>,
}

#[derive(Deserialize, Default)]
struct StaticConfig {
    #[serde(default)]
    sync: SyncSection,
}

#[derive(Deserialize)]
#[serde(default)]
struct SyncSection {
    local_assets_root: String,
    workspace_root: String,
    repo: String,
    remote_dir: String,
}

impl Default for SyncSection {
    fn default() -> Self {
        let defaults = SyncConfig::default();
        Self {
            local_assets_root: defaults.local_assets_root,
            workspace_root: defaults.workspace_root,
            repo: defaults.repo,
            remote_dir: defaults.remote_dir,
        }
    }
}

/// Loads the optional static YAML config (no secrets) and merges in env vars
/// for the contents service endpoint. Every field has a default, so a
/// missing file yields the built-in source locations.
pub fn load_config<P: AsRef<Path>>(config_path: Option<P>) -> Result<AppConfig> {
    let static_conf = match config_path {
        Some(p) => {
            let path_ref = p.as_ref();
            info!(config_path = ?path_ref, "loading configuration file");
            let content = fs::read_to_string(path_ref).map_err(|e| {
                error!(error = ?e, config_path = ?path_ref, "failed to read config file");
                anyhow::anyhow!("failed to read config file {:?}: {e}", path_ref)
            })?;
            serde_yaml::from_str::<StaticConfig>(&content).map_err(|e| {
                error!(error = ?e, config_path = ?path_ref, "failed to parse config YAML");
                anyhow::anyhow!("failed to parse config YAML: {e}")
            })?
        }
        None => {
            info!("no config file given, using built-in defaults");
            StaticConfig::default()
        }
    };

    let jupyter_base_url =
        std::env::var("JUPYTER_BASE_URL").unwrap_or_else(|_| DEFAULT_JUPYTER_BASE_URL.to_string());
    let jupyter_token = std::env::var("JUPYTER_TOKEN").ok();

    let sync = SyncConfig {
        local_assets_root: static_conf.sync.local_assets_root,
        workspace_root: static_conf.sync.workspace_root,
        repo: static_conf.sync.repo,
        remote_dir: static_conf.sync.remote_dir,
    };

    info!(
        assets = %sync.local_assets_root,
        workspace = %sync.workspace_root,
        repo = %sync.repo,
        remote_dir = %sync.remote_dir,
        jupyter = %jupyter_base_url,
        "configuration loaded"
    );

    Ok(AppConfig {
        sync,
        jupyter_base_url,
        jupyter_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_sync_section() {
        let yaml = "sync:\n  workspace_root: lab\n  repo: someone/notebooks\n";
        let conf: StaticConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(conf.sync.workspace_root, "lab");
        assert_eq!(conf.sync.repo, "someone/notebooks");
        // Unset fields keep their defaults.
        assert_eq!(conf.sync.local_assets_root, "files");
        assert_eq!(conf.sync.remote_dir, "docs");
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let conf: StaticConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(conf.sync.local_assets_root, "files");
        assert_eq!(conf.sync.workspace_root, "notebooks");
        assert_eq!(conf.sync.repo, "arogozhnikov/einops");
        assert_eq!(conf.sync.remote_dir, "docs");
    }
}
