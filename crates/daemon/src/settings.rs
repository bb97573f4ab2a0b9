//! Daemon configuration
//!
//! Layered: built-in defaults < `<config dir>/carcare/daemon.toml` < `CARCARE_*` env vars.
//! `CARCARE_CONFIG` points at a different file.

use anyhow::{Context, Result};
use carcare_core::application::constants::DEFAULT_AUTH_POLL_INTERVAL;
use carcare_core::domain::VehicleKind;
use carcare_infra_system::PromptAnswer;
use config::{Config, Environment, File, FileFormat};
use directories::BaseDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "CARCARE";
const CONFIG_PATH_ENV: &str = "CARCARE_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
    pub vehicle_kind: VehicleKind,
    pub auth_poll_interval_secs: u64,
    pub permission_file: String,
    pub prompt_answer: PromptAnswer,
    /// External program run for each due notification
    pub notify_command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: "~/.carcare/carcare.db".to_string(),
            rpc_host: carcare_api_rpc::server::DEFAULT_RPC_HOST.to_string(),
            rpc_port: carcare_api_rpc::server::DEFAULT_RPC_PORT,
            log_format: LogFormat::Pretty,
            log_dir: None,
            vehicle_kind: VehicleKind::Manual,
            auth_poll_interval_secs: DEFAULT_AUTH_POLL_INTERVAL.as_secs(),
            permission_file: "~/.carcare/permission.json".to_string(),
            prompt_answer: PromptAnswer::Grant,
            notify_command: None,
        }
    }
}

impl Settings {
    /// Load from the default locations
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);
        Self::load_from(path.as_deref(), true)
    }

    /// Load from an optional TOML file, optionally layering the environment on top
    pub fn load_from(path: Option<&Path>, with_env: bool) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            let name = path
                .to_str()
                .with_context(|| format!("config path is not UTF-8: {}", path.display()))?;
            builder = builder.add_source(File::new(name, FileFormat::Toml).required(false));
        }
        if with_env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        let settings: Settings = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(settings)
    }

    pub fn db_path(&self) -> PathBuf {
        expand(&self.db_path)
    }

    pub fn permission_file(&self) -> PathBuf {
        expand(&self.permission_file)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir.as_deref().map(expand)
    }

    pub fn auth_poll_interval(&self) -> Duration {
        Duration::from_secs(self.auth_poll_interval_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("carcare").join("daemon.toml"))
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
