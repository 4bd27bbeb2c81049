//! CLI configuration.
//!
//! A TOML file merged with `PCDEX_*` environment variables through
//! figment; command-line flags override both.

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use pcdex_core::{InventoryConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Contents of `config.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Inventory server URL.
    pub server: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Accept self-signed TLS certificates.
    pub insecure: Option<bool>,
    /// Custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

/// Location of the config file (`~/.config/pcdex/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "pcdex")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("pcdex.toml"))
}

/// Load the config file merged with `PCDEX_*` env vars. A missing file
/// is an empty config, not an error.
pub fn load_config() -> Result<FileConfig, CliError> {
    let figment = Figment::new()
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("PCDEX_"));
    Ok(figment.extract()?)
}

/// Resolve the session configuration from file, env, and CLI flags.
/// Flags win over file values.
pub fn resolve(global: &GlobalOpts) -> Result<InventoryConfig, CliError> {
    let file = load_config()?;

    let url_str = global
        .server
        .clone()
        .or(file.server)
        .ok_or_else(|| CliError::NoServer {
            path: config_path().display().to_string(),
        })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let tls = if global.insecure || file.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(path) = global.ca_cert.clone().or(file.ca_cert) {
        TlsVerification::CustomCa(path)
    } else {
        TlsVerification::SystemDefaults
    };

    // The clap default is 30; a file value only applies when the flag
    // was left at that default.
    let timeout_secs = if global.timeout == 30 {
        file.timeout_secs.unwrap_or(30)
    } else {
        global.timeout
    };

    Ok(InventoryConfig {
        url,
        tls,
        timeout: Duration::from_secs(timeout_secs),
    })
}
