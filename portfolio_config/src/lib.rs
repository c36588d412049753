use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use portfolio_models::email_address::{EmailAddress, EmailAddressWithName};
use serde::Deserialize;
use url::Url;

mod duration;

/// Environment variable with a colon separated list of additional config
/// files.
pub const CONFIG_PATH_ENV: &str = "PORTFOLIO_CONFIG";

pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Loads the bundled default config followed by the files listed in
/// [`CONFIG_PATH_ENV`]. Later files override earlier ones.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var_os(CONFIG_PATH_ENV)
        .map(|paths| {
            std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    load_with_overrides(&paths, &[])
}

/// Like [`load`], but with explicit config files and inline TOML documents
/// applied on top of them.
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
    })?;

    overrides
        .iter()
        .fold(builder, |builder, content| {
            builder.add_source(File::from_str(content, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub owner: OwnerConfig,
    pub email: EmailConfig,
    pub relay: Option<RelayConfig>,
    pub backup: BackupConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// The person the contact form delivers to.
#[derive(Debug, Deserialize)]
pub struct OwnerConfig {
    pub name: String,
    pub email: EmailAddress,
    /// Shown in the footer of notification emails.
    pub site: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    pub endpoint: Url,
}

#[derive(Debug, Deserialize)]
pub struct BackupConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub channel_timeout: Duration,
    pub mail_enabled: bool,
    pub relay_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}
