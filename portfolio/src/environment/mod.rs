//! Construction of the service graph from the configuration.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use portfolio_api_rest::RestServerConfig;
use portfolio_config::{BackupConfig, Config, EmailConfig};
use portfolio_core_contact_impl::{
    mail::{MailChannel, MailChannelConfig},
    mailto_base,
    relay::RelayChannel,
    ContactFeatureConfig,
};
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_extern_impl::{
    http::HttpClient,
    relay::{RelayApiServiceConfig, RelayApiServiceImpl},
};
use portfolio_persistence_file::FileBackupRepository;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;
use tracing::{info, warn};
use types::{Backup, Contact, Email, Health, Relay, RestServer};

pub mod types;

/// Creates the email service. In debug mode messages are only logged.
pub async fn email(config: &EmailConfig) -> anyhow::Result<Email> {
    if config.debug {
        info!("Email debug mode is enabled, messages will be logged instead of sent");
        return Ok(EmailServiceImpl::log(config.from.clone()));
    }

    EmailServiceImpl::new(&config.smtp_url, config.from.clone())
        .await
        .context("Failed to connect to SMTP server")
}

pub async fn backup(config: &BackupConfig) -> anyhow::Result<Backup> {
    FileBackupRepository::open(&config.path)
        .await
        .with_context(|| format!("Failed to open backup log at {}", config.path.display()))
}

pub fn rest_server(config: &Config, email: Email, backup: Backup) -> anyhow::Result<RestServer> {
    let template = TemplateServiceImpl::new()?;

    let health = Health::new(
        TimeServiceImpl,
        email.clone(),
        backup.clone(),
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let contact = contact(config, email, template, backup)?;

    let rest_server_config = RestServerConfig {
        addr: config.http.address,
        allowed_origins: config
            .http
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin {origin:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
            .into(),
    };

    Ok(RestServer::new(health, contact, rest_server_config))
}

fn contact(
    config: &Config,
    email: Email,
    template: TemplateServiceImpl,
    backup: Backup,
) -> anyhow::Result<Contact> {
    let owner = Arc::new(
        config
            .owner
            .email
            .clone()
            .with_name(config.owner.name.clone()),
    );
    let site: Arc<str> = config.owner.site.as_str().into();

    let mail = if config.contact.mail_enabled {
        Some(MailChannel::new(
            email,
            template.clone(),
            MailChannelConfig {
                owner,
                site: Arc::clone(&site),
                copy_timeout: config.contact.channel_timeout.into(),
            },
        ))
    } else {
        info!("Mail channel is disabled");
        None
    };

    let relay = relay(config)?;

    let contact_feature_config = ContactFeatureConfig {
        mailto: mailto_base(&config.owner.email)
            .context("Failed to build mailto link for the owner")?
            .into(),
        site,
        channel_timeout: config.contact.channel_timeout.into(),
    };

    Ok(Contact::new(
        TimeServiceImpl,
        template,
        mail,
        relay,
        backup,
        contact_feature_config,
    ))
}

fn relay(config: &Config) -> anyhow::Result<Option<Relay>> {
    if !config.contact.relay_enabled {
        info!("Relay channel is disabled");
        return Ok(None);
    }

    let Some(relay_config) = &config.relay else {
        warn!("Relay channel is enabled, but no relay endpoint is configured");
        return Ok(None);
    };

    let client = HttpClient::new(config.contact.channel_timeout.into())
        .context("Failed to create http client")?;
    let relay_api = RelayApiServiceImpl::new(
        RelayApiServiceConfig {
            endpoint: relay_config.endpoint.clone().into(),
        },
        client,
    );

    Ok(Some(RelayChannel::new(relay_api)))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(dir: &tempfile::TempDir, overrides: &str) -> Config {
        let backup = dir.path().join("contact_messages.jsonl");
        let backup = format!("[backup]\npath = {:?}", backup.display().to_string());
        portfolio_config::load_with_overrides(
            &[] as &[PathBuf],
            &["[email]\ndebug = true", backup.as_str(), overrides],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn build_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir, "");

        let email = email(&config.email).await.unwrap();
        let backup = backup(&config.backup).await.unwrap();

        rest_server(&config, email, backup).unwrap();
    }

    #[tokio::test]
    async fn channels_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            &dir,
            "[contact]\nmail_enabled = false\nrelay_enabled = false",
        );

        assert!(relay(&config).unwrap().is_none());

        let email = email(&config.email).await.unwrap();
        let backup = backup(&config.backup).await.unwrap();
        rest_server(&config, email, backup).unwrap();
    }

    #[tokio::test]
    async fn invalid_cors_origin() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir, "[http]\ncors_allowed_origins = [\"bad\\norigin\"]");

        let email = email(&config.email).await.unwrap();
        let backup = backup(&config.backup).await.unwrap();
        assert!(rest_server(&config, email, backup).is_err());
    }
}
