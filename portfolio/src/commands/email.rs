use anyhow::ensure;
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::email_address::EmailAddressWithName;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test {
        /// Defaults to the site owner
        recipient: Option<EmailAddressWithName>,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: Option<EmailAddressWithName>) -> anyhow::Result<()> {
    let email_service = environment::email(&config.email).await?;
    let recipient = recipient.unwrap_or_else(|| {
        config
            .owner
            .email
            .clone()
            .with_name(config.owner.name.clone())
    });

    let ok = email_service
        .send(Email {
            recipient: recipient.clone(),
            subject: "Email Deliverability Test".into(),
            body: format!(
                "Email deliverability for the contact form on {} seems to be working!",
                config.owner.site
            ),
            reply_to: None,
        })
        .await?;

    ensure!(ok, "Failed to send email to {recipient}");
    println!("Sent test email to {recipient}");

    Ok(())
}
