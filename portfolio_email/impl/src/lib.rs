use anyhow::anyhow;
use lettre::{
    message::{header, MessageBuilder},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::email_address::EmailAddressWithName;
use portfolio_utils::Apply;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: Transport,
}

#[derive(Debug, Clone)]
enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    /// Only logs outgoing messages and reports them as delivered.
    Log,
}

impl EmailServiceImpl {
    pub async fn new(url: &str, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build();

        Ok(Self {
            from,
            transport: Transport::Smtp(transport),
        })
    }

    pub fn log(from: EmailAddressWithName) -> Self {
        Self {
            from,
            transport: Transport::Log,
        }
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to, |builder, reply_to| {
                MessageBuilder::reply_to(builder, reply_to.0)
            })
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let recipient = email.recipient.to_string();
        let subject = email.subject.clone();
        let message = self.build_message(email)?;

        match &self.transport {
            Transport::Smtp(transport) => transport
                .send(message)
                .await
                .map(|response| response.is_positive())
                .map_err(Into::into),
            Transport::Log => {
                info!(%recipient, %subject, "email transport disabled, not sending message");
                debug!(
                    "message body:\n{}",
                    String::from_utf8_lossy(&message.formatted())
                );
                Ok(true)
            }
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match &self.transport {
            Transport::Smtp(transport) => transport
                .test_connection()
                .await?
                .then_some(())
                .ok_or_else(|| anyhow!("Failed to ping smtp server")),
            Transport::Log => Ok(()),
        }
    }
}
