use std::{sync::Arc, time::Duration};

use portfolio_core_contact_contracts::channel::DeliveryChannel;
use portfolio_email_contracts::{Email, EmailService};
use portfolio_models::{
    contact::Submission,
    delivery::{Channel, DeliveryResult},
    email_address::EmailAddressWithName,
};
use portfolio_templates_contracts::{CopyTemplate, NotificationTemplate, TemplateService};
use tracing::{debug, warn, Instrument};

/// Sends the submission to the site owner via the [`EmailService`] and, if
/// requested, a copy back to the sender.
#[derive(Debug, Clone)]
pub struct MailChannel<Email, Template> {
    email: Arc<Email>,
    template: Template,
    config: MailChannelConfig,
}

#[derive(Debug, Clone)]
pub struct MailChannelConfig {
    pub owner: Arc<EmailAddressWithName>,
    pub site: Arc<str>,
    pub copy_timeout: Duration,
}

impl<Email, Template> MailChannel<Email, Template> {
    pub fn new(email: Email, template: Template, config: MailChannelConfig) -> Self {
        Self {
            email: email.into(),
            template,
            config,
        }
    }
}

impl<EmailS, TemplateS> DeliveryChannel for MailChannel<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn deliver(&self, submission: &Submission) -> DeliveryResult {
        let result = match self.notify_owner(submission).await {
            Ok(true) => DeliveryResult::delivered(Channel::Mail),
            Ok(false) => DeliveryResult::failed(Channel::Mail, "mail server rejected the message"),
            Err(err) => DeliveryResult::failed(Channel::Mail, format!("{err:#}")),
        };

        if submission.copy_requested {
            self.spawn_copy(submission);
        }

        result
    }
}

impl<EmailS, TemplateS> MailChannel<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn notify_owner(&self, submission: &Submission) -> anyhow::Result<bool> {
        let body = self
            .template
            .render(&notification_template(submission, &self.config.site))?;

        let author = &submission.author;
        self.email
            .send(Email {
                recipient: (*self.config.owner).clone(),
                subject: submission.subject.label().into(),
                body,
                reply_to: Some(author.email.clone().with_name(author.name.to_string())),
            })
            .await
    }

    /// Sends the copy to the sender in a background task bounded by
    /// `copy_timeout`. The outcome is only logged.
    fn spawn_copy(&self, submission: &Submission) {
        let Some(copy) = self.copy_email(submission) else {
            return;
        };

        let email = Arc::clone(&self.email);
        let timeout = self.config.copy_timeout;
        tokio::spawn(
            async move {
                match tokio::time::timeout(timeout, email.send(copy)).await {
                    Ok(Ok(true)) => debug!("sent copy to the sender"),
                    Ok(Ok(false)) => warn!("mail server rejected the copy for the sender"),
                    Ok(Err(err)) => warn!("Failed to send copy to the sender: {err:#}"),
                    Err(_) => warn!("Sending the copy to the sender timed out after {timeout:?}"),
                }
            }
            .in_current_span(),
        );
    }

    fn copy_email(&self, submission: &Submission) -> Option<Email> {
        let owner = &*self.config.owner;
        let sender = &submission.author.email;
        if sender.eq_ignore_case(&owner.clone().into_email_address()) {
            debug!("sender is the owner, not sending a copy");
            return None;
        }

        let owner_name = owner_name(owner);
        let body = self
            .template
            .render(&CopyTemplate {
                owner_name: owner_name.into(),
                owner_email: owner.as_str().into(),
                message: submission.message.to_string(),
            })
            .inspect_err(|err| warn!("Failed to render copy email: {err:#}"))
            .ok()?;

        Some(Email {
            recipient: sender
                .clone()
                .with_name(submission.author.name.to_string()),
            subject: format!("Copy of your message to {owner_name}"),
            body,
            reply_to: Some(owner.clone()),
        })
    }
}

fn owner_name(owner: &EmailAddressWithName) -> &str {
    owner.name().unwrap_or_else(|| owner.as_str())
}

pub(crate) fn notification_template(submission: &Submission, site: &str) -> NotificationTemplate {
    let author = &submission.author;
    NotificationTemplate {
        name: author.name.to_string(),
        email: author.email.to_string(),
        phone: author.phone.as_ref().map(|phone| phone.to_string()),
        subject_label: submission.subject.label().into(),
        message: submission.message.to_string(),
        site: site.into(),
    }
}

#[cfg(test)]
mod tests {
    use portfolio_email_contracts::MockEmailService;
    use portfolio_models::contact::SubmissionAuthor;
    use portfolio_templates_contracts::MockTemplateService;
    use pretty_assertions::assert_eq;

    use super::*;

    type Sut = MailChannel<MockEmailService, MockTemplateService>;

    fn config() -> MailChannelConfig {
        MailChannelConfig {
            owner: Arc::new("Bright Safari <owner@example.com>".parse().unwrap()),
            site: "brightsafari.space".into(),
            copy_timeout: Duration::from_secs(5),
        }
    }

    fn submission(copy_requested: bool) -> Submission {
        Submission {
            author: SubmissionAuthor {
                name: "Ada".try_into().unwrap(),
                email: "ada@x.com".parse().unwrap(),
                phone: None,
            },
            subject: "job".try_into().unwrap(),
            message: "Hi".try_into().unwrap(),
            copy_requested,
            submitted_at: chrono::DateTime::from_timestamp(1_714_564_800, 0).unwrap(),
        }
    }

    fn owner_email() -> Email {
        Email {
            recipient: "Bright Safari <owner@example.com>".parse().unwrap(),
            subject: "Job Opportunity".into(),
            body: "notification".into(),
            reply_to: Some("Ada <ada@x.com>".parse().unwrap()),
        }
    }

    fn copy_template() -> CopyTemplate {
        CopyTemplate {
            owner_name: "Bright Safari".into(),
            owner_email: "owner@example.com".into(),
            message: "Hi".into(),
        }
    }

    fn copy_email() -> Email {
        Email {
            recipient: "Ada <ada@x.com>".parse().unwrap(),
            subject: "Copy of your message to Bright Safari".into(),
            body: "copy".into(),
            reply_to: Some("Bright Safari <owner@example.com>".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let submission = submission(false);

        let template = MockTemplateService::new().with_render(
            notification_template(&submission, "brightsafari.space"),
            "notification".into(),
        );
        let email = MockEmailService::new().with_send(owner_email(), true);

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;

        // Assert
        assert_eq!(result, DeliveryResult::delivered(Channel::Mail));
    }

    #[tokio::test]
    async fn ok_with_copy() {
        // Arrange
        let submission = submission(true);

        let template = MockTemplateService::new()
            .with_render(
                notification_template(&submission, "brightsafari.space"),
                "notification".into(),
            )
            .with_render(copy_template(), "copy".into());
        let email = MockEmailService::new()
            .with_send(owner_email(), true)
            .with_send(copy_email(), true);

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;
        tokio::task::yield_now().await;

        // Assert
        assert_eq!(result, DeliveryResult::delivered(Channel::Mail));
    }

    #[tokio::test]
    async fn no_copy_to_owner() {
        // Arrange
        let submission = Submission {
            author: SubmissionAuthor {
                email: "Owner@Example.com".parse().unwrap(),
                ..submission(true).author
            },
            ..submission(true)
        };

        let template = MockTemplateService::new().with_render(
            notification_template(&submission, "brightsafari.space"),
            "notification".into(),
        );
        let email = MockEmailService::new().with_send(
            Email {
                reply_to: Some("Ada <Owner@Example.com>".parse().unwrap()),
                ..owner_email()
            },
            true,
        );

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;

        // Assert
        assert_eq!(result, DeliveryResult::delivered(Channel::Mail));
    }

    #[tokio::test]
    async fn failed_copy_does_not_fail_channel() {
        // Arrange
        let submission = submission(true);

        let template = MockTemplateService::new()
            .with_render(
                notification_template(&submission, "brightsafari.space"),
                "notification".into(),
            )
            .with_render(copy_template(), "copy".into());
        let email = MockEmailService::new()
            .with_send(owner_email(), true)
            .with_send_error(copy_email(), "connection reset");

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;
        tokio::task::yield_now().await;

        // Assert
        assert_eq!(result, DeliveryResult::delivered(Channel::Mail));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_copy_does_not_delay_delivery() {
        // Arrange
        let submission = submission(true);

        let template = MockTemplateService::new()
            .with_render(
                notification_template(&submission, "brightsafari.space"),
                "notification".into(),
            )
            .with_render(copy_template(), "copy".into());
        let mut email = MockEmailService::new().with_send(owner_email(), true);
        email
            .expect_send()
            .once()
            .with(mockall::predicate::eq(copy_email()))
            .return_once(|_| Box::pin(std::future::pending()));

        let sut = Sut::new(email, template, config());
        let start = tokio::time::Instant::now();

        // Act
        let result = sut.deliver(&submission).await;
        let elapsed = start.elapsed();
        tokio::task::yield_now().await;

        // Assert
        assert_eq!(result, DeliveryResult::delivered(Channel::Mail));
        assert_eq!(elapsed, Duration::ZERO);
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let submission = submission(false);

        let template = MockTemplateService::new().with_render(
            notification_template(&submission, "brightsafari.space"),
            "notification".into(),
        );
        let email = MockEmailService::new().with_send(owner_email(), false);

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;

        // Assert
        assert_eq!(
            result,
            DeliveryResult::failed(Channel::Mail, "mail server rejected the message")
        );
    }

    #[tokio::test]
    async fn transport_error() {
        // Arrange
        let submission = submission(false);

        let template = MockTemplateService::new().with_render(
            notification_template(&submission, "brightsafari.space"),
            "notification".into(),
        );
        let email = MockEmailService::new().with_send_error(owner_email(), "connection refused");

        let sut = Sut::new(email, template, config());

        // Act
        let result = sut.deliver(&submission).await;

        // Assert
        assert_eq!(
            result,
            DeliveryResult::failed(Channel::Mail, "connection refused")
        );
    }
}
