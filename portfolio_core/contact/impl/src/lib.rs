use std::{future::Future, sync::Arc, time::Duration};

use portfolio_core_contact_contracts::{
    channel::DeliveryChannel, ContactReceipt, ContactSendMessageError, ContactService,
};
use portfolio_models::{
    contact::{ContactRequest, Submission},
    delivery::{BackupEntry, Channel, ChannelResults, DeliveryResult},
};
use portfolio_persistence_contracts::backup::BackupRepository;
use portfolio_shared_contracts::time::TimeService;
use portfolio_templates_contracts::TemplateService;
use tracing::{debug, error, info, warn};
use url::Url;

pub use fallback::mailto_base;

mod fallback;
pub mod mail;
pub mod relay;
mod validate;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Template, Mail, Relay, Backup> {
    time: Time,
    template: Template,
    /// `None` if the channel is disabled.
    mail: Option<Mail>,
    relay: Option<Relay>,
    backup: Backup,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// `mailto:` link of the site owner, see [`mailto_base`].
    pub mailto: Arc<Url>,
    pub site: Arc<str>,
    pub channel_timeout: Duration,
}

impl<Time, Template, Mail, Relay, Backup> ContactFeatureServiceImpl<Time, Template, Mail, Relay, Backup> {
    pub fn new(
        time: Time,
        template: Template,
        mail: Option<Mail>,
        relay: Option<Relay>,
        backup: Backup,
        config: ContactFeatureConfig,
    ) -> Self {
        Self {
            time,
            template,
            mail,
            relay,
            backup,
            config,
        }
    }
}

enum DispatchState {
    Validating(ContactRequest),
    Dispatching(Submission),
    Settled(Result<ContactReceipt, ContactSendMessageError>),
}

impl<Time, Template, Mail, Relay, Backup> ContactService
    for ContactFeatureServiceImpl<Time, Template, Mail, Relay, Backup>
where
    Time: TimeService,
    Template: TemplateService,
    Mail: DeliveryChannel,
    Relay: DeliveryChannel,
    Backup: BackupRepository,
{
    #[tracing::instrument(level = "debug", skip_all)]
    async fn send_message(
        &self,
        request: ContactRequest,
    ) -> Result<ContactReceipt, ContactSendMessageError> {
        let mut state = DispatchState::Validating(request);
        loop {
            state = match state {
                DispatchState::Validating(request) => self.validate(request),
                DispatchState::Dispatching(submission) => self.dispatch(submission).await,
                DispatchState::Settled(result) => return result,
            };
        }
    }
}

impl<Time, Template, Mail, Relay, Backup> ContactFeatureServiceImpl<Time, Template, Mail, Relay, Backup>
where
    Time: TimeService,
    Template: TemplateService,
    Mail: DeliveryChannel,
    Relay: DeliveryChannel,
    Backup: BackupRepository,
{
    fn validate(&self, request: ContactRequest) -> DispatchState {
        match validate::validate(request, self.time.now()) {
            Ok(submission) => DispatchState::Dispatching(submission),
            Err(err) => {
                debug!(%err, "rejected contact request");
                DispatchState::Settled(Err(err.into()))
            }
        }
    }

    async fn dispatch(&self, submission: Submission) -> DispatchState {
        let (mail, relay) = tokio::join!(
            self.attempt(
                Channel::Mail,
                self.mail.as_ref().map(|mail| mail.deliver(&submission))
            ),
            self.attempt(
                Channel::Relay,
                self.relay.as_ref().map(|relay| relay.deliver(&submission))
            ),
        );
        let mut channels = ChannelResults::from_results(mail.iter().chain(&relay));

        // An entry can only be read back if the append succeeded.
        let entry = BackupEntry::new(
            &submission,
            ChannelResults {
                backup: true,
                ..channels
            },
        );
        // Unbounded: `backup` must reflect whether the entry is in the log.
        channels.backup = match self.backup.append(&entry).await {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to append submission to the backup log: {err:#}");
                false
            }
        };

        if channels.delivered() {
            info!(?channels, "delivered contact message");
            return DispatchState::Settled(Ok(ContactReceipt { channels }));
        }

        warn!(?channels, "all delivery channels failed, offering mailto link");
        DispatchState::Settled(Err(ContactSendMessageError::Send {
            channels,
            fallback: self.fallback_link(&submission),
        }))
    }

    /// Waits for a single delivery bounded by the channel timeout. Returns
    /// `None` if the channel is disabled.
    async fn attempt(
        &self,
        channel: Channel,
        delivery: Option<impl Future<Output = DeliveryResult>>,
    ) -> Option<DeliveryResult> {
        let Some(delivery) = delivery else {
            debug!(%channel, "channel is disabled");
            return None;
        };

        let timeout = self.config.channel_timeout;
        let result = tokio::time::timeout(timeout, delivery)
            .await
            .unwrap_or_else(|_| {
                DeliveryResult::failed(channel, format!("timed out after {timeout:?}"))
            });

        match &result.detail {
            None => debug!(%channel, success = result.success, "channel settled"),
            Some(detail) => warn!(%channel, success = result.success, "channel settled: {detail}"),
        }

        Some(result)
    }

    fn fallback_link(&self, submission: &Submission) -> Url {
        let template = mail::notification_template(submission, &self.config.site);
        let body = self.template.render(&template).unwrap_or_else(|err| {
            warn!("Failed to render mailto body: {err:#}");
            submission.message.to_string()
        });
        let subject = format!(
            "{} from {}",
            submission.subject.label(),
            *submission.author.name
        );
        fallback::mailto_link(&self.config.mailto, &subject, &body)
    }
}
