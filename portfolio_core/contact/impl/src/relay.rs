use portfolio_core_contact_contracts::channel::DeliveryChannel;
use portfolio_extern_contracts::relay::{RelayApiService, RelaySubmitRequest};
use portfolio_models::{
    contact::Submission,
    delivery::{Channel, DeliveryResult},
};

/// Forwards the submission to the third party email relay.
#[derive(Debug, Clone)]
pub struct RelayChannel<RelayApi> {
    relay_api: RelayApi,
}

impl<RelayApi> RelayChannel<RelayApi> {
    pub fn new(relay_api: RelayApi) -> Self {
        Self { relay_api }
    }
}

impl<RelayApi: RelayApiService> DeliveryChannel for RelayChannel<RelayApi> {
    async fn deliver(&self, submission: &Submission) -> DeliveryResult {
        match self.relay_api.submit(&make_request(submission)).await {
            Ok(response) if response.success => DeliveryResult::delivered(Channel::Relay),
            Ok(response) => DeliveryResult::failed(
                Channel::Relay,
                response
                    .message
                    .unwrap_or_else(|| "relay reported a failure".into()),
            ),
            Err(err) => DeliveryResult::failed(Channel::Relay, format!("{err:#}")),
        }
    }
}

fn make_request(submission: &Submission) -> RelaySubmitRequest {
    let author = &submission.author;
    RelaySubmitRequest {
        name: author.name.to_string(),
        email: author.email.to_string(),
        phone: author
            .phone
            .as_ref()
            .map(|phone| phone.to_string())
            .unwrap_or_default(),
        subject: submission.subject.to_string(),
        message: submission.message.to_string(),
    }
}
