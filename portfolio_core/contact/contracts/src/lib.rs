use std::future::Future;

use portfolio_models::{
    contact::{ContactField, ContactRequest},
    delivery::ChannelResults,
};
use thiserror::Error;
use url::Url;

pub mod channel;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validates the contact request and tries to deliver it on every enabled
    /// channel.
    ///
    /// Succeeds if at least one primary channel (mail or relay) confirmed the
    /// delivery. Every valid submission is appended to the backup log,
    /// regardless of the outcome.
    fn send_message(
        &self,
        request: ContactRequest,
    ) -> impl Future<Output = Result<ContactReceipt, ContactSendMessageError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub channels: ChannelResults,
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("All sending methods failed. Please try emailing directly.")]
    Send {
        channels: ChannelResults,
        /// Prefilled `mailto:` link the user can fall back to.
        fallback: Url,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields ({0} is missing).")]
    Missing(ContactField),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("The {0} field is too long.")]
    TooLong(ContactField),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        request: ContactRequest,
        result: Result<ContactReceipt, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
