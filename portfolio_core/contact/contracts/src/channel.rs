use std::future::Future;

use portfolio_models::{contact::Submission, delivery::DeliveryResult};

/// A single way of delivering a submission to the site owner.
///
/// Implementations never fail: every error is turned into an unsuccessful
/// [`DeliveryResult`], and responses that cannot be interpreted count as
/// failures.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait DeliveryChannel: Send + Sync + 'static {
    fn deliver(&self, submission: &Submission) -> impl Future<Output = DeliveryResult> + Send;
}

#[cfg(feature = "mock")]
impl MockDeliveryChannel {
    pub fn with_deliver(mut self, submission: Submission, result: DeliveryResult) -> Self {
        self.expect_deliver()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    /// Expects a delivery that never completes.
    pub fn with_deliver_pending(mut self, submission: Submission) -> Self {
        self.expect_deliver()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::pending()));
        self
    }
}
