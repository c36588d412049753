use std::future::Future;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RelayApiService: Send + Sync + 'static {
    /// Submits a contact message to the third party email relay.
    ///
    /// Transport errors and responses that cannot be interpreted are returned
    /// as `Err`. A failure reported by the relay itself is `Ok` with
    /// `success == false`.
    fn submit(
        &self,
        request: &RelaySubmitRequest,
    ) -> impl Future<Output = anyhow::Result<RelaySubmitResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySubmitRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySubmitResponse {
    pub success: bool,
    pub message: Option<String>,
}

#[cfg(feature = "mock")]
impl MockRelayApiService {
    pub fn with_submit(mut self, request: RelaySubmitRequest, result: RelaySubmitResponse) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_submit_error(mut self, request: RelaySubmitRequest, error: &'static str) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(move |_| Box::pin(std::future::ready(Err(anyhow::anyhow!(error)))));
        self
    }
}
