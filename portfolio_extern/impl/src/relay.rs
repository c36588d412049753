use std::sync::Arc;

use anyhow::anyhow;
use portfolio_extern_contracts::relay::{
    RelayApiService, RelaySubmitRequest, RelaySubmitResponse,
};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct RelayApiServiceImpl {
    config: RelayApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct RelayApiServiceConfig {
    pub endpoint: Arc<Url>,
}

impl RelayApiServiceImpl {
    pub fn new(config: RelayApiServiceConfig, client: HttpClient) -> Self {
        Self { config, client }
    }
}

impl RelayApiService for RelayApiServiceImpl {
    async fn submit(&self, request: &RelaySubmitRequest) -> anyhow::Result<RelaySubmitResponse> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .header(ACCEPT, "application/json")
            .json(&SubmitRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        match response.json::<SubmitResponse>().await {
            Ok(body) => Ok(RelaySubmitResponse {
                success: status.is_success() && body.success.is_some_and(SuccessFlag::is_true),
                message: body.message,
            }),
            Err(err) if status.is_success() => Err(err.into()),
            Err(_) => Err(anyhow!("relay responded with status {status}")),
        }
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    subject: &'a str,
    message: &'a str,
    #[serde(rename = "_subject")]
    mail_subject: String,
    #[serde(rename = "_template")]
    template: &'static str,
}

impl<'a> From<&'a RelaySubmitRequest> for SubmitRequest<'a> {
    fn from(value: &'a RelaySubmitRequest) -> Self {
        Self {
            name: &value.name,
            email: &value.email,
            phone: &value.phone,
            subject: &value.subject,
            message: &value.message,
            mail_subject: format!("New message from {}", value.name),
            template: "table",
        }
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: Option<SuccessFlag>,
    #[serde(default)]
    message: Option<String>,
}

/// Some relays report `"success": "true"` as a string instead of a boolean.
#[derive(Deserialize)]
#[serde(untagged)]
enum SuccessFlag {
    Bool(bool),
    Text(String),
}

impl SuccessFlag {
    fn is_true(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Text(value) => value == "true",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<bool> {
        serde_json::from_str::<SubmitResponse>(json)
            .ok()
            .map(|r| r.success.is_some_and(SuccessFlag::is_true))
    }

    #[test]
    fn success_flag() {
        for (input, expected) in [
            (r#"{"success": "true"}"#, Some(true)),
            (r#"{"success": true}"#, Some(true)),
            (r#"{"success": "false", "message": "nope"}"#, Some(false)),
            (r#"{"success": false}"#, Some(false)),
            (r#"{"success": "yes"}"#, Some(false)),
            (r#"{"success": "TRUE"}"#, Some(false)),
            (r#"{"message": "ambiguous"}"#, Some(false)),
            (r#"{"success": 1}"#, None),
            ("<html></html>", None),
        ] {
            assert_eq!(parse(input), expected, "{input}");
        }
    }

    #[test]
    fn request_body() {
        let request = RelaySubmitRequest {
            name: "Ada".into(),
            email: "ada@x.com".into(),
            phone: "".into(),
            subject: "job".into(),
            message: "Hi".into(),
        };

        let json = serde_json::to_value(SubmitRequest::from(&request)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ada",
                "email": "ada@x.com",
                "phone": "",
                "subject": "job",
                "message": "Hi",
                "_subject": "New message from Ada",
                "_template": "table",
            })
        );
    }
}
