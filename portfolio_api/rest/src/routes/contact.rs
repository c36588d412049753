use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactReceipt, ContactSendMessageError, ContactService};

use crate::{
    extractors::json_or_form::JsonOrForm,
    models::contact::{ApiContactMessage, ApiContactResponse},
};

const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(send_message))
        .route("/contact.php", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    JsonOrForm(message): JsonOrForm<ApiContactMessage>,
) -> Response {
    let (code, response) = match service.send_message(message.into()).await {
        Ok(ContactReceipt { channels }) => (
            StatusCode::OK,
            ApiContactResponse {
                success: true,
                message: SUCCESS_MESSAGE.into(),
                per_channel: Some(channels),
                fallback: None,
            },
        ),
        Err(err) => {
            let (code, per_channel, fallback) = match &err {
                ContactSendMessageError::Validation(_) => (StatusCode::BAD_REQUEST, None, None),
                ContactSendMessageError::Send { channels, fallback } => (
                    StatusCode::BAD_GATEWAY,
                    Some(*channels),
                    Some(fallback.to_string()),
                ),
            };
            (
                code,
                ApiContactResponse {
                    success: false,
                    message: err.to_string(),
                    per_channel,
                    fallback,
                },
            )
        }
    };

    (code, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use portfolio_core_contact_contracts::{MockContactService, ValidationError};
    use portfolio_models::{
        contact::{ContactField, ContactRequest},
        delivery::ChannelResults,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: Some("Ada".into()),
            email: Some("ada@x.com".into()),
            phone: None,
            subject: Some("job".into()),
            message: Some("Hi".into()),
            copy_requested: false,
        }
    }

    async fn post(
        service: MockContactService,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = router(service.into())
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or_default())
    }

    fn json_body() -> String {
        json!({"name": "Ada", "email": "ada@x.com", "subject": "job", "message": "Hi"})
            .to_string()
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactService::new().with_send_message(
            request(),
            Ok(ContactReceipt {
                channels: ChannelResults {
                    mail: true,
                    relay: false,
                    backup: true,
                },
            }),
        );

        // Act
        let result = post(service, "/contact", "application/json", json_body()).await;

        // Assert
        assert_eq!(
            result,
            (
                StatusCode::OK,
                json!({
                    "success": true,
                    "message": "Message sent successfully! I'll get back to you soon.",
                    "perChannel": {"mail": true, "relay": false, "backup": true},
                })
            )
        );
    }

    #[tokio::test]
    async fn ok_legacy_form() {
        // Arrange
        let service = MockContactService::new().with_send_message(
            ContactRequest {
                phone: Some("".into()),
                copy_requested: true,
                ..request()
            },
            Ok(ContactReceipt {
                channels: ChannelResults {
                    mail: true,
                    relay: true,
                    backup: true,
                },
            }),
        );

        // Act
        let result = post(
            service,
            "/contact.php",
            "application/x-www-form-urlencoded",
            "name=Ada&email=ada%40x.com&phone=&subject=job&message=Hi&copyMe=on",
        )
        .await;

        // Assert
        assert_eq!(result.0, StatusCode::OK);
        assert_eq!(result.1["success"], json!(true));
    }

    #[tokio::test]
    async fn validation_error() {
        // Arrange
        let service = MockContactService::new().with_send_message(
            ContactRequest {
                message: None,
                ..request()
            },
            Err(ValidationError::Missing(ContactField::Message).into()),
        );

        // Act
        let result = post(
            service,
            "/contact",
            "application/json",
            json!({"name": "Ada", "email": "ada@x.com", "subject": "job"}).to_string(),
        )
        .await;

        // Assert
        assert_eq!(
            result,
            (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": "Please fill in all required fields (message is missing).",
                })
            )
        );
    }

    #[tokio::test]
    async fn all_channels_failed() {
        // Arrange
        let fallback: url::Url =
            "mailto:owner@example.com?subject=Job%20Opportunity%20from%20Ada&body=Hi"
                .parse()
                .unwrap();
        let service = MockContactService::new().with_send_message(
            request(),
            Err(ContactSendMessageError::Send {
                channels: ChannelResults {
                    mail: false,
                    relay: false,
                    backup: true,
                },
                fallback,
            }),
        );

        // Act
        let result = post(service, "/contact", "application/json", json_body()).await;

        // Assert
        assert_eq!(
            result,
            (
                StatusCode::BAD_GATEWAY,
                json!({
                    "success": false,
                    "message": "All sending methods failed. Please try emailing directly.",
                    "perChannel": {"mail": false, "relay": false, "backup": true},
                    "fallback": "mailto:owner@example.com?subject=Job%20Opportunity%20from%20Ada&body=Hi",
                })
            )
        );
    }

    #[tokio::test]
    async fn malformed_json() {
        // Arrange
        let service = MockContactService::new();

        // Act
        let result = post(service, "/contact", "application/json", "{\"name\":").await;

        // Assert
        assert!(result.0.is_client_error());
    }
}
