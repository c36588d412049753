use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

const SUBMIT_ROUTE: &str = "/ajax/:recipient";

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting email relay testing server on {host}:{port}");
    info!("Relay endpoint: http://{host}:{port}/ajax/<recipient>");
    info!(
        "Submissions are accepted unless the message contains \"fail\" (reported by the relay) \
         or \"crash\" (HTTP 500 without a JSON body)"
    );

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router())
        .await
        .context("Failed to start HTTP server")
}

/// Starts the testing server on a random local port in the background and
/// returns the endpoint url for `recipient`.
pub async fn spawn(recipient: &str) -> anyhow::Result<Url> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router()).await });

    format!("http://{addr}/ajax/{recipient}")
        .parse()
        .map_err(Into::into)
}

pub fn router() -> Router<()> {
    Router::new().route(SUBMIT_ROUTE, routing::post(submit))
}

#[derive(Deserialize)]
struct SubmitRequest {
    name: String,
    email: String,
    message: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    success: &'static str,
    message: String,
}

async fn submit(Path(recipient): Path<String>, Json(request): Json<SubmitRequest>) -> Response {
    info!(
        %recipient,
        name = request.name,
        email = request.email,
        "received submission"
    );

    if request.message.contains("crash") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let response = if request.message.contains("fail") {
        SubmitResponse {
            success: "false",
            message: "The form could not be submitted.".into(),
        }
    } else {
        SubmitResponse {
            success: "true",
            message: "The form was submitted successfully.".into(),
        }
    };

    Json(response).into_response()
}
