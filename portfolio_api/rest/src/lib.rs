use std::{net::SocketAddr, sync::Arc};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use portfolio_core_contact_contracts::ContactService;
use portfolio_core_health_contracts::HealthFeatureService;
use portfolio_utils::Apply;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

mod errors;
mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Origins that may call the API from a browser. CORS is disabled if
    /// this is empty.
    pub allowed_origins: Arc<[HeaderValue]>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let cors = cors_layer(&self.config.allowed_origins);

        Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::trace::add)
            .apply(middlewares::request_id::add)
            .apply_map(cors, |router, cors| router.layer(cors))
    }
}

fn cors_layer(allowed_origins: &[HeaderValue]) -> Option<CorsLayer> {
    (!allowed_origins.is_empty()).then(|| {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    })
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use portfolio_core_contact_contracts::MockContactService;
    use portfolio_core_health_contracts::MockHealthFeatureService;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn sut(allowed_origins: &[&'static str]) -> Router<()> {
        RestServer::new(
            MockHealthFeatureService::new(),
            MockContactService::new(),
            RestServerConfig {
                addr: ([127, 0, 0, 1], 0).into(),
                allowed_origins: allowed_origins
                    .iter()
                    .map(|origin| HeaderValue::from_static(origin))
                    .collect(),
            },
        )
        .router()
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/contact")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_allowed_origin() {
        let response = sut(&["https://brightsafari.space"])
            .oneshot(preflight("https://brightsafari.space"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://brightsafari.space"))
        );
    }

    #[tokio::test]
    async fn cors_unknown_origin() {
        let response = sut(&["https://brightsafari.space"])
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            None
        );
    }

    #[tokio::test]
    async fn cors_disabled() {
        let response = sut(&[])
            .oneshot(preflight("https://brightsafari.space"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            None
        );
    }
}
