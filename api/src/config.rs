//! Server configuration.

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::{ApiError, ApiResult};

/// Origin allowed by default for cross-origin requests.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
    /// Development server URL advertised in the API document.
    pub dev_url: String,
    /// Production server URL advertised in the API document, if any.
    pub prod_url: Option<String>,
}

impl ApiConfig {
    /// Creates a configuration bound to `bind_addr` with default settings.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            dev_url: format!("http://localhost:{}", bind_addr.port()),
            prod_url: None,
        }
    }

    /// Replaces the allowed CORS origins.
    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the development server URL.
    pub fn with_dev_url(mut self, url: impl Into<String>) -> Self {
        self.dev_url = url.into();
        self
    }

    /// Sets the production server URL.
    pub fn with_prod_url(mut self, url: impl Into<String>) -> Self {
        self.prod_url = Some(url.into());
        self
    }

    /// Builds the CORS layer for the configured origins.
    ///
    /// Fails if an origin is not a valid header value.
    pub fn cors_layer(&self) -> ApiResult<CorsLayer> {
        let origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ApiError::Config(format!("invalid CORS origin: {origin:?}")))
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}
