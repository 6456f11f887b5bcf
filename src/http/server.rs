//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, client IP)
//! - Build the shared client IP resolver from config
//! - Serve until the shutdown signal fires

use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::handlers::{get_client_ip, get_health};
use crate::http::middleware::{client_ip_middleware, ClientIpState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::ipware::{ConfigurationError, HeaderIpWare};

/// HTTP server reporting each caller's resolved address.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails when the client IP settings are rejected by the resolver.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigurationError> {
        let ipware = Arc::new(HeaderIpWare::new(config.client_ip.options.clone())?);
        let state = ClientIpState {
            ipware,
            strict: config.client_ip.strict,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: ClientIpState) -> Router {
        Router::new()
            .route("/", get(get_client_ip))
            .route("/health", get(get_health))
            .layer(middleware::from_fn_with_state(state, client_ip_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            strict = self.config.client_ip.strict,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
