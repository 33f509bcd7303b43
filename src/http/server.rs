//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve the HTML pages and static assets
//! - Bind server to listener and shut down gracefully

use axum::{http::HeaderName, routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::catalog::{CatalogStore, XlsxSource};
use crate::config::{LiveConfig, ServiceConfig};
use crate::http::{api, websocket};
use crate::http::request::{RequestUuid, X_REQUEST_ID};
use crate::lifecycle::{signals, Shutdown};
use crate::notify::ConnectionRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub shutdown: Shutdown,
    pub live: LiveConfig,
    pub history_path: Arc<PathBuf>,
}

/// HTTP server for the price lookup service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the configured `.xlsx` sheet.
    ///
    /// Writes the sample sheet if it is missing and performs the first load.
    pub fn new(config: ServiceConfig) -> Self {
        let store = CatalogStore::open(
            XlsxSource::new(config.catalog.data_path.clone()),
            config.catalog.default_search_limit,
        );
        Self::with_store(config, Arc::new(store))
    }

    /// Create a server around an existing store.
    pub fn with_store(config: ServiceConfig, store: Arc<CatalogStore>) -> Self {
        let state = AppState {
            store,
            registry: Arc::new(ConnectionRegistry::new()),
            shutdown: Shutdown::new(),
            live: config.live.clone(),
            history_path: Arc::new(config.catalog.history_path.clone()),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let templates = &config.site.templates_dir;
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/api/productos/buscar", get(api::search_products))
            .route("/api/historial", get(api::history))
            .route("/health", get(api::health))
            .route("/ws", get(websocket::ws_handler))
            .with_state(state)
            .route_service("/", ServeFile::new(templates.join("index.html")))
            .route_service("/seleccion", ServeFile::new(templates.join("seleccion.html")))
            .route_service("/historial", ServeFile::new(templates.join("historial.html")))
            .nest_service("/static", ServeDir::new(&config.site.static_dir))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, RequestUuid))
    }

    /// Run the server, accepting connections on the given listener, until
    /// the shutdown coordinator fires or the process receives SIGINT/SIGTERM.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            products = self.state.store.snapshot().len(),
            poll_interval_ms = self.state.live.poll_interval_ms,
            "HTTP server starting"
        );

        let shutdown = self.state.shutdown.clone();
        let mut stop = shutdown.subscribe();

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = signals::wait_for_signal() => shutdown.trigger(),
                    _ = stop.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Handle that stops the server and every live session.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.state.shutdown.clone()
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
