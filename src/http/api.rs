//! JSON API handlers.

use std::time::UNIX_EPOCH;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{load_history, ProductRecord};
use crate::http::server::AppState;
use crate::notify::Notice;
use crate::observability::metrics;

/// Query string of `/api/productos/buscar`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limite: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub productos: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub historial: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub productos: usize,
    /// Unix seconds of the loaded sheet's modification time.
    pub last_loaded_at: Option<u64>,
    pub connections: usize,
}

/// Search the catalog, picking up sheet changes first.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    metrics::record_search();

    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.reload_if_changed()).await {
        Ok(true) => notify_reload(&state),
        Ok(false) => {}
        Err(e) => tracing::error!(error = %e, "Reload check before search failed"),
    }

    let limit = params.limite.unwrap_or_else(|| state.store.default_limit());
    let productos = state.store.search(&params.q, limit);
    tracing::debug!(query = %params.q, limit, hits = productos.len(), "Search");

    Json(SearchResponse { productos })
}

/// A search consumed the change, so no poll loop will see it. Tell every client.
fn notify_reload(state: &AppState) {
    let text = match Notice::reload().to_text() {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode reload notice");
            return;
        }
    };

    let delivered = state.registry.broadcast(&text);
    metrics::record_notifications(delivered);
    tracing::info!(delivered, "Reload notice broadcast after search");
}

/// Return the change history document verbatim.
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let path = state.history_path.clone();
    let historial = match tokio::task::spawn_blocking(move || load_history(&path)).await {
        Ok(history) => history,
        Err(e) => {
            tracing::error!(error = %e, "History read task failed");
            Value::Array(Vec::new())
        }
    };

    Json(HistoryResponse { historial })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.store.snapshot();
    let last_loaded_at = catalog
        .last_loaded_at()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    Json(HealthResponse {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        productos: catalog.len(),
        last_loaded_at,
        connections: state.registry.len(),
    })
}
