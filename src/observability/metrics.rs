//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_reloads_total` (counter): reload attempts by outcome
//! - `catalog_products` (gauge): products in the current catalog
//! - `live_connections` (gauge): open live-update connections
//! - `live_notifications_total` (counter): reload notices delivered
//! - `search_requests_total` (counter): search API calls
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_reload(outcome: &'static str) {
    metrics::counter!("catalog_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_catalog_size(products: usize) {
    metrics::gauge!("catalog_products").set(products as f64);
}

pub fn record_connections(open: usize) {
    metrics::gauge!("live_connections").set(open as f64);
}

pub fn record_notifications(delivered: usize) {
    metrics::counter!("live_notifications_total").increment(delivered as u64);
}

pub fn record_search() {
    metrics::counter!("search_requests_total").increment(1);
}
