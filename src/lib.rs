//! Price lookup service library.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;

pub use catalog::CatalogStore;
pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
