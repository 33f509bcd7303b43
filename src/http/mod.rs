//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → api.rs (search, history, health)    → JSON response
//!     → websocket.rs (/ws upgrade)          → live-update session
//!     → ServeFile / ServeDir                → pages and assets
//! ```

pub mod api;
pub mod request;
pub mod server;
pub mod websocket;

pub use request::{RequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
