//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server stops accepting → poll loops exit → process ends
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
