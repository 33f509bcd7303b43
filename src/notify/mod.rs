//! Live-update notification subsystem.
//!
//! # Data Flow
//! ```text
//! WebSocket accepted
//!     → registry.rs (connect: id + outbound queue)
//!     → poll.rs (WAIT → CHECK against the catalog store)
//!     → message.rs ({"tipo":"recargar", ...})
//!     → registry.rs (send to this connection, or broadcast)
//!     → socket writer drains the queue
//! ```

pub mod connection;
pub mod message;
pub mod poll;
pub mod registry;

pub use connection::ConnectionId;
pub use message::Notice;
pub use poll::{PollExit, PollLoop};
pub use registry::{ConnectionRegistry, Registration};
