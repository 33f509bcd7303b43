//! Registry of live-update connections.
//!
//! # Responsibilities
//! - Track which connections are open
//! - Deliver a message to one connection or to all of them
//! - Drop connections whose outbound queue is gone
//!
//! # Design Decisions
//! - Each connection owns an unbounded queue drained by its socket writer,
//!   so sending never waits on a slow peer
//! - A failed send is treated as a disconnect and never reported as an error

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::notify::connection::ConnectionId;
use crate::observability::metrics;

/// Handle returned on connect: the id plus the queue the socket writer drains.
#[derive(Debug)]
pub struct Registration {
    pub id: ConnectionId,
    pub outbox: mpsc::UnboundedReceiver<String>,
}

/// Concurrent set of open connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly accepted connection.
    pub fn connect(&self) -> Registration {
        let (tx, outbox) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        self.connections.insert(id, tx);

        let total = self.connections.len();
        metrics::record_connections(total);
        tracing::info!(connection = %id, total, "Client connected");

        Registration { id, outbox }
    }

    /// Remove a connection. Removing an unknown id is a no-op.
    /// Returns whether the connection was registered.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.connections.remove(&id).is_some();
        if removed {
            let total = self.connections.len();
            metrics::record_connections(total);
            tracing::info!(connection = %id, total, "Client disconnected");
        }
        removed
    }

    /// Deliver to one connection. A closed connection is removed and
    /// reported as not delivered.
    pub fn send(&self, id: ConnectionId, message: &str) -> bool {
        let delivered = match self.connections.get(&id) {
            Some(tx) => tx.send(message.to_string()).is_ok(),
            None => return false,
        };

        if !delivered {
            self.disconnect(id);
        }
        delivered
    }

    /// Deliver to every connection, removing the ones that fail.
    /// Returns the number of successful deliveries.
    pub fn broadcast(&self, message: &str) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for entry in self.connections.iter() {
            if entry.value().send(message.to_string()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*entry.key());
            }
        }

        for id in dead {
            tracing::debug!(connection = %id, "Dropping closed connection during broadcast");
            self.disconnect(id);
        }
        delivered
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
