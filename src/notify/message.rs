//! Server → client messages on the live-update channel.

use serde::{Deserialize, Serialize};

/// Text shown to users when the catalog changes.
pub const RELOAD_TEXT: &str = "Datos actualizados";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The catalog was reloaded; clients should re-run their query.
    Recargar,
}

/// A notice pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "tipo")]
    pub kind: NoticeKind,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl Notice {
    pub fn reload() -> Self {
        Self {
            kind: NoticeKind::Recargar,
            message: RELOAD_TEXT.to_string(),
        }
    }

    /// Serialize to the JSON text frame sent over the socket.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
