//! Live-update WebSocket endpoint.
//!
//! # Data Flow
//! ```text
//! Client ──upgrade──→ /ws → registry.connect
//!                          ├─ writer task: outbox → socket
//!                          ├─ reader: drains client frames until close
//!                          └─ poll loop: WAIT → CHECK → notice
//! ```
//!
//! Client frames other than close are ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{stream::SplitStream, SinkExt, StreamExt};

use crate::http::server::AppState;
use crate::notify::{PollExit, PollLoop, Registration};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

async fn run_session(socket: WebSocket, state: AppState) {
    let Registration { id, mut outbox } = state.registry.connect();
    let (mut sink, mut stream) = socket.split();
    let mut shutdown = state.shutdown.subscribe();

    // Ends once the registry drops this connection's sender or the peer is gone.
    let mut writer = tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                return;
            }
        }
        let _ = sink.close().await;
    });

    let closed = async {
        tokio::select! {
            _ = drain(&mut stream) => PollExit::PeerClosed,
            _ = &mut writer => PollExit::PeerClosed,
            _ = shutdown.recv() => PollExit::Shutdown,
        }
    };

    let poll = PollLoop::new(
        id,
        state.store.clone(),
        state.registry.clone(),
        state.live.poll_interval(),
        state.live.notify_mode,
    );
    let exit = poll.run(closed).await;

    match exit {
        PollExit::CheckFailed => tracing::warn!(connection = %id, "Live session torn down after failed check"),
        other => tracing::debug!(connection = %id, reason = ?other, "Live session ended"),
    }
}

async fn drain(stream: &mut SplitStream<WebSocket>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}
