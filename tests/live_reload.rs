//! Live-update channel: reload notices, disconnects and shutdown.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use price_lookup::config::NotifyMode;
use price_lookup::http::api::HealthResponse;
use price_lookup::notify::Notice;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

mod common;

type Socket = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(server: &common::TestServer) -> Socket {
    let (socket, _) = connect_async(server.ws_url().as_str()).await.expect("ws connect failed");
    socket
}

/// Next text frame as a notice, or `None` if nothing arrives in time.
async fn next_notice(socket: &mut Socket, wait: Duration) -> Option<Notice> {
    loop {
        match timeout(wait, socket.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return serde_json::from_str(text.as_str()).ok(),
            Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) | Ok(None) | Err(_) => return None,
            Ok(Some(Ok(_))) => continue,
        }
    }
}

async fn connections(server: &common::TestServer) -> usize {
    let health: HealthResponse = common::http_client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    health.connections
}

#[tokio::test]
async fn test_sheet_change_sends_one_reload_notice() {
    let server = common::start_server(|_, _| {}).await;
    let mut socket = connect(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    common::rewrite_sheet(&server.data_path, &[("RON AÑEJO", 9.0, 215.0)]);

    let notice = next_notice(&mut socket, Duration::from_secs(3)).await.expect("no reload notice");
    assert_eq!(notice, Notice::reload());

    // One change, one notice.
    assert!(next_notice(&mut socket, Duration::from_millis(400)).await.is_none());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_client_frames_are_ignored() {
    let server = common::start_server(|_, _| {}).await;
    let mut socket = connect(&server).await;

    socket.send(Message::Text("test".into())).await.unwrap();
    assert!(next_notice(&mut socket, Duration::from_millis(400)).await.is_none());

    common::rewrite_sheet(&server.data_path, &[("CAFE", 2.0, 48.0)]);
    assert!(next_notice(&mut socket, Duration::from_secs(3)).await.is_some());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_disconnect_unregisters_connection() {
    let server = common::start_server(|_, _| {}).await;
    let mut socket = connect(&server).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(connections(&server).await, 1);

    socket.close(None).await.unwrap();

    let mut remaining = 1;
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        remaining = connections(&server).await;
        if remaining == 0 {
            break;
        }
    }
    assert_eq!(remaining, 0);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_broadcast_mode_reaches_every_client() {
    let server = common::start_server(|config, _| {
        config.live.notify_mode = NotifyMode::Broadcast;
    })
    .await;
    let mut first = connect(&server).await;
    let mut second = connect(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    common::rewrite_sheet(&server.data_path, &[("TE VERDE", 1.0, 24.0)]);

    assert!(next_notice(&mut first, Duration::from_secs(3)).await.is_some());
    assert!(next_notice(&mut second, Duration::from_secs(3)).await.is_some());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_search_that_reloads_still_notifies_clients() {
    // Poll loops never get a turn here, so the search is what sees the change.
    let server = common::start_server(|config, _| {
        config.live.poll_interval_ms = 60_000;
    })
    .await;
    let mut first = connect(&server).await;
    let mut second = connect(&server).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    common::rewrite_sheet(&server.data_path, &[("RON AÑEJO", 9.0, 215.0)]);

    let body: serde_json::Value = common::http_client()
        .get(server.url("/api/productos/buscar?q=ron"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["productos"][0]["Producto"], "RON AÑEJO");

    assert_eq!(next_notice(&mut first, Duration::from_secs(3)).await, Some(Notice::reload()));
    assert_eq!(next_notice(&mut second, Duration::from_secs(3)).await, Some(Notice::reload()));

    // An unchanged sheet does not notify again.
    common::http_client()
        .get(server.url("/api/productos/buscar?q=ron"))
        .send()
        .await
        .unwrap();
    assert!(next_notice(&mut first, Duration::from_millis(400)).await.is_none());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_closes_live_sessions() {
    let server = common::start_server(|config, _| {
        config.live.poll_interval_ms = 60_000;
    })
    .await;
    let mut socket = connect(&server).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.shutdown.trigger();

    let ended = timeout(Duration::from_secs(3), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "socket stayed open after shutdown");
}
