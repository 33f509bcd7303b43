//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use price_lookup::catalog::xlsx::write_sheet;
use price_lookup::config::ServiceConfig;
use price_lookup::{HttpServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A server running on an ephemeral port with its own scratch directory.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub dir: TempDir,
    pub data_path: PathBuf,
    pub history_path: PathBuf,
    pub templates_dir: PathBuf,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// Start a server whose sheet lives in a fresh temp dir.
///
/// The sheet does not exist beforehand, so the sample data is written on start
/// unless `configure` points it at an existing file.
pub async fn start_server<F>(configure: F) -> TestServer
where
    F: FnOnce(&mut ServiceConfig, &Path),
{
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.catalog.data_path = root.join("data").join("productos_precios.xlsx");
    config.catalog.history_path = root.join("data").join("historial_cambios.json");
    config.site.templates_dir = root.join("templates");
    config.site.static_dir = root.join("static");
    config.live.poll_interval_ms = 100;
    configure(&mut config, &root);

    let data_path = config.catalog.data_path.clone();
    let history_path = config.catalog.history_path.clone();
    let templates_dir = config.site.templates_dir.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        dir,
        data_path,
        history_path,
        templates_dir,
    }
}

/// Rewrite the sheet and push its mtime forward so the change is always visible.
#[allow(dead_code)]
pub fn rewrite_sheet(path: &Path, rows: &[(&str, f64, f64)]) {
    let previous = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    write_sheet(path, rows).unwrap();
    bump_mtime(path, previous);
}

/// Overwrite the sheet with bytes that are not a workbook.
#[allow(dead_code)]
pub fn corrupt_sheet(path: &Path) {
    let previous = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    std::fs::write(path, b"definitely not xlsx").unwrap();
    bump_mtime(path, previous);
}

fn bump_mtime(path: &Path, previous: Option<std::time::SystemTime>) {
    let base = previous.unwrap_or_else(std::time::SystemTime::now);
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(base + Duration::from_secs(2)).unwrap();
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
