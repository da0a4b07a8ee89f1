//! Test utilities and helper functions for the snapshot test suite

use anyhow::Result;
use kodegen_tools_domshot::{FallbackPolicy, FetchConfig, Renderer};
use mockito::{Mock, Server, ServerGuard};
use std::time::Duration;

/// 1x1 transparent GIF, as embedded for failed fetches
pub const PIXEL_BASE64: &str = "R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

/// Route `log` output through the test harness
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sets up a mock HTTP server
#[allow(dead_code)]
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Creates a mock endpoint that returns raw bytes
#[allow(dead_code)]
pub async fn create_bytes_mock(
    server: &mut Server,
    path: &str,
    content_type: &str,
    body: &[u8],
) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(body)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// Fetch config with a short timeout for tests
#[allow(dead_code)]
pub fn test_config(timeout: Duration, fallback: FallbackPolicy) -> FetchConfig {
    FetchConfig::builder()
        .timeout(timeout)
        .fallback(fallback)
        .build()
}

/// Default renderer over the real HTTP transport
#[allow(dead_code)]
pub fn test_renderer(config: &FetchConfig) -> Result<Renderer> {
    Ok(Renderer::new(config)?)
}

/// Accepts TCP connections and never answers them
///
/// Returns the base URL of the listener. The listener task lives as long as
/// the test runtime.
#[allow(dead_code)]
pub async fn spawn_silent_server() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    Ok(format!("http://{addr}"))
}

/// Wait long enough for a future that should already have failed
#[allow(dead_code)]
pub const HANG_GUARD: Duration = Duration::from_secs(10);
