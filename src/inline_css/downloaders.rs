//! HTTP transport for resource downloads
//!
//! `Transport` is the seam between the fetcher and the network. The
//! fetcher applies timeouts and the fallback policy; a transport only
//! performs the GET and reports status and body.
//!
//! ## Usage
//!
//! ```ignore
//! use kodegen_tools_domshot::inline_css::{ReqwestTransport, Transport};
//! use kodegen_tools_domshot::FetchConfig;
//!
//! let transport = ReqwestTransport::new(&FetchConfig::default())?;
//! let response = transport.get("https://example.com/logo.png").await?;
//! ```

use anyhow::{Context, Result};
use futures::StreamExt;
use futures::future::BoxFuture;
use reqwest::Client;

use super::types::{TransportError, TransportResponse};
use crate::config::FetchConfig;

/// Performs a GET and surfaces status and raw body
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse, TransportError>>;
}

/// `reqwest`-backed transport with browser-like headers and a body size cap
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: FetchConfig,
}

impl ReqwestTransport {
    /// Build a transport with its own connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client; `Client` is an `Arc` internally
    #[must_use]
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    async fn download(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout())
            .header("Accept", "image/avif,image/webp,image/apng,image/*,font/*,*/*;q=0.8")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            // Body of an error page is never embedded
            return Ok(TransportResponse {
                status,
                body: Vec::new(),
            });
        }

        let limit = self.config.max_resource_size();

        // Enforce the limit BEFORE downloading when the server announces a size
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > limit as u64 {
            return Err(TransportError::TooLarge {
                size: expected_size,
                limit,
            });
        }

        let mut buffer = Vec::with_capacity(expected_size as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;

            // Servers may lie about Content-Length, check while accumulating
            let new_total = buffer.len() + chunk.len();
            if new_total > limit {
                return Err(TransportError::TooLarge {
                    size: new_total as u64,
                    limit,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("Downloaded {} bytes from {url}", buffer.len());
        Ok(TransportResponse {
            status,
            body: buffer,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
        Box::pin(self.download(url))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::RequestFailed(error.to_string())
    }
}
