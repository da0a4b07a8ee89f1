//! Resource fetcher: bounded fetch plus the named fallback policy
//!
//! `fetch_bytes` returns the typed outcome of a single fetch. `fetch_encoded`
//! applies the fallback rule on top of it:
//!
//! - `FetchError::Timeout` always propagates and aborts the conversion.
//! - `FetchError::Status` and `FetchError::Transport` are replaced by a 1x1
//!   transparent GIF under `FallbackPolicy::TransparentPixel` (logged at
//!   error level), or propagate under `FallbackPolicy::Propagate`.

use base64::Engine;
use futures::future::BoxFuture;
use std::time::Duration;

use super::downloaders::{ReqwestTransport, Transport};
use super::types::{FetchError, TransportError};
use crate::config::{FallbackPolicy, FetchConfig};
use crate::utils::TRANSPARENT_PIXEL_BASE64;

/// Anything that can turn a URL into a base64 payload
///
/// Implemented by `ResourceFetcher`; tests and hosts with their own cache
/// pass other implementations to the inliners as a fetch override.
pub trait ResourceFetch: Send + Sync {
    fn fetch_encoded<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// Bounded fetcher over a `Transport`
#[derive(Debug, Clone)]
pub struct ResourceFetcher<T = ReqwestTransport> {
    transport: T,
    timeout: Duration,
    fallback: FallbackPolicy,
}

impl ResourceFetcher<ReqwestTransport> {
    /// Fetcher over a fresh `reqwest` transport
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &FetchConfig) -> anyhow::Result<Self> {
        Ok(Self::new(ReqwestTransport::new(config)?, config))
    }
}

impl<T: Transport> ResourceFetcher<T> {
    #[must_use]
    pub fn new(transport: T, config: &FetchConfig) -> Self {
        Self {
            transport,
            timeout: config.timeout(),
            fallback: config.fallback(),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch raw bytes, bounded by the configured timeout
    ///
    /// # Errors
    ///
    /// `Timeout` when the bound is exceeded, `Status` for non-success
    /// responses, `Transport` for connection-level failures.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = tokio::time::timeout(self.timeout, self.transport.get(url))
            .await
            .map_err(|_| self.timeout_error(url))?
            .map_err(|error| match error {
                TransportError::TimedOut => self.timeout_error(url),
                source => FetchError::Transport {
                    url: url.to_string(),
                    source,
                },
            })?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    /// Fetch and base64 encode, applying the fallback policy
    ///
    /// # Errors
    ///
    /// Always for timeouts; for other failures only under
    /// `FallbackPolicy::Propagate`.
    pub async fn fetch_base64(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("Fetching resource {url}");
        match self.fetch_bytes(url).await {
            Ok(bytes) => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Err(error) if error.is_absorbable() && self.fallback == FallbackPolicy::TransparentPixel => {
                log::error!("{error}");
                Ok(TRANSPARENT_PIXEL_BASE64.to_string())
            }
            Err(error) => Err(error),
        }
    }

    fn timeout_error(&self, url: &str) -> FetchError {
        FetchError::Timeout {
            url: url.to_string(),
            duration: self.timeout,
        }
    }
}

impl<T: Transport> ResourceFetch for ResourceFetcher<T> {
    fn fetch_encoded<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(self.fetch_base64(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline_css::TransportResponse;
    use base64::Engine;

    struct FixedTransport(Result<TransportResponse, TransportError>);

    impl Transport for FixedTransport {
        fn get<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    struct SlowTransport;

    impl Transport for SlowTransport {
        fn get<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(TransportResponse::ok(vec![1, 2, 3]))
            })
        }
    }

    fn config(timeout_ms: u64, fallback: FallbackPolicy) -> FetchConfig {
        FetchConfig::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .fallback(fallback)
            .build()
    }

    #[tokio::test]
    async fn success_is_base64_of_the_body() {
        let body = vec![0u8, 159, 146, 150, 255];
        let fetcher = ResourceFetcher::new(
            FixedTransport(Ok(TransportResponse::ok(body.clone()))),
            &FetchConfig::default(),
        );

        let encoded = fetcher.fetch_encoded("http://example.com/a.png").await.unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[tokio::test]
    async fn non_success_status_becomes_the_placeholder() {
        let fetcher = ResourceFetcher::new(
            FixedTransport(Ok(TransportResponse { status: 404, body: Vec::new() })),
            &FetchConfig::default(),
        );

        let encoded = fetcher.fetch_encoded("http://example.com/missing.png").await.unwrap();
        assert_eq!(encoded, TRANSPARENT_PIXEL_BASE64);
    }

    #[tokio::test]
    async fn transport_failure_becomes_the_placeholder() {
        let fetcher = ResourceFetcher::new(
            FixedTransport(Err(TransportError::RequestFailed("connection refused".into()))),
            &FetchConfig::default(),
        );

        let encoded = fetcher.fetch_encoded("http://example.com/a.png").await.unwrap();
        assert_eq!(encoded, TRANSPARENT_PIXEL_BASE64);
    }

    #[tokio::test]
    async fn propagate_policy_surfaces_status() {
        let fetcher = ResourceFetcher::new(
            FixedTransport(Ok(TransportResponse { status: 500, body: Vec::new() })),
            &config(1000, FallbackPolicy::Propagate),
        );

        let error = fetcher.fetch_encoded("http://example.com/a.png").await.unwrap_err();
        assert_eq!(
            error,
            FetchError::Status {
                url: "http://example.com/a.png".to_string(),
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn slow_transport_times_out_with_url_and_duration() {
        let fetcher = ResourceFetcher::new(SlowTransport, &config(50, FallbackPolicy::TransparentPixel));

        let started = std::time::Instant::now();
        let error = fetcher.fetch_encoded("http://example.com/slow.woff").await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2), "fetch must not hang past its bound");
        assert_eq!(
            error,
            FetchError::Timeout {
                url: "http://example.com/slow.woff".to_string(),
                duration: Duration::from_millis(50)
            }
        );
        assert!(!error.is_absorbable());
    }

    #[tokio::test]
    async fn transport_timeout_maps_to_timeout() {
        let fetcher = ResourceFetcher::new(
            FixedTransport(Err(TransportError::TimedOut)),
            &FetchConfig::default(),
        );

        let error = fetcher.fetch_encoded("http://example.com/a.png").await.unwrap_err();
        assert!(matches!(error, FetchError::Timeout { .. }));
    }
}
