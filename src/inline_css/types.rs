//! Type definitions for resource inlining

use std::time::Duration;

/// Resource type for logging and error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    /// A `url()` inside an `@font-face` rule
    Font,
    /// The `src` of a raster image element
    Image,
    /// A `url()` inside a background declaration
    Background,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Font => write!(f, "Font"),
            ResourceType::Image => write!(f, "Image"),
            ResourceType::Background => write!(f, "Background"),
        }
    }
}

/// Raw response surfaced by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP status level
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport gave up on its own timer
    #[error("Request timed out")]
    TimedOut,

    #[error("Resource too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: usize },

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Typed outcome of a single resource fetch
///
/// Which of these the fetcher absorbs is decided by its `FallbackPolicy`;
/// `Timeout` is never absorbed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Timeout of {}ms occurred while fetching resource: {url}", .duration.as_millis())]
    Timeout { url: String, duration: Duration },

    #[error("Cannot fetch resource {url}, status: {status}")]
    Status { url: String, status: u16 },

    #[error("Cannot fetch resource {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
}

impl FetchError {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Transport { url, .. } => url,
        }
    }

    /// Whether a fallback policy may replace this failure with a placeholder
    #[must_use]
    pub fn is_absorbable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => false,
            FetchError::Status { .. } | FetchError::Transport { .. } => true,
        }
    }
}
