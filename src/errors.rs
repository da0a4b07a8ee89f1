//! Error types for snapshot conversions
//!
//! `RenderError` is what the top-level conversion rejects with. Failures that
//! are absorbed locally (broken resources, unreadable style sheets) never
//! reach this type; they are logged and replaced by a fallback at the
//! boundary where they occur.

use std::time::Duration;
use thiserror::Error;

use crate::inline_css::FetchError;

/// Result type alias for snapshot operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Error types for snapshot conversions
#[derive(Debug, Error)]
pub enum RenderError {
    /// A resource fetch exceeded the configured bound
    #[error("Timeout of {}ms occurred while fetching resource: {url}", .duration.as_millis())]
    FetchTimeout { url: String, duration: Duration },

    /// A fetch failure that the fallback policy chose not to absorb
    #[error("Failed to fetch resource {url}: {message}")]
    Fetch { url: String, message: String },

    /// Copying a node, its style or its surface failed
    #[error("Failed to clone {node}: {message}")]
    Clone { node: String, message: String },

    /// An embedded image did not load after its source was swapped
    #[error("Image failed to load from {url}: {message}")]
    ImageLoad { url: String, message: String },

    /// A resource reference could not be resolved to an absolute URL
    #[error("Invalid resource URL '{url}': {message}")]
    Url { url: String, message: String },

    /// The root node was dropped during cloning
    #[error("Clone of the root node produced no output")]
    MissingRoot,

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for RenderError {
    fn from(error: anyhow::Error) -> Self {
        RenderError::Other(format!("{error:#}"))
    }
}

impl From<FetchError> for RenderError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout { url, duration } => RenderError::FetchTimeout { url, duration },
            other => RenderError::Fetch {
                url: other.url().to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl RenderError {
    /// Check if the conversion failed because a resource timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, RenderError::FetchTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_carries_url_and_duration() {
        let error = RenderError::from(FetchError::Timeout {
            url: "http://example.com/slow.png".to_string(),
            duration: Duration::from_secs(30),
        });

        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Timeout of 30000ms occurred while fetching resource: http://example.com/slow.png"
        );
    }

    #[test]
    fn status_errors_keep_their_url() {
        let error = RenderError::from(FetchError::Status {
            url: "http://example.com/a.png".to_string(),
            status: 404,
        });

        match error {
            RenderError::Fetch { url, message } => {
                assert_eq!(url, "http://example.com/a.png");
                assert!(message.contains("404"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
