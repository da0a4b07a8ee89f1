//! Core configuration types for snapshot conversions

use serde::{Deserialize, Serialize};

/// What the resource fetcher does when a transport fails or returns a
/// non-success status
///
/// Timeouts are never absorbed, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Substitute a 1x1 transparent pixel and log the failure
    #[default]
    TransparentPixel,
    /// Surface the failure to the caller
    Propagate,
}

/// Resource retrieval settings shared by every conversion of a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-resource timeout in milliseconds
    ///
    /// Default: 30000
    pub(crate) timeout_ms: u64,

    /// Maximum size of a single resource body in bytes
    ///
    /// Default: 10MB
    pub(crate) max_resource_size: usize,

    /// User agent sent with every resource request
    pub(crate) user_agent: String,

    /// Failure handling for non-timeout fetch errors
    pub(crate) fallback: FallbackPolicy,
}

/// Per non-root node inclusion predicate
///
/// Returning `false` drops the node together with its whole subtree.
pub type NodeFilter<N> = Box<dyn Fn(&N) -> bool + Send + Sync>;

/// Options for a single conversion
pub struct RenderOptions<N> {
    pub(crate) filter: Option<NodeFilter<N>>,
    pub(crate) background_color: Option<String>,
    pub(crate) base_url: Option<String>,
}

impl<N> Default for RenderOptions<N> {
    fn default() -> Self {
        Self {
            filter: None,
            background_color: None,
            base_url: None,
        }
    }
}

impl<N> std::fmt::Debug for RenderOptions<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("background_color", &self.background_color)
            .field("base_url", &self.base_url)
            .finish()
    }
}
