//! Getter methods for the configuration types

use std::time::Duration;

use super::types::{FallbackPolicy, FetchConfig, RenderOptions};

impl FetchConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn max_resource_size(&self) -> usize {
        self.max_resource_size
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }
}

impl<N> RenderOptions<N> {
    /// Whether the node passes the filter; nodes pass when no filter is set
    #[must_use]
    pub fn accepts(&self, node: &N) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(node))
    }

    #[must_use]
    pub fn filter(&self) -> Option<&(dyn Fn(&N) -> bool + Send + Sync)> {
        self.filter.as_deref()
    }

    #[must_use]
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}
