//! Fluent builders for `FetchConfig` and `RenderOptions`

use anyhow::{Context, Result};
use std::time::Duration;

use super::types::{FallbackPolicy, FetchConfig, RenderOptions};
use crate::utils::{CHROME_USER_AGENT, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_RESOURCE_SIZE};

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
            max_resource_size: DEFAULT_MAX_RESOURCE_SIZE,
            user_agent: CHROME_USER_AGENT.to_string(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl FetchConfig {
    /// Create a builder for configuring a `FetchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }

    /// Load a config from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid fetch configuration")
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn max_resource_size(mut self, bytes: usize) -> Self {
        self.config.max_resource_size = bytes;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.config.fallback = fallback;
        self
    }

    #[must_use]
    pub fn build(self) -> FetchConfig {
        self.config
    }
}

impl<N> RenderOptions<N> {
    /// Create a builder for per-conversion options
    #[must_use]
    pub fn builder() -> RenderOptionsBuilder<N> {
        RenderOptionsBuilder {
            options: RenderOptions::default(),
        }
    }
}

pub struct RenderOptionsBuilder<N> {
    options: RenderOptions<N>,
}

impl<N> RenderOptionsBuilder<N> {
    /// Only non-root nodes for which `filter` returns true are cloned
    #[must_use]
    pub fn filter(mut self, filter: impl Fn(&N) -> bool + Send + Sync + 'static) -> Self {
        self.options.filter = Some(Box::new(filter));
        self
    }

    /// Any CSS color, applied to the clone root before serialization
    #[must_use]
    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.options.background_color = Some(color.into());
        self
    }

    /// Base for resolving relative image sources and background URLs
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.options.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn build(self) -> RenderOptions<N> {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_resource_size(), DEFAULT_MAX_RESOURCE_SIZE);
        assert_eq!(config.fallback(), FallbackPolicy::TransparentPixel);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = FetchConfig::from_json(r#"{"timeout_ms": 250, "fallback": "propagate"}"#)
            .expect("valid config");

        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.fallback(), FallbackPolicy::Propagate);
        assert_eq!(config.user_agent(), CHROME_USER_AGENT);
    }

    #[test]
    fn json_rejects_wrong_types() {
        assert!(FetchConfig::from_json(r#"{"timeout_ms": "soon"}"#).is_err());
    }

    #[test]
    fn options_filter_defaults_to_accepting() {
        let options: RenderOptions<u32> = RenderOptions::default();
        assert!(options.accepts(&7));

        let options = RenderOptions::<u32>::builder()
            .filter(|n| n % 2 == 0)
            .background_color("white")
            .build();
        assert!(options.accepts(&2));
        assert!(!options.accepts(&3));
        assert_eq!(options.background_color(), Some("white"));
    }
}
