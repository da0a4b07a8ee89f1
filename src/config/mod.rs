//! Configuration module for snapshot conversions
//!
//! `FetchConfig` governs how resources are retrieved (timeouts, size limits,
//! failure fallback). `RenderOptions` carries the per-conversion options a
//! caller passes with each node.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{FetchConfigBuilder, RenderOptionsBuilder};
pub use types::{FallbackPolicy, FetchConfig, NodeFilter, RenderOptions};
