//! Resource inlining functionality
//!
//! Turns every external reference a snapshot needs (web fonts, image
//! sources, CSS `url()` values) into base64 data URLs so the serialized
//! result renders without network access.

// Sub-modules
pub mod downloaders;
pub mod fetcher;
pub mod fonts;
pub mod images;
pub mod inliner;
pub mod types;

// Re-exports for public API
pub use downloaders::{ReqwestTransport, Transport};
pub use fetcher::{ResourceFetch, ResourceFetcher};
pub use fonts::{FontResolver, WebFontDescriptor};
pub use images::ImageContext;
pub use inliner::{inline_all, read_urls, should_process};
pub use types::{FetchError, ResourceType, TransportError, TransportResponse};
