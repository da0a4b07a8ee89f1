//! Shared constants for the snapshot pipeline
//!
//! Default values and fixed strings used throughout the codebase, collected
//! here to avoid magic numbers in the pipeline stages.

use std::time::Duration;

/// Default timeout for a single resource fetch: 30 seconds
///
/// Applied per resource, not per conversion. A conversion with many slow
/// resources can take longer than this in total.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum size of a single fetched resource: 10MB
///
/// Anything larger is treated as a failed transport and replaced by the
/// placeholder pixel.
pub const DEFAULT_MAX_RESOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Base64 payload of a 1x1 transparent GIF
///
/// Substituted for any resource whose fetch fails with a non-success status
/// or a transport error, unless the fallback policy is `Propagate`.
pub const TRANSPARENT_PIXEL_BASE64: &str = "R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

/// XHTML namespace stamped on the serialized clone root
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// SVG namespace stamped on vector markup and the outer container
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Prefix of the final vector-image data URL
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// Chrome user agent string sent with resource requests
///
/// Some font and image CDNs refuse requests without a browser-like agent.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
