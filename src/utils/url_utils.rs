//! URL manipulation utilities.
//!
//! Resolution of relative resource references and escaping of markup that is
//! embedded inside a data URL.

use anyhow::{Context, Result};
use url::Url;

/// Resolve a potentially relative URL against a base URL
///
/// The reference's query and fragment are kept as written.
pub fn resolve_url(base_url: &str, url: &str) -> Result<String> {
    let base = Url::parse(base_url).context("Invalid base URL")?;
    let resolved = base.join(url).context("Failed to resolve URL")?;
    Ok(resolved.to_string())
}

/// Escape the two characters that break a `data:` URL carrying raw markup
///
/// `#` would start a fragment and a raw newline is not allowed in a URL.
#[must_use]
pub fn escape_xhtml(markup: &str) -> String {
    markup.replace('#', "%23").replace('\n', "%0A")
}
