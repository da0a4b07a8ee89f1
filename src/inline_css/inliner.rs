//! `url()` inliner for style-bearing strings
//!
//! Rewrites every `url(...)` reference of a CSS string into a base64 data URL,
//! one resource at a time in extraction order.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::fetcher::ResourceFetch;
use crate::errors::{RenderError, RenderResult};
use crate::utils::{data_url, is_data_url, mime_type, resolve_url};

lazy_static! {
    // Hardcoded pattern, a parse failure here is a compile-time bug.
    static ref URL_RE: Regex = Regex::new(r#"url\(['"]?([^'"]+?)['"]?\)"#)
        .expect("BUG: hardcoded url() regex is invalid");
}

/// Whether the text contains any `url(...)` reference at all
#[must_use]
pub fn should_process(css_text: &str) -> bool {
    URL_RE.is_match(css_text)
}

/// Referenced URLs in order of appearance, data URLs and repeats skipped
#[must_use]
pub fn read_urls(css_text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for caps in URL_RE.captures_iter(css_text) {
        let url = &caps[1];
        if is_data_url(url) || urls.iter().any(|seen| seen == url) {
            continue;
        }
        urls.push(url.to_string());
    }
    urls
}

/// Inline one URL: resolve, fetch, and replace every reference to it
///
/// # Errors
///
/// Fails if the URL cannot be resolved against `base_url` or the fetch
/// reports an error its fallback policy did not absorb.
pub async fn inline(
    css_text: &str,
    url: &str,
    base_url: Option<&str>,
    fetch: &dyn ResourceFetch,
) -> RenderResult<String> {
    let resolved = match base_url {
        Some(base) => resolve_url(base, url).map_err(|e| RenderError::Url {
            url: url.to_string(),
            message: format!("{e:#}"),
        })?,
        None => url.to_string(),
    };

    let payload = fetch.fetch_encoded(&resolved).await?;
    let embedded = data_url(&payload, mime_type(url));
    log::debug!("Inlined {resolved} ({} base64 chars)", payload.len());

    // Literal match on this exact URL, quote style preserved
    let pattern = Regex::new(&format!(r#"(url\(['"]?)({})(['"]?\))"#, regex::escape(url)))
        .map_err(|e| RenderError::Other(format!("Cannot build pattern for {url}: {e}")))?;

    Ok(pattern
        .replace_all(css_text, |caps: &Captures<'_>| {
            format!("{}{embedded}{}", &caps[1], &caps[3])
        })
        .into_owned())
}

/// Inline every external `url()` of `css_text`
///
/// Text without any `url()` is returned unchanged without a fetch. Already
/// embedded references are left alone, so running this twice is a no-op the
/// second time.
///
/// # Errors
///
/// The first failing `inline` step fails the whole call.
pub async fn inline_all(
    css_text: &str,
    base_url: Option<&str>,
    fetch: &dyn ResourceFetch,
) -> RenderResult<String> {
    if !should_process(css_text) {
        return Ok(css_text.to_string());
    }

    let mut inlined = css_text.to_string();
    for url in read_urls(css_text) {
        inlined = inline(&inlined, &url, base_url, fetch).await?;
    }
    Ok(inlined)
}
