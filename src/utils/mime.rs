//! MIME detection and data URL helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Hardcoded pattern, a parse failure here is a compile-time bug.
    static ref EXTENSION_RE: Regex = Regex::new(r"\.([^./]*?)$")
        .expect("BUG: hardcoded extension regex is invalid");
}

/// Font types other than WOFF and EOT are not registered with IANA, the
/// values below are the ones browsers accept in `@font-face` data URLs.
const WOFF: &str = "application/font-woff";
const JPEG: &str = "image/jpeg";

/// Extract the file extension of a URL path, ignoring query and fragment
///
/// Returns an empty string when the last path segment has no extension.
#[must_use]
pub fn parse_extension(url: &str) -> &str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);

    EXTENSION_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// MIME type derived from the URL's file extension, empty when unknown
#[must_use]
pub fn mime_type(url: &str) -> &'static str {
    match parse_extension(url).to_ascii_lowercase().as_str() {
        "woff" | "woff2" => WOFF,
        "ttf" => "application/font-truetype",
        "eot" => "application/vnd.ms-fontobject",
        "png" => "image/png",
        "jpg" | "jpeg" => JPEG,
        "gif" => "image/gif",
        "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => "",
    }
}

/// Whether a reference already uses the embedded `data:` form
#[must_use]
pub fn is_data_url(url: &str) -> bool {
    url.starts_with("data:")
}

/// Build a base64 data URL from an encoded payload
#[must_use]
pub fn data_url(payload: &str, mime: &str) -> String {
    let mut encoded = String::with_capacity(payload.len() + mime.len() + 13);
    encoded.push_str("data:");
    encoded.push_str(mime);
    encoded.push_str(";base64,");
    encoded.push_str(payload);
    encoded
}
