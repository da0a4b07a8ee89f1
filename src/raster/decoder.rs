//! Default rasterizer: decodes data URIs without rendering them
//!
//! Loading succeeds when the URI is a well-formed `data:` URL. Width and
//! height are sniffed from PNG, GIF and SVG payloads; other formats report
//! `0x0`. Encoding returns the decoded bytes unchanged.

use base64::Engine;
use futures::future::{self, BoxFuture, FutureExt};
use lazy_static::lazy_static;
use regex::Regex;

use super::{ImageLoadError, RasterHandle, Rasterizer};

const DATA_URL_PREFIX: &str = "data:";
const DEFAULT_MEDIA_TYPE: &str = "text/plain";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

lazy_static! {
    static ref SVG_OPEN_TAG_RE: Regex = Regex::new(r"(?s)<svg\b[^>]*>")
        .expect("BUG: hardcoded svg tag regex is invalid");
    static ref SVG_WIDTH_RE: Regex = Regex::new(r#"\swidth=["'](\d+)(?:\.\d+)?(?:px)?["']"#)
        .expect("BUG: hardcoded svg width regex is invalid");
    static ref SVG_HEIGHT_RE: Regex = Regex::new(r#"\sheight=["'](\d+)(?:\.\d+)?(?:px)?["']"#)
        .expect("BUG: hardcoded svg height regex is invalid");
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriDecoder;

impl DataUriDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decode `uri` into a handle
    ///
    /// # Errors
    ///
    /// `NotEmbedded` for anything but a `data:` URL, `InvalidDataUrl` when
    /// the URL is malformed or its base64 payload does not decode.
    pub fn decode(&self, uri: &str) -> Result<RasterHandle, ImageLoadError> {
        let rest = uri
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| ImageLoadError::NotEmbedded(truncate(uri)))?;
        let (metadata, data) = rest.split_once(',').ok_or_else(|| ImageLoadError::InvalidDataUrl {
            reason: "Missing comma in data URL".to_string(),
        })?;

        let mut params = metadata.split(';');
        let mime = match params.next().map(str::trim) {
            Some(media_type) if !media_type.is_empty() => media_type.to_ascii_lowercase(),
            _ => DEFAULT_MEDIA_TYPE.to_string(),
        };
        let is_base64 = params.any(|param| param.trim().eq_ignore_ascii_case("base64"));

        let bytes = if is_base64 {
            decode_base64(data)?
        } else {
            percent_decode(data)
        };

        let (width, height) = sniff_dimensions(&bytes).unwrap_or((0, 0));
        Ok(RasterHandle {
            mime,
            bytes,
            width,
            height,
        })
    }
}

impl Rasterizer for DataUriDecoder {
    fn load_image<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, Result<RasterHandle, ImageLoadError>> {
        future::ready(self.decode(uri)).boxed()
    }

    fn encode_blob<'a>(
        &'a self,
        handle: &'a RasterHandle,
    ) -> BoxFuture<'a, Result<Vec<u8>, ImageLoadError>> {
        future::ready(Ok(handle.bytes.clone())).boxed()
    }
}

/// Base64 payloads may be wrapped; ASCII whitespace is ignored
fn decode_base64(data: &str) -> Result<Vec<u8>, ImageLoadError> {
    let cleaned: Vec<u8> = data.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| ImageLoadError::InvalidDataUrl {
            reason: format!("Invalid base64: {e}"),
        })
}

/// Percent-decode without treating `+` specially
///
/// A `%` not followed by two hex digits is kept as is, which is what
/// browsers do with SVG markup such as `width="100%"`.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    out
}

fn sniff_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.starts_with(PNG_SIGNATURE) {
        let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
        let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
        return Some((width, height));
    }

    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        let width = u16::from_le_bytes(bytes.get(6..8)?.try_into().ok()?);
        let height = u16::from_le_bytes(bytes.get(8..10)?.try_into().ok()?);
        return Some((u32::from(width), u32::from(height)));
    }

    let text = std::str::from_utf8(bytes).ok()?;
    let tag = SVG_OPEN_TAG_RE.find(text)?.as_str();
    let width = SVG_WIDTH_RE.captures(tag)?[1].parse().ok()?;
    let height = SVG_HEIGHT_RE.captures(tag)?[1].parse().ok()?;
    Some((width, height))
}

fn truncate(uri: &str) -> String {
    uri.chars().take(64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TRANSPARENT_PIXEL_BASE64;

    #[test]
    fn placeholder_gif_is_one_pixel() {
        let handle = DataUriDecoder
            .decode(&format!("data:image/gif;base64,{TRANSPARENT_PIXEL_BASE64}"))
            .unwrap();

        assert_eq!(handle.mime, "image/gif");
        assert_eq!(handle.dimensions(), (1, 1));
        assert!(handle.bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn svg_markup_is_percent_decoded_and_measured() {
        let uri = "data:image/svg+xml;charset=utf-8,<svg xmlns=\"http://www.w3.org/2000/svg\" \
                   width=\"120\" height=\"40\"><foreignObject width=\"100%\" height=\"100%\">\
                   <div style=\"color: %23f00;\">a%0Ab</div></foreignObject></svg>";

        let handle = DataUriDecoder.decode(uri).unwrap();
        let markup = String::from_utf8(handle.bytes.clone()).unwrap();

        assert_eq!(handle.mime, "image/svg+xml");
        assert_eq!(handle.dimensions(), (120, 40));
        assert!(markup.contains("color: #f00;"));
        assert!(markup.contains("a\nb"));
        assert!(markup.contains("width=\"100%\""));
    }

    #[test]
    fn png_header_dimensions() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&[0, 0, 0, 13]);
        png.extend_from_slice(b"IHDR");
        png.extend_from_slice(&640u32.to_be_bytes());
        png.extend_from_slice(&480u32.to_be_bytes());
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );

        assert_eq!(DataUriDecoder.decode(&uri).unwrap().dimensions(), (640, 480));
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let handle = DataUriDecoder.decode("data:text/plain;base64,aGVs\n bG8=").unwrap();
        assert_eq!(handle.bytes, b"hello");
        assert_eq!(handle.dimensions(), (0, 0));
    }

    #[test]
    fn rejects_remote_and_malformed_sources() {
        assert!(matches!(
            DataUriDecoder.decode("https://example.com/a.png"),
            Err(ImageLoadError::NotEmbedded(_))
        ));
        assert!(matches!(
            DataUriDecoder.decode("data:image/png;base64"),
            Err(ImageLoadError::InvalidDataUrl { .. })
        ));
        assert!(matches!(
            DataUriDecoder.decode("data:image/png;base64,@@@"),
            Err(ImageLoadError::InvalidDataUrl { .. })
        ));
    }

    #[tokio::test]
    async fn encode_blob_returns_decoded_bytes() {
        let decoder = DataUriDecoder::new();
        let handle = decoder.load_image("data:,plain%20text").await.unwrap();

        assert_eq!(handle.mime, "text/plain");
        assert_eq!(decoder.encode_blob(&handle).await.unwrap(), b"plain text");
    }
}
