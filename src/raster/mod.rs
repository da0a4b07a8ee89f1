//! Rasterizer collaborator
//!
//! The pipeline never draws pixels itself. It hands data URIs to a
//! `Rasterizer`, which reports whether they load and what they decode to.

pub mod decoder;

pub use decoder::DataUriDecoder;

use futures::future::BoxFuture;
use thiserror::Error;

/// A loaded image as reported by the rasterizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterHandle {
    pub mime: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterHandle {
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageLoadError {
    #[error("Invalid data URL: {reason}")]
    InvalidDataUrl { reason: String },

    #[error("Not an embedded image: {0}")]
    NotEmbedded(String),

    #[error("Cannot encode image: {0}")]
    Encode(String),
}

/// Loads image sources and encodes loaded images
pub trait Rasterizer: Send + Sync {
    /// Load `uri` and report the decoded image
    fn load_image<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, Result<RasterHandle, ImageLoadError>>;

    /// Encode a loaded image into its final byte form
    fn encode_blob<'a>(
        &'a self,
        handle: &'a RasterHandle,
    ) -> BoxFuture<'a, Result<Vec<u8>, ImageLoadError>>;
}
