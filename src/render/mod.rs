//! Top-level conversions
//!
//! The free functions build a default `Renderer` per call. Callers converting
//! many nodes should keep one `Renderer` around instead, so the HTTP
//! connection pool is shared.

pub mod renderer;

pub use renderer::Renderer;

use crate::config::{FetchConfig, RenderOptions};
use crate::errors::RenderResult;
use crate::host::{SourceNode, StyleSheetSource};
use crate::raster::RasterHandle;

/// Convert `node` into a `data:image/svg+xml` URI with the default renderer
///
/// # Errors
///
/// See `Renderer::to_vector_image`.
pub async fn to_vector_image<N, S>(
    sheets: &S,
    node: &N,
    options: &RenderOptions<N>,
) -> RenderResult<String>
where
    N: SourceNode,
    S: StyleSheetSource + ?Sized,
{
    Renderer::new(&FetchConfig::default())?
        .to_vector_image(sheets, node, options)
        .await
}

/// Convert `node` into a loaded image with the default renderer
///
/// # Errors
///
/// See `Renderer::to_raster`.
pub async fn to_raster<N, S>(
    sheets: &S,
    node: &N,
    options: &RenderOptions<N>,
) -> RenderResult<RasterHandle>
where
    N: SourceNode,
    S: StyleSheetSource + ?Sized,
{
    Renderer::new(&FetchConfig::default())?
        .to_raster(sheets, node, options)
        .await
}

/// Convert `node` into encoded image bytes with the default renderer
///
/// # Errors
///
/// See `Renderer::to_raster_blob`.
pub async fn to_raster_blob<N, S>(
    sheets: &S,
    node: &N,
    options: &RenderOptions<N>,
) -> RenderResult<Vec<u8>>
where
    N: SourceNode,
    S: StyleSheetSource + ?Sized,
{
    Renderer::new(&FetchConfig::default())?
        .to_raster_blob(sheets, node, options)
        .await
}
