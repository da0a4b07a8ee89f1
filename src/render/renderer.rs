//! Conversion context owning the fetcher, the rasterizer and the uid counter

use crate::clone::{CloneFilter, TreeCloner, UidGenerator};
use crate::config::{FetchConfig, RenderOptions};
use crate::document::{append_style, apply_background, make_svg_data_uri};
use crate::errors::{RenderError, RenderResult};
use crate::host::{SourceNode, StyleSheetSource};
use crate::inline_css::images::{self, ImageContext};
use crate::inline_css::{FontResolver, ResourceFetch, ResourceFetcher};
use crate::raster::{DataUriDecoder, RasterHandle, Rasterizer};

/// Converts source nodes into self-contained images
///
/// One renderer can serve any number of conversions, sequentially or
/// concurrently. Nothing is cached between them; only the uid counter
/// carries over so generated class names never repeat.
pub struct Renderer<F = ResourceFetcher, R = DataUriDecoder> {
    fetcher: F,
    rasterizer: R,
    uids: UidGenerator,
}

impl Renderer {
    /// Renderer over the `reqwest` transport and the data URI decoder
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> RenderResult<Self> {
        let fetcher = ResourceFetcher::from_config(config)?;
        Ok(Self::with_parts(fetcher, DataUriDecoder::new()))
    }
}

impl<F: ResourceFetch, R: Rasterizer> Renderer<F, R> {
    #[must_use]
    pub fn with_parts(fetcher: F, rasterizer: R) -> Self {
        Self {
            fetcher,
            rasterizer,
            uids: UidGenerator::new(),
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Convert `node` into a `data:image/svg+xml` URI
    ///
    /// # Errors
    ///
    /// Fails on host errors while cloning, fetch timeouts, fetch failures the
    /// fallback policy does not absorb, and embedded images that do not load.
    pub async fn to_vector_image<N, S>(
        &self,
        sheets: &S,
        node: &N,
        options: &RenderOptions<N>,
    ) -> RenderResult<String>
    where
        N: SourceNode,
        S: StyleSheetSource + ?Sized,
    {
        log::debug!("Cloning {}", node.describe());
        let filter = options.filter().map(|filter| filter as CloneFilter<'_, N>);
        let mut clone = TreeCloner::new(&self.uids)
            .clone_node(node, filter, true)
            .await?
            .ok_or(RenderError::MissingRoot)?;

        log::debug!("Embedding web fonts");
        let font_css = FontResolver::new(&self.fetcher).resolve_all(sheets).await?;
        append_style(&mut clone, &font_css);

        log::debug!("Embedding images");
        let ctx = ImageContext {
            fetch: &self.fetcher,
            rasterizer: &self.rasterizer,
            base_url: options.base_url(),
        };
        images::inline_all(&mut clone, ctx).await?;

        if let Some(color) = options.background_color() {
            apply_background(&mut clone, color);
        }

        let (width, height) = node.scroll_size();
        log::debug!("Serializing {width}x{height} vector image");
        Ok(make_svg_data_uri(&clone, width, height))
    }

    /// Convert `node` and hand the vector image to the rasterizer
    ///
    /// # Errors
    ///
    /// Everything `to_vector_image` fails on, plus a rasterizer that cannot
    /// load the vector image.
    pub async fn to_raster<N, S>(
        &self,
        sheets: &S,
        node: &N,
        options: &RenderOptions<N>,
    ) -> RenderResult<RasterHandle>
    where
        N: SourceNode,
        S: StyleSheetSource + ?Sized,
    {
        let uri = self.to_vector_image(sheets, node, options).await?;
        self.rasterizer
            .load_image(&uri)
            .await
            .map_err(|e| RenderError::ImageLoad {
                url: node.describe(),
                message: e.to_string(),
            })
    }

    /// Convert `node` into encoded image bytes
    ///
    /// # Errors
    ///
    /// Everything `to_raster` fails on, plus an encoding failure.
    pub async fn to_raster_blob<N, S>(
        &self,
        sheets: &S,
        node: &N,
        options: &RenderOptions<N>,
    ) -> RenderResult<Vec<u8>>
    where
        N: SourceNode,
        S: StyleSheetSource + ?Sized,
    {
        let handle = self.to_raster(sheets, node, options).await?;
        self.rasterizer
            .encode_blob(&handle)
            .await
            .map_err(|e| RenderError::ImageLoad {
                url: node.describe(),
                message: e.to_string(),
            })
    }
}

impl<F, R> std::fmt::Debug for Renderer<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("uids", &self.uids).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PseudoElement, StyleSheet};
    use crate::inline_css::FetchError;
    use crate::static_dom::StaticNode;
    use crate::utils::TRANSPARENT_PIXEL_BASE64;
    use futures::future::BoxFuture;

    struct PixelFetch;

    impl ResourceFetch for PixelFetch {
        fn fetch_encoded<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
            Box::pin(async { Ok(TRANSPARENT_PIXEL_BASE64.to_string()) })
        }
    }

    fn renderer() -> Renderer<PixelFetch, DataUriDecoder> {
        Renderer::with_parts(PixelFetch, DataUriDecoder)
    }

    #[tokio::test]
    async fn vector_image_is_size_stamped_and_self_contained() {
        let node = StaticNode::element("div")
            .style("color", "red")
            .scroll_size(200, 100)
            .child(StaticNode::element("img").attr("src", "logo.png"))
            .build();
        let options = RenderOptions::builder().background_color("white").build();

        let uri = renderer()
            .to_vector_image(&Vec::<StyleSheet>::new(), &node, &options)
            .await
            .unwrap();

        assert!(uri.starts_with(
            "data:image/svg+xml;charset=utf-8,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\">"
        ));
        assert!(uri.contains("style=\"color: red; background-color: white;\""));
        assert!(uri.contains(&format!("src=\"data:image/png;base64,{TRANSPARENT_PIXEL_BASE64}\"")));
        assert!(uri.ends_with("<style></style></div></foreignObject></svg>"));
    }

    #[tokio::test]
    async fn pseudo_classes_never_repeat_across_conversions() {
        let node = StaticNode::element("p")
            .pseudo(PseudoElement::After, "\"!\"")
            .build();
        let renderer = renderer();
        let options = RenderOptions::default();
        let sheets: Vec<StyleSheet> = Vec::new();

        let first = renderer.to_vector_image(&sheets, &node, &options).await.unwrap();
        let second = renderer.to_vector_image(&sheets, &node, &options).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn raster_entry_points_decode_the_vector_image() {
        let node = StaticNode::element("div").scroll_size(64, 32).build();
        let renderer = renderer();
        let options = RenderOptions::default();
        let sheets: Vec<StyleSheet> = Vec::new();

        let handle = renderer.to_raster(&sheets, &node, &options).await.unwrap();
        assert_eq!(handle.mime, "image/svg+xml");
        assert_eq!(handle.dimensions(), (64, 32));

        let blob = renderer.to_raster_blob(&sheets, &node, &options).await.unwrap();
        assert!(String::from_utf8(blob).unwrap().starts_with("<svg"));
    }
}
