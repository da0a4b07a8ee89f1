//! Image resolution over a cloned tree
//!
//! Background declarations of every element are run through the URL inliner.
//! Raster image elements get their `src` fetched and swapped for a data URL,
//! and the swap only counts once the rasterizer has loaded the new source.

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};

use super::fetcher::ResourceFetch;
use super::inliner;
use super::types::ResourceType;
use crate::clone::CloneNode;
use crate::errors::{RenderError, RenderResult};
use crate::host::NodeKind;
use crate::raster::Rasterizer;
use crate::utils::{data_url, is_data_url, mime_type, resolve_url};

/// Inline style properties whose `url()` references are embedded
const BACKGROUND_PROPERTIES: [&str; 2] = ["background", "background-image"];

/// Collaborators for one image pass
#[derive(Clone, Copy)]
pub struct ImageContext<'a> {
    pub fetch: &'a dyn ResourceFetch,
    pub rasterizer: &'a dyn Rasterizer,
    /// Base for relative image sources and background URLs
    pub base_url: Option<&'a str>,
}

/// Embed every image and background reference under `node`
///
/// Siblings are processed concurrently; the first failure fails the pass.
pub fn inline_all<'a>(
    node: &'a mut CloneNode,
    ctx: ImageContext<'a>,
) -> BoxFuture<'a, RenderResult<()>> {
    async move {
        match node.kind() {
            NodeKind::Text | NodeKind::Other => Ok(()),
            NodeKind::Image if node.src().is_some_and(|src| !is_data_url(src)) => {
                inline_background(node, ctx).await?;
                inline_image(node, ctx).await
            }
            NodeKind::Element
            | NodeKind::Image
            | NodeKind::ImageSurface
            | NodeKind::VectorMarkup
            | NodeKind::VectorRect
            | NodeKind::FormTextArea
            | NodeKind::FormInput => {
                inline_background(node, ctx).await?;
                try_join_all(node.children_mut().iter_mut().map(|child| inline_all(child, ctx)))
                    .await?;
                Ok(())
            }
        }
    }
    .boxed()
}

async fn inline_background(node: &mut CloneNode, ctx: ImageContext<'_>) -> RenderResult<()> {
    for property in BACKGROUND_PROPERTIES {
        let Some(declared) = node.style().get(property).cloned() else {
            continue;
        };
        if !inliner::should_process(&declared.value) {
            continue;
        }

        log::debug!("Inlining {} references of '{property}'", ResourceType::Background);
        let inlined = inliner::inline_all(&declared.value, ctx.base_url, ctx.fetch).await?;
        node.style_mut()
            .set_property(property, &inlined, declared.important);
    }
    Ok(())
}

async fn inline_image(node: &mut CloneNode, ctx: ImageContext<'_>) -> RenderResult<()> {
    let Some(src) = node.src().map(str::to_string) else {
        return Ok(());
    };

    let resolved = match ctx.base_url {
        Some(base) => resolve_url(base, &src).map_err(|e| RenderError::Url {
            url: src.clone(),
            message: format!("{e:#}"),
        })?,
        None => src.clone(),
    };

    log::debug!("Inlining {} {resolved}", ResourceType::Image);
    let payload = ctx.fetch.fetch_encoded(&resolved).await?;
    let embedded = data_url(&payload, mime_type(&src));
    node.set_attribute("src", embedded.as_str());

    ctx.rasterizer
        .load_image(&embedded)
        .await
        .map_err(|e| RenderError::ImageLoad {
            url: resolved,
            message: e.to_string(),
        })?;
    Ok(())
}
