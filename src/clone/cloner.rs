//! Recursive cloning of a source tree into a detached `CloneNode` tree
//!
//! Cloning a node happens in three phases:
//!
//! 1. shallow copy (drawing surfaces are captured and become `<img>` nodes)
//! 2. children, one at a time in source order
//! 3. post-processing of element-like nodes: computed style, pseudo-element
//!    emulation, live form values, SVG namespace fix-up
//!
//! Any host failure along the way aborts the whole clone.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::node::CloneNode;
use super::uid::UidGenerator;
use crate::errors::{RenderError, RenderResult};
use crate::host::{HostError, NodeKind, PseudoElement, SourceNode};
use crate::style::{StyleSnapshot, format_property};
use crate::utils::SVG_NAMESPACE;

/// Predicate deciding whether a non-root node is kept
pub type CloneFilter<'f, N> = &'f (dyn Fn(&N) -> bool + 'f);

/// Clones source trees, drawing pseudo-element class names from `uids`
pub struct TreeCloner<'a> {
    uids: &'a UidGenerator,
}

impl<'a> TreeCloner<'a> {
    #[must_use]
    pub fn new(uids: &'a UidGenerator) -> Self {
        Self { uids }
    }

    /// Clone `node` and its subtree
    ///
    /// Resolves to `Ok(None)` when `filter` rejects a non-root node; the root
    /// is never filtered.
    pub fn clone_node<'f, N: SourceNode>(
        &'f self,
        node: &'f N,
        filter: Option<CloneFilter<'f, N>>,
        is_root: bool,
    ) -> LocalBoxFuture<'f, RenderResult<Option<CloneNode>>> {
        async move {
            if !is_root && filter.is_some_and(|accept| !accept(node)) {
                return Ok(None);
            }

            let mut clone = shallow_copy(node).await?;

            // One child at a time, in source order
            for child in node.children() {
                if let Some(cloned) = self.clone_node(&child, filter, false).await? {
                    clone.append_child(cloned);
                }
            }

            self.process_clone(node, &mut clone)?;
            Ok(Some(clone))
        }
        .boxed_local()
    }

    fn process_clone<N: SourceNode>(&self, node: &N, clone: &mut CloneNode) -> RenderResult<()> {
        match node.kind() {
            NodeKind::Text | NodeKind::Other => return Ok(()),
            NodeKind::Element
            | NodeKind::ImageSurface
            | NodeKind::Image
            | NodeKind::VectorMarkup
            | NodeKind::VectorRect
            | NodeKind::FormTextArea
            | NodeKind::FormInput => {}
        }

        copy_style(node, clone)?;
        self.clone_pseudo_elements(node, clone)?;
        copy_user_input(node, clone);
        fix_svg(node.kind(), clone);
        Ok(())
    }

    fn clone_pseudo_elements<N: SourceNode>(&self, node: &N, clone: &mut CloneNode) -> RenderResult<()> {
        match node.kind() {
            NodeKind::Text | NodeKind::Other => return Ok(()),
            NodeKind::Element
            | NodeKind::ImageSurface
            | NodeKind::Image
            | NodeKind::VectorMarkup
            | NodeKind::VectorRect
            | NodeKind::FormTextArea
            | NodeKind::FormInput => {}
        }

        for pseudo in PseudoElement::ALL {
            let style = node
                .computed_style(Some(pseudo))
                .map_err(|e| clone_error(node, &e))?;
            let content = style.property_value("content");
            if content.is_empty() || content == "none" {
                continue;
            }

            let uid = self.uids.next_uid();
            clone.add_class(&uid);
            clone.append_child(CloneNode::style_element(pseudo_rule(&uid, pseudo, &style)));
        }
        Ok(())
    }
}

async fn shallow_copy<N: SourceNode>(node: &N) -> RenderResult<CloneNode> {
    let kind = node.kind();
    match kind {
        NodeKind::ImageSurface => {
            let src = node
                .capture_surface()
                .await
                .map_err(|e| clone_error(node, &e))?;
            let mut image = CloneNode::element(NodeKind::Image, "img");
            image.set_attribute("src", src);
            Ok(image)
        }
        NodeKind::Text | NodeKind::Other => Ok(CloneNode::character_data(
            kind,
            node.text().unwrap_or_default(),
        )),
        NodeKind::Element
        | NodeKind::Image
        | NodeKind::VectorMarkup
        | NodeKind::VectorRect
        | NodeKind::FormTextArea
        | NodeKind::FormInput => {
            let tag = node.tag_name().ok_or_else(|| RenderError::Clone {
                node: node.describe(),
                message: "element without a tag name".to_string(),
            })?;
            let mut clone = CloneNode::element(kind, tag);
            for (name, value) in node.attributes() {
                if name.eq_ignore_ascii_case("style") {
                    clone.style_mut().set_css_text(&value);
                } else {
                    clone.set_attribute(&name, value);
                }
            }
            Ok(clone)
        }
    }
}

/// Computed style onto the inline table, verbatim `cssText` when available
fn copy_style<N: SourceNode>(node: &N, clone: &mut CloneNode) -> RenderResult<()> {
    let computed = node.computed_style(None).map_err(|e| clone_error(node, &e))?;
    let style = clone.style_mut();
    match computed.css_text() {
        Some(css_text) => style.set_css_text(css_text),
        None => {
            for (name, value) in computed.iter() {
                style.set_property(name, &value.value, value.important);
            }
        }
    }
    Ok(())
}

/// `.uid:pseudo{...}` with `content` last
fn pseudo_rule(uid: &str, pseudo: PseudoElement, style: &StyleSnapshot) -> String {
    let content = style.property_value("content");
    let body = match style.css_text() {
        Some(css_text) => format!("{css_text} content: {content};"),
        None => {
            let properties: Vec<String> = style
                .iter()
                .filter(|(name, _)| *name != "content")
                .map(|(name, value)| format_property(name, value, ""))
                .collect();
            if properties.is_empty() {
                format!("content: {content};")
            } else {
                format!("{}; content: {content};", properties.join("; "))
            }
        }
    };
    format!(".{uid}{pseudo}{{{body}}}")
}

fn copy_user_input<N: SourceNode>(node: &N, clone: &mut CloneNode) {
    match node.kind() {
        NodeKind::FormTextArea => {
            if let Some(value) = node.form_value() {
                clone.replace_children_with_text(value);
            }
        }
        NodeKind::FormInput => {
            if let Some(value) = node.form_value() {
                clone.set_attribute("value", value);
            }
        }
        NodeKind::Element
        | NodeKind::Text
        | NodeKind::ImageSurface
        | NodeKind::Image
        | NodeKind::VectorMarkup
        | NodeKind::VectorRect
        | NodeKind::Other => {}
    }
}

fn fix_svg(kind: NodeKind, clone: &mut CloneNode) {
    match kind {
        NodeKind::VectorMarkup => {
            clone.set_attribute("xmlns", SVG_NAMESPACE);
        }
        NodeKind::VectorRect => {
            clone.set_attribute("xmlns", SVG_NAMESPACE);
            for dimension in ["width", "height"] {
                let value = match clone.attribute(dimension) {
                    Some(value) if !value.is_empty() => value.to_string(),
                    _ => continue,
                };
                clone.style_mut().set_property(dimension, &value, false);
            }
        }
        NodeKind::Element
        | NodeKind::Text
        | NodeKind::ImageSurface
        | NodeKind::Image
        | NodeKind::FormTextArea
        | NodeKind::FormInput
        | NodeKind::Other => {}
    }
}

fn clone_error<N: SourceNode>(node: &N, error: &HostError) -> RenderError {
    RenderError::Clone {
        node: node.describe(),
        message: error.to_string(),
    }
}
