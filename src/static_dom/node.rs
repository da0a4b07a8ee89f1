//! In-memory source nodes
//!
//! `StaticNode` is a frozen tree whose computed styles are supplied up front,
//! either by hand through `ElementBuilder` or by `StaticDocument::parse_html`.

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::sync::Arc;

use crate::host::{HostError, NodeKind, PseudoElement, SourceNode};
use crate::style::{StyleDeclaration, StyleSnapshot};
use crate::utils::{TRANSPARENT_PIXEL_BASE64, data_url};

/// Cheaply cloneable handle to an immutable in-memory node
#[derive(Clone)]
pub struct StaticNode(Arc<StaticNodeData>);

struct StaticNodeData {
    kind: NodeKind,
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    style: Result<StyleSnapshot, HostError>,
    pseudo: Vec<(PseudoElement, StyleSnapshot)>,
    form_value: Option<String>,
    surface: Option<Result<String, HostError>>,
    scroll: (u32, u32),
    children: Vec<StaticNode>,
}

impl StaticNode {
    /// Start building an HTML element; the kind follows from the tag
    #[must_use]
    pub fn element(tag: &str) -> ElementBuilder {
        let tag = tag.to_ascii_lowercase();
        ElementBuilder::new(kind_for_tag(&tag, false), tag)
    }

    /// Start building an element in the SVG namespace
    #[must_use]
    pub fn svg_element(tag: &str) -> ElementBuilder {
        ElementBuilder::new(kind_for_tag(tag, true), tag.to_string())
    }

    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::character_data(NodeKind::Text, data.into())
    }

    #[must_use]
    pub fn comment(data: impl Into<String>) -> Self {
        Self::character_data(NodeKind::Other, data.into())
    }

    fn character_data(kind: NodeKind, data: String) -> Self {
        Self(Arc::new(StaticNodeData {
            kind,
            tag: None,
            attributes: Vec::new(),
            text: Some(data),
            style: Ok(StyleSnapshot::default()),
            pseudo: Vec::new(),
            form_value: None,
            surface: None,
            scroll: (0, 0),
            children: Vec::new(),
        }))
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.0
            .attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first search including this node
    #[must_use]
    pub fn find(&self, predicate: &dyn Fn(&StaticNode) -> bool) -> Option<StaticNode> {
        if predicate(self) {
            return Some(self.clone());
        }
        self.0.children.iter().find_map(|child| child.find(predicate))
    }

    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<StaticNode> {
        self.find(&|node| node.attribute("id") == Some(id))
    }
}

impl std::fmt::Debug for StaticNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticNode")
            .field("kind", &self.0.kind)
            .field("tag", &self.0.tag)
            .field("children", &self.0.children.len())
            .finish()
    }
}

impl SourceNode for StaticNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn tag_name(&self) -> Option<String> {
        self.0.tag.clone()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.0.attributes.clone()
    }

    fn text(&self) -> Option<String> {
        self.0.text.clone()
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.clone()
    }

    fn computed_style(&self, pseudo: Option<PseudoElement>) -> Result<StyleSnapshot, HostError> {
        let style = self.0.style.clone()?;
        match pseudo {
            None => Ok(style),
            Some(pseudo) => Ok(self
                .0
                .pseudo
                .iter()
                .find(|(existing, _)| *existing == pseudo)
                .map(|(_, snapshot)| snapshot.clone())
                .unwrap_or_default()),
        }
    }

    fn form_value(&self) -> Option<String> {
        self.0.form_value.clone()
    }

    fn capture_surface(&self) -> LocalBoxFuture<'_, Result<String, HostError>> {
        // Without pixel data a surface reads back as fully transparent
        let captured = match &self.0.surface {
            Some(result) => result.clone(),
            None => Ok(data_url(TRANSPARENT_PIXEL_BASE64, "image/gif")),
        };
        future::ready(captured).boxed_local()
    }

    fn scroll_size(&self) -> (u32, u32) {
        self.0.scroll
    }
}

pub(crate) fn kind_for_tag(tag: &str, svg_namespace: bool) -> NodeKind {
    if svg_namespace || tag == "svg" {
        return if tag == "rect" {
            NodeKind::VectorRect
        } else {
            NodeKind::VectorMarkup
        };
    }
    match tag {
        "canvas" => NodeKind::ImageSurface,
        "img" => NodeKind::Image,
        "textarea" => NodeKind::FormTextArea,
        "input" => NodeKind::FormInput,
        _ => NodeKind::Element,
    }
}

/// Fluent builder for `StaticNode` elements
pub struct ElementBuilder {
    kind: NodeKind,
    tag: String,
    attributes: Vec<(String, String)>,
    style: StyleDeclaration,
    css_text: Option<String>,
    style_error: Option<HostError>,
    pseudo: Vec<(PseudoElement, StyleSnapshot)>,
    form_value: Option<String>,
    surface: Option<Result<String, HostError>>,
    scroll: (u32, u32),
    children: Vec<StaticNode>,
}

impl ElementBuilder {
    fn new(kind: NodeKind, tag: String) -> Self {
        Self {
            kind,
            tag,
            attributes: Vec::new(),
            style: StyleDeclaration::new(),
            css_text: None,
            style_error: None,
            pseudo: Vec::new(),
            form_value: None,
            surface: None,
            scroll: (0, 0),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    /// Add a computed style property
    #[must_use]
    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.style.set_property(name, value, false);
        self
    }

    /// Add a computed style property with `!important` priority
    #[must_use]
    pub fn important_style(mut self, name: &str, value: &str) -> Self {
        self.style.set_property(name, value, true);
        self
    }

    /// Replace the computed style by a verbatim `cssText`
    #[must_use]
    pub fn computed_css_text(mut self, css_text: impl Into<String>) -> Self {
        self.css_text = Some(css_text.into());
        self
    }

    /// Make every computed-style read of this node fail
    #[must_use]
    pub fn style_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.style_error = Some(HostError::StyleUnavailable(reason.into()));
        self
    }

    /// Give a pseudo-element generated content, `content` as written in CSS
    #[must_use]
    pub fn pseudo(self, pseudo: PseudoElement, content: &str) -> Self {
        let snapshot = StyleSnapshot::from_declarations([("content", content)].into_iter().collect());
        self.pseudo_style(pseudo, snapshot)
    }

    #[must_use]
    pub fn pseudo_style(mut self, pseudo: PseudoElement, snapshot: StyleSnapshot) -> Self {
        self.pseudo.retain(|(existing, _)| *existing != pseudo);
        self.pseudo.push((pseudo, snapshot));
        self
    }

    /// Live value of a form control
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.form_value = Some(value.into());
        self
    }

    /// Pixel content of a drawing surface, as a data URL
    #[must_use]
    pub fn surface(mut self, data_url: impl Into<String>) -> Self {
        self.surface = Some(Ok(data_url.into()));
        self
    }

    #[must_use]
    pub fn surface_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.surface = Some(Err(HostError::SurfaceUnavailable(reason.into())));
        self
    }

    #[must_use]
    pub fn scroll_size(mut self, width: u32, height: u32) -> Self {
        self.scroll = (width, height);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<StaticNode>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = StaticNode>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn build(self) -> StaticNode {
        let style = match (self.style_error, self.css_text) {
            (Some(error), _) => Err(error),
            (None, Some(css_text)) => Ok(StyleSnapshot::from_css_text(css_text)),
            (None, None) => Ok(StyleSnapshot::from_declarations(self.style)),
        };

        StaticNode(Arc::new(StaticNodeData {
            kind: self.kind,
            tag: Some(self.tag),
            attributes: self.attributes,
            text: None,
            style,
            pseudo: self.pseudo,
            form_value: self.form_value,
            surface: self.surface,
            scroll: self.scroll,
            children: self.children,
        }))
    }
}

impl From<ElementBuilder> for StaticNode {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_tag_and_namespace() {
        assert_eq!(StaticNode::element("CANVAS").build().kind(), NodeKind::ImageSurface);
        assert_eq!(StaticNode::element("img").build().kind(), NodeKind::Image);
        assert_eq!(StaticNode::element("svg").build().kind(), NodeKind::VectorMarkup);
        assert_eq!(StaticNode::element("rect").build().kind(), NodeKind::Element);
        assert_eq!(StaticNode::svg_element("rect").build().kind(), NodeKind::VectorRect);
        assert_eq!(StaticNode::text("x").kind(), NodeKind::Text);
        assert_eq!(StaticNode::comment("x").kind(), NodeKind::Other);
    }

    #[test]
    fn pseudo_style_defaults_to_empty() {
        let node = StaticNode::element("p")
            .pseudo(PseudoElement::After, "\"!\"")
            .build();

        let before = node.computed_style(Some(PseudoElement::Before)).unwrap();
        let after = node.computed_style(Some(PseudoElement::After)).unwrap();
        assert_eq!(before.property_value("content"), "");
        assert_eq!(after.property_value("content"), "\"!\"");
    }

    #[test]
    fn unavailable_style_fails_every_read() {
        let node = StaticNode::element("div").style_unavailable("detached").build();
        assert!(node.computed_style(None).is_err());
        assert!(node.computed_style(Some(PseudoElement::Before)).is_err());
    }

    #[test]
    fn element_lookup_by_id() {
        let root = StaticNode::element("div")
            .child(StaticNode::element("span").attr("id", "a"))
            .child(StaticNode::element("p").child(StaticNode::element("b").attr("id", "b")))
            .build();

        let found = root.element_by_id("b").expect("nested element");
        assert_eq!(found.tag_name().as_deref(), Some("b"));
        assert!(root.element_by_id("missing").is_none());
    }
}
