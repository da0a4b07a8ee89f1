//! Detached clone tree

use crate::host::NodeKind;
use crate::style::StyleDeclaration;

/// Exclusively owned copy of a source node and its subtree
///
/// The `style` attribute of the source is not kept among `attributes`; it
/// lives in the inline style table and is written back on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneNode {
    kind: NodeKind,
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    style: StyleDeclaration,
    text: Option<String>,
    children: Vec<CloneNode>,
}

impl CloneNode {
    #[must_use]
    pub fn element(kind: NodeKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: Some(tag.into()),
            attributes: Vec::new(),
            style: StyleDeclaration::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::character_data(NodeKind::Text, data)
    }

    /// Comment or other non-element node carrying character data
    #[must_use]
    pub fn character_data(kind: NodeKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            tag: None,
            attributes: Vec::new(),
            style: StyleDeclaration::new(),
            text: Some(data.into()),
            children: Vec::new(),
        }
    }

    /// A `<style>` element holding `css`
    #[must_use]
    pub fn style_element(css: impl Into<String>) -> Self {
        let mut style = Self::element(NodeKind::Element, "style");
        style.append_child(Self::text(css));
        style
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    #[must_use]
    pub fn text_data(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position when it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Append `class` to the class list
    pub fn add_class(&mut self, class: &str) {
        let classes = match self.attribute("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute("class", classes);
    }

    /// Image source of an `Image` node
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.attribute("src")
    }

    #[must_use]
    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleDeclaration {
        &mut self.style
    }

    #[must_use]
    pub fn children(&self) -> &[CloneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<CloneNode> {
        &mut self.children
    }

    pub fn append_child(&mut self, child: CloneNode) {
        self.children.push(child);
    }

    /// Drop all children and put a single text node in their place
    pub fn replace_children_with_text(&mut self, data: impl Into<String>) {
        self.children.clear();
        self.children.push(Self::text(data));
    }

    /// Concatenated text of all descendant text nodes
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.kind {
            NodeKind::Text => out.push_str(self.text.as_deref().unwrap_or_default()),
            _ => self.children.iter().for_each(|child| child.collect_text(out)),
        }
    }
}
