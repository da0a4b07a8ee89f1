//! HTML documents parsed into static source trees

use kuchiki::traits::TendrilSink;
use kuchiki::{NodeData, NodeRef};

use super::node::{ElementBuilder, StaticNode, kind_for_tag};
use crate::host::{StyleSheet, StyleSheetSource};
use crate::style::{StyleDeclaration, parse_rules};
use crate::utils::{SVG_NAMESPACE, resolve_url};

/// A frozen document: one root node plus its style sheets
#[derive(Debug, Clone)]
pub struct StaticDocument {
    root: StaticNode,
    sheets: Vec<StyleSheet>,
}

impl StaticDocument {
    #[must_use]
    pub fn new(root: StaticNode, sheets: Vec<StyleSheet>) -> Self {
        Self { root, sheets }
    }

    /// Parse HTML into a static tree
    ///
    /// The `<body>` becomes the root. Each element's computed style is its
    /// `style` attribute, there is no cascade. `<style>` elements become
    /// readable sheets located at `base_url`; linked sheets stay unreadable
    /// until registered with [`StaticDocument::with_style_sheet`].
    #[must_use]
    pub fn parse_html(html: &str, base_url: Option<&str>) -> Self {
        let document = kuchiki::parse_html().one(html);
        let root_ref = document
            .select_first("body")
            .map(|body| body.as_node().clone())
            .ok()
            .or_else(|| document.children().find(|n| n.as_element().is_some()))
            .unwrap_or_else(|| document.clone());

        let mut sheets = Vec::new();
        collect_sheets(&document, base_url, &mut sheets);

        let root = convert(&root_ref).unwrap_or_else(|| StaticNode::element("body").build());
        log::debug!("Parsed static document with {} style sheets", sheets.len());

        Self { root, sheets }
    }

    /// Register the text of a linked style sheet
    ///
    /// Replaces an unreadable sheet with the same `href`, or appends a new
    /// sheet when none matches.
    #[must_use]
    pub fn with_style_sheet(mut self, href: &str, css: &str) -> Self {
        let sheet = StyleSheet::readable(Some(href.to_string()), parse_rules(css));
        match self
            .sheets
            .iter_mut()
            .find(|existing| existing.href.as_deref() == Some(href) && existing.rules.is_err())
        {
            Some(slot) => *slot = sheet,
            None => self.sheets.push(sheet),
        }
        self
    }

    #[must_use]
    pub fn root(&self) -> &StaticNode {
        &self.root
    }

    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<StaticNode> {
        self.root.element_by_id(id)
    }
}

impl StyleSheetSource for StaticDocument {
    fn style_sheets(&self) -> Vec<StyleSheet> {
        self.sheets.clone()
    }
}

fn collect_sheets(document: &NodeRef, base_url: Option<&str>, sheets: &mut Vec<StyleSheet>) {
    let Ok(matches) = document.select("style, link") else {
        return;
    };

    for element in matches {
        let tag = element.name.local.to_string().to_ascii_lowercase();
        let attrs = element.attributes.borrow();

        if tag == "style" {
            let css = element.as_node().text_contents();
            sheets.push(StyleSheet::readable(
                base_url.map(str::to_string),
                parse_rules(&css),
            ));
            continue;
        }

        let is_stylesheet = attrs
            .get("rel")
            .is_some_and(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")));
        let Some(href) = attrs.get("href").filter(|_| is_stylesheet) else {
            continue;
        };

        let href = match base_url {
            Some(base) => resolve_url(base, href).unwrap_or_else(|e| {
                log::warn!("Failed to resolve style sheet href '{href}' against '{base}': {e}");
                href.to_string()
            }),
            None => href.to_string(),
        };
        sheets.push(StyleSheet::unreadable(href));
    }
}

fn convert(node: &NodeRef) -> Option<StaticNode> {
    match node.data() {
        NodeData::Element(element) => {
            let tag = element.name.local.to_string().to_ascii_lowercase();
            let in_svg = &*element.name.ns == SVG_NAMESPACE;
            let kind_tag = if in_svg { element.name.local.to_string() } else { tag.clone() };

            let mut builder = if in_svg {
                StaticNode::svg_element(&kind_tag)
            } else {
                StaticNode::element(&tag)
            };

            let attributes: Vec<(String, String)> = element
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attr)| (name.local.to_string(), attr.value.clone()))
                .collect();

            for (name, value) in &attributes {
                builder = builder.attr(name, value.clone());
            }

            let inline = attributes
                .iter()
                .find(|(name, _)| name == "style")
                .map(|(_, value)| StyleDeclaration::parse(value))
                .unwrap_or_default();
            builder = apply_inline_style(builder, &inline);

            match kind_for_tag(&kind_tag, in_svg) {
                crate::host::NodeKind::FormInput => {
                    let value = attributes
                        .iter()
                        .find(|(name, _)| name == "value")
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default();
                    builder = builder.value(value);
                }
                crate::host::NodeKind::FormTextArea => {
                    builder = builder.value(node.text_contents());
                }
                _ => {}
            }

            let children = node.children().filter_map(|child| convert(&child));
            Some(builder.children(children).build())
        }
        NodeData::Text(text) => Some(StaticNode::text(text.borrow().clone())),
        NodeData::Comment(text) => Some(StaticNode::comment(text.borrow().clone())),
        _ => None,
    }
}

fn apply_inline_style(mut builder: ElementBuilder, inline: &StyleDeclaration) -> ElementBuilder {
    for (name, value) in inline.iter() {
        builder = if value.important {
            builder.important_style(name, &value.value)
        } else {
            builder.style(name, &value.value)
        };
    }

    let width = pixel_length(inline.get_property_value("width"));
    let height = pixel_length(inline.get_property_value("height"));
    builder.scroll_size(width, height)
}

/// Whole pixels of a `px` length, 0 for anything else
fn pixel_length(value: &str) -> u32 {
    value
        .trim()
        .strip_suffix("px")
        .and_then(|number| number.trim().parse::<f64>().ok())
        .filter(|number| number.is_finite() && *number >= 0.0)
        .map_or(0, |number| number.ceil() as u32)
}
