//! XML serialization of clone trees

use crate::clone::CloneNode;
use crate::host::NodeKind;
use crate::utils::XHTML_NAMESPACE;

/// HTML elements that never have content and are written self-closed
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize `node` as well-formed XHTML
///
/// The root element is stamped with the XHTML namespace unless it already
/// declares one. The inline style table is written as the `style` attribute.
#[must_use]
pub fn serialize_xhtml(node: &CloneNode) -> String {
    let mut out = String::new();
    write_node(node, true, &mut out);
    out
}

fn write_node(node: &CloneNode, is_root: bool, out: &mut String) {
    match node.kind() {
        NodeKind::Text => {
            out.push_str(&html_escape::encode_text(node.text_data().unwrap_or_default()));
        }
        NodeKind::Other => {
            // Comments must not contain `--`
            let data = node.text_data().unwrap_or_default().replace("--", "- -");
            out.push_str("<!--");
            out.push_str(&data);
            out.push_str("-->");
        }
        NodeKind::Element
        | NodeKind::ImageSurface
        | NodeKind::Image
        | NodeKind::VectorMarkup
        | NodeKind::VectorRect
        | NodeKind::FormTextArea
        | NodeKind::FormInput => write_element(node, is_root, out),
    }
}

fn write_element(node: &CloneNode, is_root: bool, out: &mut String) {
    let tag = node.tag().unwrap_or("div");

    out.push('<');
    out.push_str(tag);

    if is_root && node.attribute("xmlns").is_none() {
        write_attribute("xmlns", XHTML_NAMESPACE, out);
    }
    for (name, value) in node.attributes() {
        write_attribute(name, value, out);
    }
    if !node.style().is_empty() {
        write_attribute("style", &node.style().css_text(), out);
    }

    if node.children().is_empty() && self_closes(node.kind(), tag) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in node.children() {
        write_node(child, false, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

fn self_closes(kind: NodeKind, tag: &str) -> bool {
    match kind {
        NodeKind::VectorMarkup | NodeKind::VectorRect => true,
        NodeKind::Element
        | NodeKind::ImageSurface
        | NodeKind::Image
        | NodeKind::FormTextArea
        | NodeKind::FormInput
        | NodeKind::Text
        | NodeKind::Other => VOID_ELEMENTS.contains(&tag),
    }
}
