//! Document assembly
//!
//! Final touches on the clone root and the vector-image container that
//! carries the serialized tree.

pub mod serializer;

pub use serializer::serialize_xhtml;

use crate::clone::CloneNode;
use crate::utils::{SVG_DATA_URI_PREFIX, SVG_NAMESPACE, escape_xhtml};

/// Append a `<style>` child holding `css` to the root
pub fn append_style(root: &mut CloneNode, css: &str) {
    root.append_child(CloneNode::style_element(css));
}

/// Paint the root's background with `color`
pub fn apply_background(root: &mut CloneNode, color: &str) {
    root.style_mut().set_property("background-color", color, false);
}

/// Serialize `node` into a size-stamped SVG data URI
#[must_use]
pub fn make_svg_data_uri(node: &CloneNode, width: u32, height: u32) -> String {
    let xhtml = escape_xhtml(&serialize_xhtml(node));
    format!(
        "{SVG_DATA_URI_PREFIX}<svg xmlns=\"{SVG_NAMESPACE}\" width=\"{width}\" height=\"{height}\">\
         <foreignObject x=\"0\" y=\"0\" width=\"100%\" height=\"100%\">{xhtml}</foreignObject></svg>"
    )
}
