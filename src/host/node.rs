//! Source node trait and node kinds

use futures::future::LocalBoxFuture;
use thiserror::Error;

use crate::style::StyleSnapshot;

/// Closed set of node kinds the pipeline distinguishes
///
/// Every branch point of the cloner matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Any HTML element without special handling
    Element,
    Text,
    /// A raster drawing surface (`<canvas>`), captured as a still image
    ImageSurface,
    /// A raster image element (`<img>`)
    Image,
    /// An element in the SVG namespace
    VectorMarkup,
    /// An SVG `<rect>`
    VectorRect,
    FormTextArea,
    FormInput,
    /// Comments, processing instructions and anything else
    Other,
}

/// Generated-content pseudo-elements emulated in the clone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    Before,
    After,
}

impl PseudoElement {
    pub const ALL: [PseudoElement; 2] = [PseudoElement::Before, PseudoElement::After];

    /// Selector suffix without the leading colon
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PseudoElement::Before => "before",
            PseudoElement::After => "after",
        }
    }
}

impl std::fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

/// Failures reported by the host while it is being read
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Computed style unavailable: {0}")]
    StyleUnavailable(String),

    #[error("Drawing surface could not be captured: {0}")]
    SurfaceUnavailable(String),

    #[error("Style sheet {href} is not readable")]
    SheetUnreadable { href: String },
}

/// Read-only handle into the host's live tree
///
/// Handles are cheap to clone. The pipeline reads each node once while
/// cloning and keeps nothing from it afterwards.
pub trait SourceNode: Clone {
    fn kind(&self) -> NodeKind;

    /// Lowercase local tag name, `None` for non-elements
    fn tag_name(&self) -> Option<String>;

    /// Attributes in document order
    fn attributes(&self) -> Vec<(String, String)>;

    /// Character data of text and comment nodes
    fn text(&self) -> Option<String>;

    /// Current children in document order
    fn children(&self) -> Vec<Self>;

    /// Computed style of the element, or of one of its pseudo-elements
    ///
    /// # Errors
    ///
    /// Returns `HostError::StyleUnavailable` if the host cannot resolve style
    /// for this node (e.g. it was detached mid-conversion).
    fn computed_style(&self, pseudo: Option<PseudoElement>) -> Result<StyleSnapshot, HostError>;

    /// Live value of a form control, which computed style does not carry
    fn form_value(&self) -> Option<String>;

    /// Current pixel content of a drawing surface as a data URL
    fn capture_surface(&self) -> LocalBoxFuture<'_, Result<String, HostError>>;

    /// Scroll width and height in CSS pixels
    fn scroll_size(&self) -> (u32, u32);

    /// Short description used in error messages
    fn describe(&self) -> String {
        match self.tag_name() {
            Some(tag) => format!("<{tag}>"),
            None => format!("{:?} node", self.kind()),
        }
    }
}
