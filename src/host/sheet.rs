//! Style sheets exposed by the host

use super::node::HostError;

/// Kind of a top-level style-sheet rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    FontFace,
    Style,
    Other,
}

/// One top-level rule of a style sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub kind: RuleKind,
    /// Full rule text, prelude and block
    pub css_text: String,
    /// Value of the `src` descriptor of a font-face rule
    pub src: Option<String>,
}

impl CssRule {
    #[must_use]
    pub fn font_face(css_text: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::FontFace,
            css_text: css_text.into(),
            src: Some(src.into()),
        }
    }
}

/// A style sheet of the host document
///
/// `rules` is an error when the host refuses access, typically a
/// cross-origin sheet.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub href: Option<String>,
    pub rules: Result<Vec<CssRule>, HostError>,
}

impl StyleSheet {
    #[must_use]
    pub fn readable(href: Option<String>, rules: Vec<CssRule>) -> Self {
        Self {
            href,
            rules: Ok(rules),
        }
    }

    #[must_use]
    pub fn unreadable(href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            rules: Err(HostError::SheetUnreadable { href: href.clone() }),
            href: Some(href),
        }
    }
}

/// Source of the document's style sheets, in document order
pub trait StyleSheetSource {
    fn style_sheets(&self) -> Vec<StyleSheet>;
}

impl StyleSheetSource for Vec<StyleSheet> {
    fn style_sheets(&self) -> Vec<StyleSheet> {
        self.clone()
    }
}

impl StyleSheetSource for [StyleSheet] {
    fn style_sheets(&self) -> Vec<StyleSheet> {
        self.to_vec()
    }
}
