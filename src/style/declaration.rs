//! Ordered CSS declaration tables
//!
//! `StyleDeclaration` is the mutable property table behind a clone's inline
//! style. `StyleSnapshot` is the immutable computed-style capture a host hands
//! to the cloner.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMPORTANT_RE: Regex = Regex::new(r"(?i)\s*!\s*important\s*$")
        .expect("BUG: hardcoded !important regex is invalid");
}

/// One declared value and its priority flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValue {
    pub value: String,
    pub important: bool,
}

/// Ordered property table with `cssText` parsing and serialization
///
/// Setting an existing property keeps its original position, like the
/// CSSOM does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    entries: Vec<(String, StyleValue)>,
}

impl StyleDeclaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration block body such as `color: red; margin: 0 !important`
    ///
    /// Malformed declarations (no colon, empty name or value) are skipped.
    #[must_use]
    pub fn parse(css_text: &str) -> Self {
        let mut declaration = Self::new();
        declaration.set_css_text(css_text);
        declaration
    }

    /// Replace every property with the ones declared in `css_text`
    pub fn set_css_text(&mut self, css_text: &str) {
        self.entries.clear();
        for chunk in split_top_level(css_text, ';') {
            let Some((name, value)) = split_declaration(&chunk) else {
                continue;
            };
            let (value, important) = match IMPORTANT_RE.find(value) {
                Some(m) => (value[..m.start()].trim(), true),
                None => (value, false),
            };
            self.set_property(name, value, important);
        }
    }

    /// Serialize as `name: value;` pairs separated by single spaces
    #[must_use]
    pub fn css_text(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format_property(name, value, ";"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, name: &str, value: &str, important: bool) {
        let name = normalize_name(name);
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }

        let style_value = StyleValue {
            value: value.to_string(),
            important,
        };
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = style_value,
            None => self.entries.push((name, style_value)),
        }
    }

    /// Remove a property, returning its previous value
    pub fn remove_property(&mut self, name: &str) -> Option<StyleValue> {
        let name = normalize_name(name);
        let index = self.entries.iter().position(|(existing, _)| *existing == name)?;
        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        let name = normalize_name(name);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value)
    }

    /// Value of a property, empty when it is not set
    #[must_use]
    pub fn get_property_value(&self, name: &str) -> &str {
        self.get(name).map_or("", |v| v.value.as_str())
    }

    #[must_use]
    pub fn get_property_priority(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v.important)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for StyleDeclaration {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut declaration = Self::new();
        for (name, value) in iter {
            declaration.set_property(name, value, false);
        }
        declaration
    }
}

/// Computed style captured from a host node, immutable once built
///
/// Hosts that can produce the verbatim `cssText` of a computed style pass it
/// along; the cloner prefers it over a property-by-property copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    declarations: StyleDeclaration,
    css_text: Option<String>,
}

impl StyleSnapshot {
    /// Snapshot without a verbatim `cssText`
    #[must_use]
    pub fn from_declarations(declarations: StyleDeclaration) -> Self {
        Self {
            declarations,
            css_text: None,
        }
    }

    /// Snapshot that keeps `css_text` verbatim next to its parsed properties
    #[must_use]
    pub fn from_css_text(css_text: impl Into<String>) -> Self {
        let css_text = css_text.into();
        Self {
            declarations: StyleDeclaration::parse(&css_text),
            css_text: Some(css_text),
        }
    }

    /// The verbatim `cssText`, when the host provided a non-empty one
    #[must_use]
    pub fn css_text(&self) -> Option<&str> {
        self.css_text.as_deref().filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn declarations(&self) -> &StyleDeclaration {
        &self.declarations
    }

    #[must_use]
    pub fn property_value(&self, name: &str) -> &str {
        self.declarations.get_property_value(name)
    }

    #[must_use]
    pub fn property_priority(&self, name: &str) -> bool {
        self.declarations.get_property_priority(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.declarations.iter()
    }
}

impl From<StyleDeclaration> for StyleSnapshot {
    fn from(declarations: StyleDeclaration) -> Self {
        Self::from_declarations(declarations)
    }
}

/// `name: value[ !important]` followed by `terminator`
pub(crate) fn format_property(name: &str, value: &StyleValue, terminator: &str) -> String {
    let priority = if value.important { " !important" } else { "" };
    format!("{name}: {}{priority}{terminator}", value.value)
}

fn normalize_name(name: &str) -> String {
    let name = name.trim();
    // Custom properties are case-sensitive
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

fn split_declaration(chunk: &str) -> Option<(&str, &str)> {
    let (name, value) = chunk.split_once(':')?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Split on `delimiter` outside of strings, parentheses and comments
///
/// Comments are dropped from the output chunks.
pub(crate) fn split_top_level(text: &str, delimiter: char) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == delimiter && depth == 0 => {
                chunks.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
