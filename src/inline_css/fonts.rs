//! Web font resolution
//!
//! Collects the document's `@font-face` rules that still reference external
//! files and resolves them into CSS with the font bytes embedded.

use futures::future::try_join_all;

use super::fetcher::ResourceFetch;
use super::inliner;
use super::types::ResourceType;
use crate::errors::RenderResult;
use crate::host::{CssRule, RuleKind, StyleSheetSource};

/// One `@font-face` rule selected for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebFontDescriptor {
    /// Rule text as found in the style sheet
    pub css_text: String,
    /// Location of the owning sheet, the base for relative `src` URLs
    pub base_url: Option<String>,
    /// Rule text with every `url()` embedded, set by `resolve`
    pub resolved: Option<String>,
}

impl WebFontDescriptor {
    #[must_use]
    pub fn new(css_text: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            css_text: css_text.into(),
            base_url,
            resolved: None,
        }
    }

    /// Embed the rule's resources, caching the result on the descriptor
    ///
    /// # Errors
    ///
    /// Propagates any inlining failure of the rule's URLs.
    pub async fn resolve(&mut self, fetch: &dyn ResourceFetch) -> RenderResult<&str> {
        if self.resolved.is_none() {
            log::debug!(
                "Inlining {} references relative to {}",
                ResourceType::Font,
                self.base_url.as_deref().unwrap_or("<document>")
            );
            let resolved =
                inliner::inline_all(&self.css_text, self.base_url.as_deref(), fetch).await?;
            self.resolved = Some(resolved);
        }
        Ok(self.resolved.as_deref().unwrap_or_default())
    }
}

/// Font-face resolver over a document's style sheets
pub struct FontResolver<'a> {
    fetch: &'a dyn ResourceFetch,
}

impl<'a> FontResolver<'a> {
    #[must_use]
    pub fn new(fetch: &'a dyn ResourceFetch) -> Self {
        Self { fetch }
    }

    /// Font-face rules that need inlining, in source order
    ///
    /// Sheets the host refuses to expose are skipped with a warning.
    pub fn read_all(sheets: &(impl StyleSheetSource + ?Sized)) -> Vec<WebFontDescriptor> {
        let mut fonts = Vec::new();

        for sheet in sheets.style_sheets() {
            let rules = match sheet.rules {
                Ok(rules) => rules,
                Err(e) => {
                    log::warn!(
                        "Error while reading CSS rules from {}: {e}",
                        sheet.href.as_deref().unwrap_or("<inline>")
                    );
                    continue;
                }
            };

            fonts.extend(
                rules
                    .into_iter()
                    .filter(needs_inlining)
                    .map(|rule| WebFontDescriptor::new(rule.css_text, sheet.href.clone())),
            );
        }

        log::debug!("Found {} web fonts to embed", fonts.len());
        fonts
    }

    /// Resolve every selected font face and join them with newlines
    ///
    /// Rules are fetched concurrently; the output keeps source order.
    ///
    /// # Errors
    ///
    /// The first failing rule fails the whole resolution.
    pub async fn resolve_all(&self, sheets: &(impl StyleSheetSource + ?Sized)) -> RenderResult<String> {
        let mut fonts = Self::read_all(sheets);

        let resolved = try_join_all(fonts.iter_mut().map(|font| async move {
            font.resolve(self.fetch).await.map(str::to_string)
        }))
        .await?;

        Ok(resolved.join("\n"))
    }
}

fn needs_inlining(rule: &CssRule) -> bool {
    match rule.kind {
        RuleKind::FontFace => rule
            .src
            .as_deref()
            .is_some_and(|src| !inliner::read_urls(src).is_empty()),
        RuleKind::Style | RuleKind::Other => false,
    }
}
