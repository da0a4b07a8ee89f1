//! Top-level rule scanner for style-sheet text
//!
//! Only splits a sheet into its top-level rules and classifies them; nested
//! blocks (`@media`, `@supports`) are kept whole as `RuleKind::Other`.

use super::declaration::StyleDeclaration;
use crate::host::{CssRule, RuleKind};

/// Split style-sheet text into top-level rules in source order
#[must_use]
pub fn parse_rules(css: &str) -> Vec<CssRule> {
    let mut rules = Vec::new();
    let mut scanner = Scanner::new(css);

    while let Some(text) = scanner.next_rule() {
        if let Some(rule) = classify(text) {
            rules.push(rule);
        }
    }
    rules
}

fn classify(text: &str) -> Option<CssRule> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let prelude = text.split('{').next().unwrap_or(text).trim();
    let kind = if prelude.eq_ignore_ascii_case("@font-face") {
        RuleKind::FontFace
    } else if prelude.starts_with('@') {
        RuleKind::Other
    } else {
        RuleKind::Style
    };

    let src = match kind {
        RuleKind::FontFace => {
            let body = block_body(text);
            let declarations = StyleDeclaration::parse(body);
            Some(declarations.get_property_value("src").to_string())
        }
        RuleKind::Style | RuleKind::Other => None,
    };

    Some(CssRule {
        kind,
        css_text: text.to_string(),
        src,
    })
}

fn block_body(rule: &str) -> &str {
    match (rule.find('{'), rule.rfind('}')) {
        (Some(open), Some(close)) if close > open => &rule[open + 1..close],
        (Some(open), _) => &rule[open + 1..],
        _ => "",
    }
}

struct Scanner<'a> {
    css: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(css: &'a str) -> Self {
        Self { css, pos: 0 }
    }

    /// Byte range of the next rule, comments between rules skipped
    fn next_rule(&mut self) -> Option<&'a str> {
        self.skip_trivia();
        if self.pos >= self.css.len() {
            return None;
        }

        let start = self.pos;
        let bytes = self.css.as_bytes();
        let mut depth = 0usize;
        let mut i = self.pos;

        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i),
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth = depth.saturating_sub(1);
                    i += 1;
                    if depth == 0 {
                        break;
                    }
                }
                // Block-less at-rules such as @import end at the semicolon
                b';' if depth == 0 => {
                    i += 1;
                    break;
                }
                _ => i += 1,
            }
        }

        self.pos = i.min(bytes.len());
        Some(&self.css[start..self.pos])
    }

    fn skip_trivia(&mut self) {
        let bytes = self.css.as_bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if bytes.get(self.pos) == Some(&b'/') && bytes.get(self.pos + 1) == Some(&b'*') {
                self.pos = skip_comment(bytes, self.pos);
            } else {
                break;
            }
        }
    }
}

/// Index just past the string starting at `start`
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the comment starting at `start`
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"
        /* fonts */
        @import url("print.css") print;
        @font-face {
            font-family: "Inter";
            src: url("../fonts/inter.woff2") format("woff2"), url(inter.woff);
        }
        body { color: red; content: "}"; }
        @media (min-width: 600px) { body { color: blue; } }
    "#;

    #[test]
    fn splits_top_level_rules_in_order() {
        let rules = parse_rules(SHEET);
        let kinds: Vec<_> = rules.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RuleKind::Other, RuleKind::FontFace, RuleKind::Style, RuleKind::Other]
        );
        assert!(rules[3].css_text.ends_with("} }"));
    }

    #[test]
    fn font_face_src_is_extracted() {
        let rules = parse_rules(SHEET);
        let font = &rules[1];
        assert_eq!(
            font.src.as_deref(),
            Some(r#"url("../fonts/inter.woff2") format("woff2"), url(inter.woff)"#)
        );
        assert!(font.css_text.starts_with("@font-face"));
    }

    #[test]
    fn braces_inside_strings_do_not_close_blocks() {
        let rules = parse_rules(SHEET);
        assert_eq!(rules[2].css_text, r#"body { color: red; content: "}"; }"#);
    }

    #[test]
    fn empty_sheet_has_no_rules() {
        assert!(parse_rules("  /* nothing */  ").is_empty());
    }
}
