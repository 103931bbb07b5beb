//! Block-level conversion of a document body.
//!
//! A single forward pass over the body lines. The only structure carried
//! between lines is the [`BlockMode`]: plain lines, an open code fence, or
//! an open ordered/unordered list run. A code fence dominates list
//! detection, so fence content is never read as list items.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Diagnostic, Diagnostics};
use crate::inline::translate_line;
use crate::lexer::{trim_line, Lexer, Line};

/// Line toggling fenced code on and off (compared after trimming).
pub const FENCE: &str = "```";

const CODE_OPEN: &str = "<code><pre>";
const CODE_CLOSE: &str = "</pre></code>";

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.[ \t]+(.*)$").expect("valid ordered item pattern"));
static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-[ \t]+(.*)$").expect("valid unordered item pattern"));

/// Kind of list run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "</ol>",
            ListKind::Unordered => "</ul>",
        }
    }
}

/// A line recognized as a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub kind: ListKind,
    /// Numeral of an ordered item, as written.
    pub number: Option<&'a str>,
    /// Item text with the marker removed.
    pub text: &'a str,
}

impl<'a> ListItem<'a> {
    /// Classify a trimmed line; ordered items take precedence.
    pub fn parse(trimmed: &'a str) -> Option<Self> {
        if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
            let number = caps.get(1).map(|m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str());
            return Some(ListItem {
                kind: ListKind::Ordered,
                number,
                text,
            });
        }
        UNORDERED_ITEM.captures(trimmed).map(|caps| ListItem {
            kind: ListKind::Unordered,
            number: None,
            text: caps.get(1).map_or("", |m| m.as_str()),
        })
    }

    fn open_tag(&self) -> String {
        match self.kind {
            ListKind::Ordered => format!(r#"<ol start="{}">"#, self.number.unwrap_or("1")),
            ListKind::Unordered => "<ul>".to_string(),
        }
    }
}

/// What the converter is inside of. Exactly one mode is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockMode {
    #[default]
    Normal,
    /// Inside a fence; holds the translated lines so far.
    FencedCode {
        code: String,
        lines: usize,
        opened_at: usize,
    },
    /// Inside a list run.
    List(ListKind),
}

/// Converter state for one document body.
#[derive(Debug, Default)]
pub struct BlockConverter {
    mode: BlockMode,
    html: String,
    diagnostics: Diagnostics,
}

impl BlockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current block mode.
    pub fn mode(&self) -> &BlockMode {
        &self.mode
    }

    /// Feed one body line.
    pub fn push_line(&mut self, line: Line<'_>) {
        let trimmed = line.trimmed();
        let fence = is_fence(trimmed);

        if matches!(self.mode, BlockMode::FencedCode { .. }) {
            if fence {
                self.close_code();
            } else {
                self.push_code_line(line.text);
            }
            return;
        }

        if fence {
            self.close_list();
            self.mode = BlockMode::FencedCode {
                code: String::new(),
                lines: 0,
                opened_at: line.number,
            };
            return;
        }

        match ListItem::parse(trimmed) {
            Some(item) => {
                if self.mode != BlockMode::List(item.kind) {
                    self.close_list();
                    self.html.push_str(&item.open_tag());
                    self.mode = BlockMode::List(item.kind);
                }
                self.html.push_str("<li>");
                self.html.push_str(&translate_line(item.text, true, false));
                self.html.push_str("</li>");
            }
            None => {
                self.close_list();
                self.html.push_str(&translate_line(line.text, false, true));
            }
        }
    }

    /// Close whatever is still open and return the HTML with any diagnostics.
    pub fn finish(mut self) -> (String, Diagnostics) {
        if let BlockMode::FencedCode { opened_at, .. } = self.mode {
            self.diagnostics
                .push(Diagnostic::unclosed_code_fence(opened_at));
            self.close_code();
        }
        self.close_list();
        (self.html, self.diagnostics)
    }

    /// Lines inside a fence are inline-translated and joined with newlines.
    fn push_code_line(&mut self, text: &str) {
        if let BlockMode::FencedCode { code, lines, .. } = &mut self.mode {
            if *lines > 0 {
                code.push('\n');
            }
            code.push_str(&translate_line(text, true, false));
            *lines += 1;
        }
    }

    fn close_code(&mut self) {
        if let BlockMode::FencedCode { code, .. } = std::mem::take(&mut self.mode) {
            self.html.push_str(CODE_OPEN);
            self.html.push_str(&code);
            self.html.push_str(CODE_CLOSE);
        }
    }

    fn close_list(&mut self) {
        if let BlockMode::List(kind) = self.mode {
            self.html.push_str(kind.close_tag());
            self.mode = BlockMode::Normal;
        }
    }
}

/// Convert a sequence of body lines to HTML.
pub fn convert_lines<'a, I>(lines: I) -> (String, Diagnostics)
where
    I: IntoIterator<Item = Line<'a>>,
{
    let mut converter = BlockConverter::new();
    for line in lines {
        converter.push_line(line);
    }
    converter.finish()
}

/// Convert body text to an HTML fragment.
pub fn convert_body(body: &str) -> String {
    convert_lines(Lexer::new(body)).0
}

/// Whether a raw line is a fence marker.
#[inline]
pub fn is_fence(line: &str) -> bool {
    trim_line(line) == FENCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_list_items() {
        let item = ListItem::parse("12. twelve").unwrap();
        assert_eq!(item.kind, ListKind::Ordered);
        assert_eq!(item.number, Some("12"));
        assert_eq!(item.text, "twelve");

        let item = ListItem::parse("- dash").unwrap();
        assert_eq!(item.kind, ListKind::Unordered);
        assert_eq!(item.text, "dash");

        assert!(ListItem::parse("---").is_none());
        assert!(ListItem::parse("-dash").is_none());
        assert!(ListItem::parse("1.5 apples").is_none());
        assert!(ListItem::parse("Version 2. is out").is_none());
        // Only ASCII numerals start an ordered item.
        assert!(ListItem::parse("\u{0661}. arabic digit").is_none());
        assert!(ListItem::parse("1.\u{00a0}nbsp").is_none());
    }

    #[test]
    fn tracks_mode_transitions() {
        let mut converter = BlockConverter::new();
        converter.push_line(Line { text: "1. a", number: 0 });
        assert_eq!(converter.mode(), &BlockMode::List(ListKind::Ordered));
        converter.push_line(Line { text: "```", number: 1 });
        assert!(matches!(converter.mode(), BlockMode::FencedCode { .. }));
        converter.push_line(Line { text: "- not an item", number: 2 });
        assert!(matches!(converter.mode(), BlockMode::FencedCode { .. }));
        converter.push_line(Line { text: "```", number: 3 });
        assert_eq!(converter.mode(), &BlockMode::Normal);

        let (html, diagnostics) = converter.finish();
        assert_eq!(
            html,
            r#"<ol start="1"><li>a</li></ol><code><pre>- not an item</pre></code>"#
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn fence_detection_ignores_surrounding_whitespace() {
        assert!(is_fence("  ```\r"));
        assert!(!is_fence("```rust"));
    }
}
