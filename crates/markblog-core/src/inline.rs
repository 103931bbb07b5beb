//! Single-line translation to HTML.
//!
//! A line is trimmed and HTML-escaped first, so every tag in the output was
//! introduced here. Top-level lines are then checked for the line-level
//! constructs (rule, header, blockquote) and finally run through a fixed
//! sequence of inline substitutions.
//!
//! Substitution order matters: bold before italic (`**` is not two `*`),
//! image before link (`![a](b)` contains `[a](b)`) and strikethrough before
//! subscript (`~~` is not two `~`).

use std::borrow::Cow;

use memchr::memchr3;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::lexer::trim_line;

/// Deepest header level.
pub const MAX_HEADER_LEVEL: usize = 6;

/// A compiled inline rule and the template that replaces its matches.
struct Substitution {
    name: &'static str,
    pattern: Regex,
    render: fn(&Captures<'_>) -> String,
}

impl Substitution {
    fn new(name: &'static str, pattern: &str, render: fn(&Captures<'_>) -> String) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {name} pattern: {e}")),
            render,
        }
    }

    #[inline]
    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, |caps: &Captures<'_>| (self.render)(caps))
    }
}

/// First participating group among `indices`, or the empty string.
#[inline]
fn group<'t>(caps: &Captures<'t>, indices: &[usize]) -> &'t str {
    indices
        .iter()
        .find_map(|&i| caps.get(i))
        .map_or("", |m| m.as_str())
}

fn wrap(tag: &str, content: &str) -> String {
    format!("<{tag}>{content}</{tag}>")
}

/// Inline rules in application order, compiled once per process.
static SUBSTITUTIONS: Lazy<[Substitution; 9]> = Lazy::new(|| {
    [
        Substitution::new("bold", r"\*\*([^*\n]*)\*\*|__([^_\n]*)__", |c| {
            wrap("strong", group(c, &[1, 2]))
        }),
        Substitution::new("italic", r"\*([^*\n]+)\*|_([^_\n]+)_", |c| {
            wrap("em", group(c, &[1, 2]))
        }),
        Substitution::new("inline code", r"`([^`]+)`", |c| {
            format!("<code><pre>{}</pre></code>", group(c, &[1]))
        }),
        Substitution::new("image", r"!\[([^\]]*)\]\(([^)]*)\)", |c| {
            format!(r#"<img src="{}" alt="{}">"#, group(c, &[2]), group(c, &[1]))
        }),
        Substitution::new("link", r"\[([^\]]*)\]\(([^)]*)\)", |c| {
            format!(r#"<a href="{}">{}</a>"#, group(c, &[2]), group(c, &[1]))
        }),
        Substitution::new("strikethrough", r"~~(.*?)~~", |c| wrap("del", group(c, &[1]))),
        Substitution::new("subscript", r"~(.*?)~", |c| wrap("sub", group(c, &[1]))),
        Substitution::new("superscript", r"\^(.*?)\^", |c| wrap("sup", group(c, &[1]))),
        Substitution::new("highlight", r"==(.*?)==", |c| wrap("mark", group(c, &[1]))),
    ]
});

/// Cheap pre-check: can any inline rule match this text at all?
#[inline(always)]
fn has_inline_markers(bytes: &[u8]) -> bool {
    memchr3(b'*', b'_', b'`', bytes).is_some()
        || memchr3(b'[', b'~', b'^', bytes).is_some()
        || memchr::memmem::find(bytes, b"==").is_some()
}

/// HTML-escape text, covering both element content and quoted attributes.
#[inline]
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Translate one line of markup into an HTML fragment.
///
/// - `is_content = false`: the line is top-level and unclassified, so the
///   rule (`---`), header (`# `) and blockquote (`>`) forms are recognized.
/// - `is_content = true`: only inline substitutions apply.
/// - `is_paragraph = true`: the inline result is wrapped in `<p>`.
///
/// Blank lines produce an empty string.
pub fn translate_line(line: &str, is_content: bool, is_paragraph: bool) -> String {
    let trimmed = trim_line(line);
    if trimmed.is_empty() {
        return String::new();
    }

    if !is_content {
        if trimmed == "---" {
            return "<hr />".to_string();
        }
        if trimmed.starts_with('#') {
            return match split_header(trimmed) {
                Some((level, text)) => {
                    wrap(&format!("h{level}"), &translate_line(text, true, false))
                }
                // Not a header: fall through to the inline path unchanged.
                None => translate_line(line, true, is_paragraph),
            };
        }
        if let Some(quoted) = strip_blockquote(trimmed) {
            return wrap("blockquote", &translate_line(quoted, true, false));
        }
    }

    let html = translate_inline(trimmed);
    if is_paragraph {
        wrap("p", &html)
    } else {
        html
    }
}

/// Escape `text` and apply every inline substitution in order.
pub fn translate_inline(text: &str) -> String {
    let escaped = escape(text);
    if !has_inline_markers(escaped.as_bytes()) {
        return escaped.into_owned();
    }

    let mut html = escaped.into_owned();
    for substitution in SUBSTITUTIONS.iter() {
        let replaced = match substitution.apply(&html) {
            Cow::Owned(replaced) => Some(replaced),
            Cow::Borrowed(_) => None,
        };
        if let Some(replaced) = replaced {
            log::trace!("applied {} substitution", substitution.name);
            html = replaced;
        }
    }
    html
}

/// Split a header line into its level and text.
///
/// The whole leading `#` run is consumed and the level capped at
/// [`MAX_HEADER_LEVEL`]. The run must be followed by a space and non-empty
/// text.
pub fn split_header(trimmed: &str) -> Option<(usize, &str)> {
    let run = trimmed.bytes().take_while(|&b| b == b'#').count();
    if run == 0 {
        return None;
    }
    let rest = trimmed[run..].strip_prefix(' ')?;
    if trim_line(rest).is_empty() {
        return None;
    }
    Some((run.min(MAX_HEADER_LEVEL), rest))
}

/// Strip a leading `>` and at most one following space.
pub fn strip_blockquote(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_split_caps_level() {
        assert_eq!(split_header("### Three"), Some((3, "Three")));
        assert_eq!(split_header("######## Eight"), Some((6, "Eight")));
        assert_eq!(split_header("#NoSpace"), None);
        assert_eq!(split_header("#   "), None);
        assert_eq!(split_header("#"), None);
    }

    #[test]
    fn blockquote_strips_one_space() {
        assert_eq!(strip_blockquote("> quoted"), Some("quoted"));
        assert_eq!(strip_blockquote(">  two"), Some(" two"));
        assert_eq!(strip_blockquote(">tight"), Some("tight"));
        assert_eq!(strip_blockquote("no"), None);
    }

    #[test]
    fn marker_scan() {
        assert!(!has_inline_markers(b"plain words only"));
        assert!(has_inline_markers(b"a ==mark== b"));
        assert!(!has_inline_markers(b"a = b"));
        assert!(has_inline_markers(b"x^2^"));
    }

    #[test]
    fn escapes_quotes_for_attributes() {
        let escaped = escape(r#"<a href="x">'c' & d</a>"#);
        assert!(escaped.starts_with("&lt;a href="));
        assert!(escaped.contains("&amp; d&lt;/a&gt;"));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));
    }
}
