//! Robustness checks: arbitrary and mutated documents always render to
//! balanced, escaped HTML, and rendering is deterministic.

use markblog_core::{convert_body, parse_document, parse_document_with_diagnostics, RawDocument};
use proptest::prelude::*;

const SAMPLE_POST: &str = r#"---
title: Robust
description: Survives mutation
created_at: 2022/2/2
image: /img.png
---
# Heading

Paragraph with **bold**, *em*, `code`, [link](/l) and ![img](/i.png).

1. first
2. second

- a
- b

> quote

```
fn main() {}
```

---

~~old~~ H~2~O x^2^ ==mark==
"#;

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Wrappers the block converter opens must always be closed.
fn assert_balanced(html: &str) {
    assert_eq!(count(html, "<ol "), count(html, "</ol>"), "ol in {html}");
    assert_eq!(count(html, "<ul>"), count(html, "</ul>"), "ul in {html}");
    assert_eq!(count(html, "<li>"), count(html, "</li>"), "li in {html}");
    assert_eq!(
        count(html, "<code><pre>"),
        count(html, "</pre></code>"),
        "code in {html}"
    );
}

// ============================================================================
// Mutations
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Truncate,
    DropClosingFence,
    DropHeaderDelimiter,
    DuplicateLines,
    CrLf,
}

fn mutate(input: &str, mutation: Mutation) -> String {
    match mutation {
        Mutation::Truncate => {
            let cut = input
                .char_indices()
                .map(|(i, _)| i)
                .nth(input.chars().count() * 2 / 3)
                .unwrap_or(input.len());
            input[..cut].to_string()
        }
        Mutation::DropClosingFence => match input.rfind("```") {
            Some(pos) => format!("{}{}", &input[..pos], &input[pos + 3..]),
            None => input.to_string(),
        },
        Mutation::DropHeaderDelimiter => input.replacen("---\n# Heading", "# Heading", 1),
        Mutation::DuplicateLines => input
            .lines()
            .flat_map(|line| [line, line])
            .collect::<Vec<_>>()
            .join("\n"),
        Mutation::CrLf => input.replace('\n', "\r\n"),
    }
}

#[test]
fn test_mutated_documents_stay_balanced() {
    for mutation in [
        Mutation::Truncate,
        Mutation::DropClosingFence,
        Mutation::DropHeaderDelimiter,
        Mutation::DuplicateLines,
        Mutation::CrLf,
    ] {
        let input = mutate(SAMPLE_POST, mutation);
        let result = parse_document_with_diagnostics(&RawDocument::new("m", input));
        assert_balanced(&result.document.html);
    }
}

#[test]
fn test_crlf_matches_lf() {
    let lf = parse_document(&RawDocument::new("p", SAMPLE_POST));
    let crlf = parse_document(&RawDocument::new("p", mutate(SAMPLE_POST, Mutation::CrLf)));
    assert_eq!(lf, crlf);
}

#[test]
fn test_dropped_fence_is_reported() {
    let input = mutate(SAMPLE_POST, Mutation::DropClosingFence);
    let result = parse_document_with_diagnostics(&RawDocument::new("m", input));
    assert!(!result.is_clean());
    assert!(result.document.html.ends_with("</pre></code>"));
}

#[test]
fn test_sample_is_clean() {
    let result = parse_document_with_diagnostics(&RawDocument::new("s", SAMPLE_POST));
    assert!(result.is_clean(), "{:?}", result.diagnostics);
    assert_eq!(result.document.title, "Robust");
}

// ============================================================================
// Properties
// ============================================================================

fn markup_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("```".to_string()),
        Just("---".to_string()),
        Just(String::new()),
        "[0-9]{1,3}\\. [a-z*_<>&\"]{0,12}",
        "- [a-z*_~^=`<>]{0,12}",
        "#{1,8} [a-z<>]{0,10}",
        "> [a-z\\[\\]()!]{0,12}",
        "[ -~]{0,30}",
    ]
}

fn markup_document() -> impl Strategy<Value = String> {
    prop::collection::vec(markup_line(), 0..40).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn prop_output_balanced(body in markup_document()) {
        assert_balanced(&convert_body(&body));
    }

    #[test]
    fn prop_rendering_deterministic(content in markup_document()) {
        let raw = RawDocument::new("p", content);
        prop_assert_eq!(parse_document(&raw), parse_document(&raw));
    }

    #[test]
    fn prop_source_angle_brackets_escaped(
        before in "[a-z ]{0,10}",
        name in "[a-z]{1,8}",
        after in "[a-z ]{0,10}",
    ) {
        let html = convert_body(&format!("{before}<{name}>{after}"));
        let escaped = format!("&lt;{name}&gt;");
        prop_assert!(html.contains(&escaped), "tag not escaped in {}", html);
        prop_assert_eq!(html.matches('<').count(), 2);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(content in "\\PC{0,200}") {
        let _ = parse_document_with_diagnostics(&RawDocument::new("any", content));
    }
}
