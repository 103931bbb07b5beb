//! Document assembly: front matter, then body, then the rendered record.
//!
//! Parsing is pure. Nothing is cached between calls, so rendering the same
//! content twice yields identical output and documents can be rendered on
//! any number of threads at once.

use crate::block::convert_lines;
use crate::document::{ParseResult, RawDocument, RenderedDocument};
use crate::error::Diagnostics;
use crate::frontmatter;
use crate::lexer::Lexer;

/// Render a raw document.
///
/// Never fails: malformed input degrades to default fields and
/// automatically closed blocks.
#[inline]
pub fn parse_document(raw: &RawDocument) -> RenderedDocument {
    parse_document_with_diagnostics(raw).document
}

/// Render a raw document, also returning the problems recovered from.
pub fn parse_document_with_diagnostics(raw: &RawDocument) -> ParseResult {
    let mut diagnostics = Diagnostics::new();
    let extracted = frontmatter::extract(&raw.content, &mut diagnostics);

    let (html, body_diagnostics) =
        convert_lines(Lexer::starting_at(extracted.body, extracted.body_start));
    diagnostics.extend(body_diagnostics);

    log::debug!(
        "rendered {:?}: {} bytes of html, {} diagnostics",
        raw.identifier,
        html.len(),
        diagnostics.len()
    );

    ParseResult {
        document: RenderedDocument::from_parts(raw.identifier.clone(), extracted.front_matter, html),
        diagnostics,
    }
}

/// Render markup text directly, identifier and all.
pub fn parse_str(identifier: &str, content: &str) -> RenderedDocument {
    parse_document(&RawDocument::new(identifier, content))
}
