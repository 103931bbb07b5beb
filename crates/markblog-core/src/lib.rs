//! # Markblog Core
//!
//! Renders blog posts written in a small, line-oriented Markdown dialect
//! with a metadata header into HTML fragments.
//!
//! Output is always well-formed with respect to the code and list wrappers
//! it opens, and every piece of source text is HTML-escaped before any tag
//! is introduced.
//!
//! ## Quick Start
//!
//! ```rust
//! use markblog_core::{parse_document, RawDocument};
//!
//! let raw = RawDocument::new(
//!     "hello",
//!     "---\ntitle: Hello\ncreated_at: 2023/4/1\n---\n# Hi\n**bold** text",
//! );
//! let doc = parse_document(&raw);
//!
//! assert_eq!(doc.title, "Hello");
//! assert_eq!(doc.html, "<h1>Hi</h1><p><strong>bold</strong> text</p>");
//! ```
//!
//! ## Recovery
//!
//! Parsing never fails. Problems are recovered from and can be inspected:
//!
//! ```rust
//! use markblog_core::{parse_document_with_diagnostics, RawDocument};
//!
//! let raw = RawDocument::new("draft", "---\ncreated_at: 2023/x/1\n---\n```\nlet x = 1;");
//! let result = parse_document_with_diagnostics(&raw);
//!
//! assert!(result.document.created_at.is_none());
//! assert_eq!(result.document.html, "<code><pre>let x = 1;</pre></code>");
//! assert_eq!(result.diagnostics.len(), 2);
//! ```
//!
//! ## Grammar
//!
//! - Block: `# `..`###### ` headers, `>` blockquotes, `---` rules,
//!   fenced code, `1. ` ordered and `- ` unordered list runs
//! - Inline: `**bold**`, `*italic*`, `` `code` ``, `![alt](src)`,
//!   `[text](href)`, `~~del~~`, `~sub~`, `^sup^`, `==mark==`

pub mod block;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod store;

pub use block::convert_body;
pub use document::{FrontMatter, ParseResult, RawDocument, RenderedDocument};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics, StoreError};
pub use frontmatter::extract_front_matter;
pub use inline::translate_line;
pub use parser::{parse_document, parse_document_with_diagnostics, parse_str};
pub use store::{DocumentStore, FsDocumentStore, Library, MemoryDocumentStore};
