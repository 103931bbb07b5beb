use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Categories of recoverable problems found while rendering a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `created_at` value that is not a valid `year/month/day` triple
    MalformedDate,
    /// A front-matter opening delimiter with no closing delimiter
    UnclosedFrontMatter,
    /// A code fence still open at end of input
    UnclosedCodeFence,
}

/// A recoverable problem with the line it was found on.
///
/// Diagnostics never stop rendering; the offending construct degrades to a
/// default value or is closed automatically.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Error categorization
    pub kind: DiagnosticKind,
    /// Zero-based line index in the raw document, when known
    pub line: Option<usize>,
}

impl Diagnostic {
    /// A `created_at` field that failed its sub-parse.
    pub fn malformed_date(value: &str, line: usize) -> Self {
        Self {
            message: format!("malformed created_at value {value:?}"),
            kind: DiagnosticKind::MalformedDate,
            line: Some(line),
        }
    }

    /// Front matter opened at `line` but never closed.
    pub fn unclosed_front_matter(line: usize) -> Self {
        Self {
            message: "front matter has no closing delimiter".to_string(),
            kind: DiagnosticKind::UnclosedFrontMatter,
            line: Some(line),
        }
    }

    /// Code fence opened at `line` but never closed.
    pub fn unclosed_code_fence(line: usize) -> Self {
        Self {
            message: "unclosed code fence".to_string(),
            kind: DiagnosticKind::UnclosedCodeFence,
            line: Some(line),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {}", line + 1)?;
        }
        Ok(())
    }
}

/// Diagnostics collected while rendering one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Check whether a diagnostic of the given kind was recorded.
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }

    /// Append already-logged diagnostics.
    pub(crate) fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Failures of the document store.
///
/// The [`DocumentStore`](crate::store::DocumentStore) trait degrades these to
/// empty or absent results; the fallible methods on concrete stores expose
/// them for callers that want the cause.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
