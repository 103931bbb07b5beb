//! Python bindings for the markblog renderer.

use markblog_core::{
    block, inline, parse_document as core_parse_document,
    parse_document_with_diagnostics as core_parse_with_diagnostics, Diagnostic as CoreDiagnostic,
    DiagnosticKind as CoreDiagnosticKind, FsDocumentStore, RawDocument,
    RenderedDocument as CoreRenderedDocument, StoreError,
};
use pyo3::exceptions::{PyFileNotFoundError, PyOSError, PyValueError};
use pyo3::prelude::*;

// ============================================================================
// Diagnostics
// ============================================================================

/// Category of a recovered problem.
#[pyclass(frozen, eq, eq_int, name = "DiagnosticKind")]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PyDiagnosticKind {
    MalformedDate,
    UnclosedFrontMatter,
    UnclosedCodeFence,
}

impl From<CoreDiagnosticKind> for PyDiagnosticKind {
    fn from(k: CoreDiagnosticKind) -> Self {
        match k {
            CoreDiagnosticKind::MalformedDate => PyDiagnosticKind::MalformedDate,
            CoreDiagnosticKind::UnclosedFrontMatter => PyDiagnosticKind::UnclosedFrontMatter,
            CoreDiagnosticKind::UnclosedCodeFence => PyDiagnosticKind::UnclosedCodeFence,
        }
    }
}

/// A problem recovered from while rendering.
#[pyclass(frozen, get_all, name = "Diagnostic")]
#[derive(Clone)]
pub struct PyDiagnostic {
    pub message: String,
    pub kind: PyDiagnosticKind,
    /// Zero-based line index, when known.
    pub line: Option<usize>,
}

#[pymethods]
impl PyDiagnostic {
    fn __repr__(&self) -> String {
        format!("Diagnostic({:?}, {:?})", self.message, self.kind)
    }

    fn __str__(&self) -> String {
        match self.line {
            Some(line) => format!("{} at line {}", self.message, line + 1),
            None => self.message.clone(),
        }
    }
}

impl From<&CoreDiagnostic> for PyDiagnostic {
    fn from(d: &CoreDiagnostic) -> Self {
        PyDiagnostic {
            message: d.message.clone(),
            kind: d.kind.into(),
            line: d.line,
        }
    }
}

// ============================================================================
// RenderedDocument
// ============================================================================

/// A rendered blog post.
///
/// `created_at` is an ISO `YYYY-MM-DD` string, or `None` when the header
/// carried no valid date.
#[pyclass(frozen, get_all, name = "RenderedDocument")]
#[derive(Clone)]
pub struct PyRenderedDocument {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Option<String>,
    pub html: String,
}

#[pymethods]
impl PyRenderedDocument {
    fn __repr__(&self) -> String {
        format!(
            "RenderedDocument(identifier={:?}, title={:?}, created_at={:?})",
            self.identifier, self.title, self.created_at
        )
    }

    fn __str__(&self) -> String {
        self.html.clone()
    }
}

impl From<CoreRenderedDocument> for PyRenderedDocument {
    fn from(doc: CoreRenderedDocument) -> Self {
        PyRenderedDocument {
            identifier: doc.identifier,
            title: doc.title,
            description: doc.description,
            image_url: doc.image_url,
            created_at: doc.created_at.map(|date| date.to_string()),
            html: doc.html,
        }
    }
}

// ============================================================================
// ParseResult
// ============================================================================

/// A rendered document with the problems recovered from.
#[pyclass(frozen, name = "ParseResult")]
pub struct PyParseResult {
    #[pyo3(get)]
    pub document: Py<PyRenderedDocument>,
    #[pyo3(get)]
    pub diagnostics: Vec<PyDiagnostic>,
}

#[pymethods]
impl PyParseResult {
    #[getter]
    fn clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "ParseResult(identifier={:?}, diagnostics={})",
            self.document.get().identifier,
            self.diagnostics.len()
        )
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Render a document from its identifier and raw content.
///
/// Args:
///     identifier: Document identifier (usually the file name stem)
///     content: Raw text, front matter included
///
/// Returns:
///     RenderedDocument: Metadata plus HTML fragment
#[pyfunction]
#[pyo3(text_signature = "(identifier, content)")]
fn parse_document(py: Python<'_>, identifier: &str, content: &str) -> PyRenderedDocument {
    let raw = RawDocument::new(identifier, content);
    py.allow_threads(|| core_parse_document(&raw)).into()
}

/// Render a document and report recovered problems.
///
/// Returns:
///     ParseResult: Rendered document and its diagnostics
#[pyfunction]
#[pyo3(text_signature = "(identifier, content)")]
fn parse_document_with_diagnostics(
    py: Python<'_>,
    identifier: &str,
    content: &str,
) -> PyResult<PyParseResult> {
    let raw = RawDocument::new(identifier, content);
    let result = py.allow_threads(|| core_parse_with_diagnostics(&raw));
    let diagnostics = result.diagnostics.iter().map(PyDiagnostic::from).collect();
    Ok(PyParseResult {
        document: Py::new(py, PyRenderedDocument::from(result.document))?,
        diagnostics,
    })
}

/// Convert a document body (no front matter) to an HTML fragment.
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn convert_body(text: &str) -> String {
    block::convert_body(text)
}

/// Translate a single line.
///
/// Args:
///     line: Source line
///     is_content: Skip block-level recognition (headers, rules, quotes)
///     is_paragraph: Wrap plain text in `<p>`
#[pyfunction]
#[pyo3(
    signature = (line, is_content=false, is_paragraph=true),
    text_signature = "(line, is_content=False, is_paragraph=True)"
)]
fn translate_line(line: &str, is_content: bool, is_paragraph: bool) -> String {
    inline::translate_line(line, is_content, is_paragraph)
}

/// Render every `.md` document in a directory, sorted by identifier.
///
/// Raises:
///     FileNotFoundError: The directory does not exist
///     OSError: A file could not be read
#[pyfunction]
#[pyo3(text_signature = "(path)")]
fn load_directory(py: Python<'_>, path: std::path::PathBuf) -> PyResult<Vec<PyRenderedDocument>> {
    let store = FsDocumentStore::new(path);
    let rendered = py
        .allow_threads(|| {
            store
                .try_list()
                .map(|docs| docs.iter().map(core_parse_document).collect::<Vec<_>>())
        })
        .map_err(store_error)?;
    Ok(rendered.into_iter().map(PyRenderedDocument::from).collect())
}

fn store_error(err: StoreError) -> PyErr {
    match err {
        StoreError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            PyFileNotFoundError::new_err(err.to_string())
        }
        StoreError::Io { .. } => PyOSError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

// ============================================================================
// Module
// ============================================================================

/// Markblog - blog post renderer with front matter.
#[pymodule]
fn pymb(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDiagnosticKind>()?;
    m.add_class::<PyDiagnostic>()?;
    m.add_class::<PyRenderedDocument>()?;
    m.add_class::<PyParseResult>()?;
    m.add_function(wrap_pyfunction!(parse_document, m)?)?;
    m.add_function(wrap_pyfunction!(parse_document_with_diagnostics, m)?)?;
    m.add_function(wrap_pyfunction!(convert_body, m)?)?;
    m.add_function(wrap_pyfunction!(translate_line, m)?)?;
    m.add_function(wrap_pyfunction!(load_directory, m)?)?;
    Ok(())
}
