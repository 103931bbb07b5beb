//! Document records flowing through the renderer.
//!
//! A [`RawDocument`] comes from a store, is split into [`FrontMatter`] and
//! body, and leaves as a [`RenderedDocument`]. None of these types hold state
//! between renders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Diagnostics;

/// A document as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Identifier derived from the file name stem (e.g. `hello-world`).
    pub identifier: String,
    /// Full file text, front matter included.
    pub content: String,
}

impl RawDocument {
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
        }
    }
}

/// Metadata from the delimited header at the top of a document.
///
/// Every field defaults independently: a malformed `created_at` leaves the
/// date absent without touching the title, description or image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Option<NaiveDate>,
}

impl FrontMatter {
    /// The creation date as `YYYY-MM-DD`, or an empty string when absent.
    pub fn created_at_display(&self) -> String {
        self.created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// A fully rendered document, ready for a page template.
///
/// `html` is a fragment in which every piece of source text has been
/// HTML-escaped; it can be embedded without further escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Option<NaiveDate>,
    pub html: String,
}

impl RenderedDocument {
    /// Stitch a document together from its parts.
    pub fn from_parts(identifier: impl Into<String>, front_matter: FrontMatter, html: String) -> Self {
        let FrontMatter {
            title,
            description,
            image_url,
            created_at,
        } = front_matter;
        Self {
            identifier: identifier.into(),
            title,
            description,
            image_url,
            created_at,
            html,
        }
    }

    /// The metadata part of this document.
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// A rendered document together with the problems recovered from on the way.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The rendered document (always produced, possibly with defaults).
    pub document: RenderedDocument,
    /// Recoverable problems encountered while rendering.
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    /// Check if rendering completed without diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
