//! Document storage and collection rendering.
//!
//! A [`DocumentStore`] answers two questions: which documents exist, and
//! what a given document contains. Failures degrade to empty or absent
//! results; the cause is logged. [`Library`] pairs a store with the parser.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::document::{RawDocument, RenderedDocument};
use crate::error::{StoreError, StoreResult};
use crate::parser::parse_document;

/// File extension of documents in a directory store.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Source of raw documents.
///
/// Implementations must allow concurrent reads.
pub trait DocumentStore: Send + Sync {
    /// Every available document. Any storage failure yields an empty list,
    /// never a partial one.
    fn list_documents(&self) -> Vec<RawDocument>;

    /// One document by identifier; absent if missing or unreadable.
    fn load_document(&self, identifier: &str) -> Option<RawDocument>;
}

/// Identifier of a file: its name up to the first `.`.
pub fn identifier_from_file_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Reject identifiers that could escape the store root.
pub fn validate_identifier(identifier: &str) -> StoreResult<()> {
    if identifier.is_empty()
        || identifier.starts_with('.')
        || identifier.contains(['/', '\\'])
    {
        return Err(StoreError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// Documents stored as `<identifier>.md` files in one directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a document with `identifier` is read from.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.root
            .join(format!("{identifier}.{DOCUMENT_EXTENSION}"))
    }

    /// Fallible listing, sorted by identifier.
    ///
    /// Only regular `.md` files whose identifier [`load`](Self::try_load)
    /// would accept are read; the first unreadable one fails the whole
    /// listing.
    pub fn try_list(&self) -> StoreResult<Vec<RawDocument>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| StoreError::io(&path, e))?;
            if !file_type.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let identifier = identifier_from_file_name(&name);
            if validate_identifier(identifier).is_err() {
                log::debug!("skipping {}: not a loadable identifier", path.display());
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
            documents.push(RawDocument::new(identifier, content));
        }

        documents.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(documents)
    }

    /// Fallible load.
    pub fn try_load(&self, identifier: &str) -> StoreResult<RawDocument> {
        validate_identifier(identifier)?;
        let path = self.path_for(identifier);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(RawDocument::new(identifier, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(identifier.to_string()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_documents(&self) -> Vec<RawDocument> {
        self.try_list().unwrap_or_else(|e| {
            log::warn!("listing documents failed: {e}");
            Vec::new()
        })
    }

    fn load_document(&self, identifier: &str) -> Option<RawDocument> {
        match self.try_load(identifier) {
            Ok(document) => Some(document),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => {
                log::warn!("loading document failed: {e}");
                None
            }
        }
    }
}

/// Documents held in memory, ordered by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: BTreeMap<String, String>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(&mut self, identifier: impl Into<String>, content: impl Into<String>) {
        self.documents.insert(identifier.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<I, C> FromIterator<(I, C)> for MemoryDocumentStore
where
    I: Into<String>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, C)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (identifier, content) in iter {
            store.insert(identifier, content);
        }
        store
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn list_documents(&self) -> Vec<RawDocument> {
        self.documents
            .iter()
            .map(|(id, content)| RawDocument::new(id.as_str(), content.as_str()))
            .collect()
    }

    fn load_document(&self, identifier: &str) -> Option<RawDocument> {
        self.documents
            .get(identifier)
            .map(|content| RawDocument::new(identifier, content.as_str()))
    }
}

/// A store plus rendering.
#[derive(Debug, Clone)]
pub struct Library<S> {
    store: S,
}

impl<S: DocumentStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Render one document; `None` means no document matched.
    pub fn render(&self, identifier: &str) -> Option<RenderedDocument> {
        self.store
            .load_document(identifier)
            .map(|raw| parse_document(&raw))
    }

    /// Render every document, in store order.
    ///
    /// Documents are independent, so they are parsed on scoped worker
    /// threads, one chunk per available core.
    pub fn render_all(&self) -> Vec<RenderedDocument> {
        let documents = self.store.list_documents();
        if documents.len() < 2 {
            return documents.iter().map(parse_document).collect();
        }

        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let chunk_size = documents.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = documents
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || chunk.iter().map(parse_document).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(rendered) => rendered,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_come_from_file_stems() {
        assert_eq!(identifier_from_file_name("hello.md"), "hello");
        assert_eq!(identifier_from_file_name("post.draft.md"), "post");
        assert_eq!(identifier_from_file_name("README"), "README");
    }

    #[test]
    fn rejects_escaping_identifiers() {
        assert!(validate_identifier("hello-world").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("../secret").is_err());
        assert!(validate_identifier("a/b").is_err());
        assert!(validate_identifier("a\\b").is_err());
        assert!(validate_identifier(".hidden").is_err());
    }

    #[test]
    fn memory_store_round_trip() {
        let store: MemoryDocumentStore = [("b", "second"), ("a", "first")].into_iter().collect();
        let ids: Vec<_> = store
            .list_documents()
            .into_iter()
            .map(|d| d.identifier)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            store.load_document("a").map(|d| d.content),
            Some("first".to_string())
        );
        assert!(store.load_document("c").is_none());
    }
}
