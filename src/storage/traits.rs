//! Document store trait definitions
//!
//! The document store is the host collaborator the explorer reads from:
//! it lists documents, hands out their content and parsed links, exposes the
//! corpus-wide link index, opens documents, and reports changes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during document store operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for document store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A document as listed by the store: path plus display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Store-relative path, `/`-separated (e.g. `Atlas/Maps/Writing MOC.md`)
    pub path: String,
    /// File stem shown to the user (e.g. `Writing MOC`)
    pub basename: String,
}

impl DocumentRef {
    pub fn new(path: impl Into<String>, basename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            basename: basename.into(),
        }
    }

    /// Derive the basename from the path: last segment without its extension.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let basename = basename_of(&path).to_string();
        Self { path, basename }
    }
}

/// Last path segment with a trailing `.md` (or any extension) removed.
pub fn basename_of(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

/// Corpus-wide forward link index: document path -> paths it resolves links to
pub type LinkIndex = BTreeMap<String, BTreeSet<String>>;

/// What happened to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Other,
}

/// A change notification for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Modified,
        }
    }
}

/// Stream of change events from a store subscription.
///
/// Holds whatever keeps the underlying subscription alive (a filesystem
/// watcher, for instance); dropping the stream ends the subscription.
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    _guard: Option<Box<dyn Any + Send>>,
}

impl ChangeStream {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { rx, _guard: None }
    }

    /// Keep `guard` alive for as long as the stream exists
    pub fn with_guard(mut self, guard: impl Any + Send) -> Self {
        self._guard = Some(Box::new(guard));
        self
    }

    /// Next change, or `None` once the subscription is closed
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for ChangeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeStream")
            .field("guarded", &self._guard.is_some())
            .finish()
    }
}

/// Trait for host document stores
///
/// Implementations must be thread-safe (Send + Sync); the refresh
/// controller shares the store with its auto-refresh task.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List markdown documents, optionally restricted to a path prefix
    async fn list_documents(&self, prefix: Option<&str>) -> StorageResult<Vec<DocumentRef>>;

    /// Whether a folder exists at the given store-relative path
    async fn folder_exists(&self, path: &str) -> StorageResult<bool>;

    /// Raw text content of a document
    async fn read_content(&self, path: &str) -> StorageResult<String>;

    /// Outbound link targets of a document, as written in its markup
    async fn parsed_links(&self, path: &str) -> StorageResult<Vec<String>>;

    /// Resolved forward links for the whole corpus
    async fn link_index(&self) -> StorageResult<LinkIndex>;

    /// Ask the host to bring a document into view
    async fn open_document(&self, path: &str) -> StorageResult<()>;

    /// Subscribe to changes of documents under `prefix`
    fn watch(&self, prefix: &str) -> StorageResult<ChangeStream>;
}
