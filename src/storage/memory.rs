//! In-memory document store
//!
//! A fake corpus for tests and embedders: documents carry their content and
//! parsed links explicitly, failures can be injected per document or for the
//! whole store, open requests are recorded, and change notifications are
//! pushed by hand.

use super::resolve::PathResolver;
use super::traits::{
    ChangeEvent, ChangeStream, DocumentRef, DocumentStore, LinkIndex, StorageError,
    StorageResult,
};
use crate::analysis::internal_link_targets;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
struct MemoryDocument {
    content: String,
    links: Vec<String>,
}

#[derive(Debug, Default)]
struct Corpus {
    documents: BTreeMap<String, MemoryDocument>,
    extra_folders: BTreeSet<String>,
    failing: HashSet<String>,
    unavailable: Option<String>,
}

impl Corpus {
    fn check_available(&self) -> StorageResult<()> {
        match &self.unavailable {
            Some(reason) => Err(StorageError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn document(&self, path: &str) -> StorageResult<&MemoryDocument> {
        self.check_available()?;
        if self.failing.contains(path) {
            return Err(StorageError::Read {
                path: path.to_string(),
                reason: "injected read failure".to_string(),
            });
        }
        self.documents
            .get(path)
            .ok_or_else(|| StorageError::DocumentNotFound(path.to_string()))
    }
}

/// In-memory [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    corpus: RwLock<Corpus>,
    subscribers: Mutex<Vec<(String, mpsc::UnboundedSender<ChangeEvent>)>>,
    opened: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with explicit parsed links
    pub fn with_document<I, S>(self, path: &str, content: &str, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_document(path, content, links);
        self
    }

    /// Add a document whose links are parsed from its markdown content
    pub fn with_note(self, path: &str, content: &str) -> Self {
        let links = internal_link_targets(content);
        self.with_document(path, content, links)
    }

    /// Declare an (otherwise empty) folder
    pub fn with_folder(self, path: &str) -> Self {
        self.write()
            .extra_folders
            .insert(path.trim_end_matches('/').to_string());
        self
    }

    /// Insert or replace a document. Subscribers are not notified; see
    /// [`MemoryStore::notify_changed`].
    pub fn insert_document<I, S>(&self, path: &str, content: &str, links: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let doc = MemoryDocument {
            content: content.to_string(),
            links: links.into_iter().map(Into::into).collect(),
        };
        self.write().documents.insert(path.to_string(), doc);
    }

    /// Remove a document; returns whether it existed
    pub fn remove_document(&self, path: &str) -> bool {
        self.write().documents.remove(path).is_some()
    }

    /// Make reads of `path` fail
    pub fn fail_reads(&self, path: &str) {
        self.write().failing.insert(path.to_string());
    }

    /// Make every operation fail with [`StorageError::Unavailable`]
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.write().unavailable = reason.map(str::to_string);
    }

    /// Paths passed to [`DocumentStore::open_document`], in order
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Push a change notification to every subscriber whose prefix matches
    pub fn notify_changed(&self, event: ChangeEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(prefix, tx)| {
            if !event.path.starts_with(prefix.as_str()) {
                return !tx.is_closed();
            }
            tx.send(event.clone()).is_ok()
        });
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Corpus> {
        self.corpus.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Corpus> {
        self.corpus.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, prefix: Option<&str>) -> StorageResult<Vec<DocumentRef>> {
        let corpus = self.read();
        corpus.check_available()?;
        Ok(corpus
            .documents
            .keys()
            .filter(|path| prefix.map_or(true, |p| path.starts_with(p)))
            .map(|path| DocumentRef::from_path(path.as_str()))
            .collect())
    }

    async fn folder_exists(&self, path: &str) -> StorageResult<bool> {
        let corpus = self.read();
        corpus.check_available()?;
        let folder = path.trim_end_matches('/');
        if folder.is_empty() {
            return Ok(true);
        }
        let nested = format!("{}/", folder);
        Ok(corpus.extra_folders.contains(folder)
            || corpus.documents.keys().any(|p| p.starts_with(&nested)))
    }

    async fn read_content(&self, path: &str) -> StorageResult<String> {
        Ok(self.read().document(path)?.content.clone())
    }

    async fn parsed_links(&self, path: &str) -> StorageResult<Vec<String>> {
        Ok(self.read().document(path)?.links.clone())
    }

    async fn link_index(&self) -> StorageResult<LinkIndex> {
        let corpus = self.read();
        corpus.check_available()?;
        let resolver = PathResolver::new(corpus.documents.keys());
        Ok(resolver.index(
            corpus
                .documents
                .iter()
                .map(|(path, doc)| (path.as_str(), doc.links.as_slice())),
        ))
    }

    async fn open_document(&self, path: &str) -> StorageResult<()> {
        {
            let corpus = self.read();
            corpus.check_available()?;
            if !corpus.documents.contains_key(path) {
                return Err(StorageError::DocumentNotFound(path.to_string()));
            }
        }
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
        Ok(())
    }

    fn watch(&self, prefix: &str) -> StorageResult<ChangeStream> {
        self.read().check_available()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prefix.to_string(), tx));
        Ok(ChangeStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_document("Maps/A.md", "[[B]]", ["B"])
            .with_document("Maps/B.md", "[[A]]", ["A"])
            .with_document("Notes/x.md", "", Vec::<String>::new())
    }

    #[tokio::test]
    async fn lists_with_prefix() {
        let s = store();
        let all = s.list_documents(None).await.unwrap();
        assert_eq!(all.len(), 3);
        let maps = s.list_documents(Some("Maps")).await.unwrap();
        let names: Vec<_> = maps.iter().map(|d| d.basename.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn folders_exist_when_they_hold_documents() {
        let s = store().with_folder("Empty");
        assert!(s.folder_exists("Maps").await.unwrap());
        assert!(s.folder_exists("Maps/").await.unwrap());
        assert!(s.folder_exists("Empty").await.unwrap());
        assert!(!s.folder_exists("Map").await.unwrap());
        assert!(!s.folder_exists("Atlas/Maps").await.unwrap());
    }

    #[tokio::test]
    async fn link_index_resolves_names_to_paths() {
        let s = store();
        let index = s.link_index().await.unwrap();
        assert!(index["Maps/A.md"].contains("Maps/B.md"));
        assert!(index["Maps/B.md"].contains("Maps/A.md"));
        assert!(index["Notes/x.md"].is_empty());
    }

    #[tokio::test]
    async fn with_note_parses_links() {
        let s = MemoryStore::new().with_note("Home.md", "[[Writing MOC]] and [x](https://x.y)");
        assert_eq!(s.parsed_links("Home.md").await.unwrap(), vec!["Writing MOC"]);
    }

    #[tokio::test]
    async fn injected_failures() {
        let s = store();
        s.fail_reads("Maps/A.md");
        assert!(matches!(
            s.read_content("Maps/A.md").await,
            Err(StorageError::Read { .. })
        ));
        assert!(s.read_content("Maps/B.md").await.is_ok());

        s.set_unavailable(Some("offline"));
        assert!(matches!(
            s.list_documents(None).await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn open_records_requests() {
        let s = store();
        s.open_document("Maps/A.md").await.unwrap();
        assert!(s.open_document("Nope.md").await.is_err());
        assert_eq!(s.opened(), vec!["Maps/A.md"]);
    }

    #[tokio::test]
    async fn notifications_respect_prefix() {
        let s = store();
        let mut maps = s.watch("Maps").unwrap();
        s.notify_changed(ChangeEvent::modified("Notes/x.md"));
        s.notify_changed(ChangeEvent::modified("Maps/A.md"));
        assert_eq!(maps.recv().await, Some(ChangeEvent::modified("Maps/A.md")));
    }
}
