//! Corpus selection
//!
//! Decides which documents are candidate MOCs: everything under the
//! configured folder when it exists, otherwise whatever looks like a MOC
//! by name or location anywhere in the store.

use crate::storage::{DocumentRef, DocumentStore, StorageResult};
use tracing::{debug, info};

/// How the candidates were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every document under the configured folder
    Folder,
    /// Configured folder missing; name/location heuristic over the whole store
    Heuristic,
}

/// Candidate documents plus the way they were picked
#[derive(Debug, Clone)]
pub struct Candidates {
    pub documents: Vec<DocumentRef>,
    pub selection: Selection,
}

/// Whether a document looks like a MOC outside any dedicated folder
pub fn looks_like_moc(doc: &DocumentRef) -> bool {
    let basename = doc.basename.to_lowercase();
    basename.contains("moc")
        || basename.contains("map")
        || doc.path.contains("Maps")
        || doc.path.contains("Atlas")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusSelector;

impl CorpusSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick the candidate MOCs for `folder`
    pub async fn select<S>(&self, store: &S, folder: &str) -> StorageResult<Candidates>
    where
        S: DocumentStore + ?Sized,
    {
        let folder = folder.trim_end_matches('/');
        if !folder.is_empty() && store.folder_exists(folder).await? {
            let documents = store.list_documents(Some(folder)).await?;
            debug!(folder, count = documents.len(), "selected MOCs from folder");
            return Ok(Candidates {
                documents,
                selection: Selection::Folder,
            });
        }

        info!(folder, "MOC folder not found, falling back to name heuristic");
        let documents: Vec<_> = store
            .list_documents(None)
            .await?
            .into_iter()
            .filter(looks_like_moc)
            .collect();
        debug!(count = documents.len(), "selected MOCs by heuristic");
        Ok(Candidates {
            documents,
            selection: Selection::Heuristic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn paths(candidates: &Candidates) -> Vec<&str> {
        candidates.documents.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn heuristic_matches_names_and_locations() {
        assert!(looks_like_moc(&DocumentRef::from_path("Project MOC.md")));
        assert!(looks_like_moc(&DocumentRef::from_path("notes/Mind Map.md")));
        assert!(looks_like_moc(&DocumentRef::from_path("Atlas/Home.md")));
        assert!(looks_like_moc(&DocumentRef::from_path("Maps/Reading.md")));
        assert!(!looks_like_moc(&DocumentRef::from_path("unrelated.md")));
        // Location match is case-sensitive
        assert!(!looks_like_moc(&DocumentRef::from_path("atlas/home.md")));
    }

    #[tokio::test]
    async fn existing_folder_selects_by_prefix() {
        let store = MemoryStore::new()
            .with_document("Atlas/Maps/A.md", "", Vec::<String>::new())
            .with_document("Atlas/Maps/Sub/B.md", "", Vec::<String>::new())
            .with_document("Project MOC.md", "", Vec::<String>::new());
        let selected = CorpusSelector::new()
            .select(&store, "Atlas/Maps")
            .await
            .unwrap();
        assert_eq!(selected.selection, Selection::Folder);
        assert_eq!(paths(&selected), vec!["Atlas/Maps/A.md", "Atlas/Maps/Sub/B.md"]);
    }

    #[tokio::test]
    async fn missing_folder_falls_back_to_heuristic() {
        let store = MemoryStore::new()
            .with_document("Project MOC.md", "", Vec::<String>::new())
            .with_document("unrelated.md", "", Vec::<String>::new());
        let selected = CorpusSelector::new()
            .select(&store, "Atlas/Maps")
            .await
            .unwrap();
        assert_eq!(selected.selection, Selection::Heuristic);
        assert_eq!(paths(&selected), vec!["Project MOC.md"]);
    }

    #[tokio::test]
    async fn empty_folder_is_selected_not_fallen_back() {
        let store = MemoryStore::new()
            .with_folder("Maps")
            .with_document("Project MOC.md", "", Vec::<String>::new());
        let selected = CorpusSelector::new().select(&store, "Maps").await.unwrap();
        assert_eq!(selected.selection, Selection::Folder);
        assert!(selected.documents.is_empty());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = MemoryStore::new();
        store.set_unavailable(Some("offline"));
        let result = CorpusSelector::new().select(&store, "Maps").await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }
}
