//! Filesystem vault store
//!
//! A directory of markdown notes. Paths handed out are vault-relative and
//! `/`-separated; dot-directories (`.obsidian`, `.git`, `.trash`) are not
//! part of the vault. Links are parsed from note content on demand.

use super::resolve::{normalize_target, PathResolver};
use super::traits::{
    ChangeEvent, ChangeKind, ChangeStream, DocumentRef, DocumentStore, LinkIndex, StorageError,
    StorageResult,
};
use crate::analysis::internal_link_targets;
use async_trait::async_trait;
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Markdown vault rooted at a directory
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    opener: Option<String>,
}

impl VaultStore {
    /// Open a vault; `root` must be an existing directory
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )));
        }
        Ok(Self { root, opener: None })
    }

    /// Program used to open documents instead of the platform default
    pub fn with_opener(mut self, program: impl Into<String>) -> Self {
        self.opener = Some(program.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem path of a vault-relative path
    pub fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// All markdown documents in the vault, sorted by path
    async fn scan(&self) -> StorageResult<Vec<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_markdown(&root))
            .await
            .map_err(|e| StorageError::Io(io::Error::other(e)))
    }

    fn opener_command(&self, path: &Path) -> tokio::process::Command {
        if let Some(program) = &self.opener {
            let mut cmd = tokio::process::Command::new(program);
            cmd.arg(path);
            return cmd;
        }
        platform_opener(path)
    }
}

#[cfg(target_os = "macos")]
fn platform_opener(path: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn platform_opener(path: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener(path: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Vault-relative `/`-separated path of a markdown file under `root`
fn relative_markdown_path(root: &Path, path: &Path) -> Option<String> {
    if !is_markdown(path) {
        return None;
    }
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str()?;
                if is_hidden(part) {
                    return None;
                }
                segments.push(part);
            }
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

fn scan_markdown(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_str().map(is_hidden).unwrap_or(false)
        })
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable vault entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| relative_markdown_path(root, e.path()))
        .collect();
    paths.sort();
    paths
}

fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => ChangeKind::Other,
    }
}

#[async_trait]
impl DocumentStore for VaultStore {
    async fn list_documents(&self, prefix: Option<&str>) -> StorageResult<Vec<DocumentRef>> {
        Ok(self
            .scan()
            .await?
            .into_iter()
            .filter(|path| prefix.map_or(true, |p| path.starts_with(p)))
            .map(DocumentRef::from_path)
            .collect())
    }

    async fn folder_exists(&self, path: &str) -> StorageResult<bool> {
        match tokio::fs::metadata(self.absolute(path)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_content(&self, path: &str) -> StorageResult<String> {
        match tokio::fs::read_to_string(self.absolute(path)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::DocumentNotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Read {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn parsed_links(&self, path: &str) -> StorageResult<Vec<String>> {
        let content = self.read_content(path).await?;
        Ok(internal_link_targets(&content)
            .iter()
            .filter_map(|target| normalize_target(target))
            .collect())
    }

    async fn link_index(&self) -> StorageResult<LinkIndex> {
        let paths = self.scan().await?;
        let mut links = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.parsed_links(path).await {
                Ok(targets) => links.push((path.as_str(), targets)),
                Err(e) => warn!(path = %path, error = %e, "leaving note out of link index"),
            }
        }

        let resolver = PathResolver::new(&paths);
        let index = resolver.index(
            links
                .iter()
                .map(|(path, targets)| (*path, targets.as_slice())),
        );
        debug!(documents = index.len(), "built vault link index");
        Ok(index)
    }

    async fn open_document(&self, path: &str) -> StorageResult<()> {
        let absolute = self.absolute(path);
        if !absolute.is_file() {
            return Err(StorageError::DocumentNotFound(path.to_string()));
        }
        let mut cmd = self.opener_command(&absolute);
        cmd.spawn()?;
        debug!(path = %path, "requested document open");
        Ok(())
    }

    fn watch(&self, prefix: &str) -> StorageResult<ChangeStream> {
        let (tx, rx) = mpsc::unbounded_channel();
        let root = self.root.clone();
        let prefix = prefix.to_string();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let kind = change_kind(&event.kind);
                    for path in &event.paths {
                        let Some(relative) = relative_markdown_path(&root, path) else {
                            continue;
                        };
                        if relative.starts_with(&prefix) {
                            let _ = tx.send(ChangeEvent {
                                path: relative,
                                kind,
                            });
                        }
                    }
                }
                Err(e) => warn!(error = %e, "vault watcher error"),
            },
            NotifyConfig::default(),
        )
        .map_err(|e| StorageError::Watch(format!("watcher init failed: {e}")))?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| {
                StorageError::Watch(format!("failed to watch {}: {e}", self.root.display()))
            })?;

        Ok(ChangeStream::new(rx).with_guard(watcher))
    }
}
