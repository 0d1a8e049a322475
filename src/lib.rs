//! MOC Explorer: Map-of-Content graph explorer for markdown vaults
//!
//! Scans a note vault for "Map of Content" documents, derives the directed
//! graph of their cross-references, classifies each one by structural role
//! and topic, and lays the graph out as a circular node-link diagram with
//! live statistics.
//!
//! # Core Concepts
//!
//! - **Nodes**: one per MOC document, typed (main/sub/system) and categorized
//! - **Links**: resolved outlinks between MOCs, weighted by shared context
//! - **Snapshots**: immutable graph builds, replaced wholesale on refresh
//! - **Document stores**: the vault (or any host) the explorer reads from
//!
//! # Example
//!
//! ```
//! use moc_explorer::{classify, Category, MocType};
//!
//! let (moc_type, category) = classify("Maps/Writing MOC.md", "Writing MOC", "");
//! assert_eq!(moc_type, MocType::Main);
//! assert_eq!(category, Category::Creative);
//! ```

pub mod analysis;
pub mod config;
mod error;
mod graph;
pub mod layout;
pub mod notice;
pub mod refresh;
pub mod render;
pub mod selector;
pub mod storage;
pub mod view;

pub use analysis::{classify, Classifier, LinkResolver};
pub use config::{Settings, SettingsError, SettingsResult, SettingsStore};
pub use error::{ExplorerError, ExplorerResult};
pub use graph::{
    link_strength, Category, GraphBuilder, GraphSnapshot, MocLink, MocNode, MocType, NodeId,
    ParallelLinks, MAX_STRENGTH, MIN_STRENGTH,
};
pub use layout::{CircularLayout, Layout, LayoutEngine, Point, Viewport};
pub use notice::{LogNotifier, Notifier};
pub use refresh::{AutoRefresh, RefreshController, RefreshOutcome, ViewState};
pub use render::{GraphStats, Scene, SceneStyle, TypeFilter, ViewFilter};
pub use selector::{CorpusSelector, Selection};
pub use storage::{
    DocumentRef, DocumentStore, MemoryStore, StorageError, StorageResult, VaultStore,
};
pub use view::{ExplorerView, DISPLAY_TEXT, VIEW_TYPE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
