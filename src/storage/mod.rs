//! Document stores for the MOC explorer
//!
//! The explorer reads its corpus through the `DocumentStore` trait. The
//! primary implementation is `VaultStore`, a directory of markdown notes;
//! `MemoryStore` holds a corpus in memory for tests and embedders.

mod memory;
mod resolve;
mod traits;
mod vault;

pub use memory::MemoryStore;
pub use resolve::{normalize_target, PathResolver};
pub use traits::{
    basename_of, ChangeEvent, ChangeKind, ChangeStream, DocumentRef, DocumentStore, LinkIndex,
    StorageError, StorageResult,
};
pub use vault::VaultStore;
