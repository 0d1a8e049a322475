//! Top-level error type

use crate::config::SettingsError;
use crate::render::UnknownTypeFilter;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by explorer operations
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Filter(#[from] UnknownTypeFilter),

    #[error("MOC not found: {0}")]
    MocNotFound(String),
}

/// Result type for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;
