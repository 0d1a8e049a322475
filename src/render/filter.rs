//! Display filters
//!
//! Decide which nodes of a snapshot are drawn and which are emphasized.
//! Filters never touch the snapshot itself.

use crate::graph::{MocNode, MocType};
use std::fmt;
use std::str::FromStr;

/// Which MOC types are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MocType),
}

impl TypeFilter {
    pub fn admits(&self, moc_type: MocType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => *t == moc_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(t) => write!(f, "{t}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeFilter(pub String);

impl fmt::Display for UnknownTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown MOC type '{}' (expected all, main, sub or system)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTypeFilter {}

impl FromStr for TypeFilter {
    type Err = UnknownTypeFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        MocType::parse(s)
            .map(TypeFilter::Only)
            .ok_or_else(|| UnknownTypeFilter(s.to_string()))
    }
}

/// Current display filter of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    pub type_filter: TypeFilter,
    /// Lowercased search text; `None` when no search is active
    search: Option<String>,
    /// Nodes with fewer connections are hidden
    pub minimum_connections: usize,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            type_filter: TypeFilter::All,
            search: None,
            minimum_connections: 1,
        }
    }
}

impl ViewFilter {
    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_search(mut self, query: &str) -> Self {
        self.set_search(query);
        self
    }

    pub fn with_minimum_connections(mut self, minimum: usize) -> Self {
        self.minimum_connections = minimum;
        self
    }

    /// Blank queries clear the search
    pub fn set_search(&mut self, query: &str) {
        let query = query.trim();
        self.search = (!query.is_empty()).then(|| query.to_lowercase());
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether `node` is drawn at all
    pub fn shows(&self, node: &MocNode) -> bool {
        self.type_filter.admits(node.moc_type) && node.connections() >= self.minimum_connections
    }

    /// `None` without an active search, else whether name or path match
    pub fn matches_search(&self, node: &MocNode) -> Option<bool> {
        let query = self.search.as_deref()?;
        Some(
            node.name.to_lowercase().contains(query) || node.path.to_lowercase().contains(query),
        )
    }
}
