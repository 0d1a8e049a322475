//! Immutable graph snapshots

use super::edge::MocLink;
use super::node::{MocNode, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete build of the MOC graph.
///
/// Produced atomically by [`GraphBuilder`](super::GraphBuilder) and replaced
/// wholesale on every refresh; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in document-scan order
    pub nodes: Vec<MocNode>,
    pub links: Vec<MocLink>,
    pub built_at: DateTime<Utc>,
    /// Candidate documents left out because they could not be read
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<MocNode>, links: Vec<MocLink>) -> Self {
        Self {
            nodes,
            links,
            built_at: Utc::now(),
            skipped: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&MocNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Look a node up the way a user would name it: by path, else by name
    pub fn find(&self, path_or_name: &str) -> Option<&MocNode> {
        self.nodes
            .iter()
            .find(|n| n.path == path_or_name)
            .or_else(|| self.nodes.iter().find(|n| n.name == path_or_name))
    }

    /// Links leaving `id`
    pub fn links_from<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a MocLink> + 'a {
        self.links.iter().filter(move |l| &l.source == id)
    }

    /// Links arriving at `id`
    pub fn links_to<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a MocLink> + 'a {
        self.links.iter().filter(move |l| &l.target == id)
    }
}
