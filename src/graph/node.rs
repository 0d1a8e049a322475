//! MOC node representation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node: the source document's path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Structural role of a MOC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MocType {
    /// Top-level map near the root of the MOC folder
    Main,
    /// Nested or explicitly subordinate map
    Sub,
    /// Vault entry points: home, atlas, index pages
    System,
}

impl MocType {
    pub const ALL: [MocType; 3] = [MocType::Main, MocType::Sub, MocType::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            MocType::Main => "main",
            MocType::Sub => "sub",
            MocType::System => "system",
        }
    }

    /// Parse a type name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for MocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topical category of a MOC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Creative,
    Knowledge,
    Personal,
    System,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Creative => "creative",
            Category::Knowledge => "knowledge",
            Category::Personal => "personal",
            Category::System => "system",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A MOC document in the graph
///
/// `moc_type` and `category` are fixed at construction. `connections` is
/// derived from the link sets and is only ever recomputed together with
/// them, through [`MocNode::set_links`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MocNode {
    pub id: NodeId,
    /// Display name (document basename)
    pub name: String,
    /// Source document path
    pub path: String,
    #[serde(rename = "type")]
    pub moc_type: MocType,
    pub category: Category,
    inlinks: Vec<String>,
    outlinks: Vec<String>,
    connections: usize,
}

impl MocNode {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        moc_type: MocType,
        category: Category,
    ) -> Self {
        let path = path.into();
        Self {
            id: NodeId::new(path.clone()),
            name: name.into(),
            path,
            moc_type,
            category,
            inlinks: Vec::new(),
            outlinks: Vec::new(),
            connections: 0,
        }
    }

    /// Replace both link sets and recompute `connections`
    pub fn set_links(&mut self, inlinks: Vec<String>, outlinks: Vec<String>) {
        self.connections = inlinks.len() + outlinks.len();
        self.inlinks = inlinks;
        self.outlinks = outlinks;
    }

    pub fn with_links(mut self, inlinks: Vec<String>, outlinks: Vec<String>) -> Self {
        self.set_links(inlinks, outlinks);
        self
    }

    /// Documents referencing this node
    pub fn inlinks(&self) -> &[String] {
        &self.inlinks
    }

    /// Targets this node's content references
    pub fn outlinks(&self) -> &[String] {
        &self.outlinks
    }

    /// `|inlinks| + |outlinks|`
    pub fn connections(&self) -> usize {
        self.connections
    }

    /// No inbound and no outbound links
    pub fn is_orphan(&self) -> bool {
        self.connections == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_track_link_sets() {
        let mut node = MocNode::new("Maps/A.md", "A", MocType::Main, Category::General);
        assert!(node.is_orphan());

        node.set_links(vec!["Maps/B.md".into()], vec!["B".into(), "C".into()]);
        assert_eq!(node.connections(), 3);

        node.set_links(Vec::new(), vec!["B".into()]);
        assert_eq!(node.connections(), 1);
    }

    #[test]
    fn id_is_path() {
        let node = MocNode::new("Maps/A.md", "A", MocType::Main, Category::General);
        assert_eq!(node.id.as_str(), node.path);
    }

    #[test]
    fn moc_type_parse_is_case_insensitive() {
        assert_eq!(MocType::parse("Main"), Some(MocType::Main));
        assert_eq!(MocType::parse(" system "), Some(MocType::System));
        assert_eq!(MocType::parse("all"), None);
    }

    #[test]
    fn node_serializes_type_field() {
        let node = MocNode::new("A.md", "A", MocType::Sub, Category::Creative)
            .with_links(vec![], vec!["B".into()]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "sub");
        assert_eq!(json["category"], "creative");
        assert_eq!(json["connections"], 1);
        assert_eq!(json["id"], "A.md");
    }
}
