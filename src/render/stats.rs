//! Graph statistics

use crate::graph::GraphSnapshot;
use serde::Serialize;
use std::fmt;

/// Summary figures of one snapshot (unfiltered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_mocs: usize,
    pub total_links: usize,
    pub orphans: usize,
    pub total_connections: usize,
}

impl GraphStats {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self {
            total_mocs: snapshot.node_count(),
            total_links: snapshot.link_count(),
            orphans: snapshot.nodes.iter().filter(|n| n.is_orphan()).count(),
            total_connections: snapshot.nodes.iter().map(|n| n.connections()).sum(),
        }
    }

    /// Mean connections per node; 0 for an empty graph
    pub fn average_connections(&self) -> f64 {
        if self.total_mocs == 0 {
            0.0
        } else {
            self.total_connections as f64 / self.total_mocs as f64
        }
    }

    /// Average rounded to one decimal place, or `0` for an empty graph
    pub fn average_display(&self) -> String {
        if self.total_mocs == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.average_connections())
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total MOCs:      {}", self.total_mocs)?;
        writeln!(f, "Total links:     {}", self.total_links)?;
        writeln!(f, "Orphan MOCs:     {}", self.orphans)?;
        write!(f, "Avg connections: {}", self.average_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Category, MocLink, MocNode, MocType};

    fn node(path: &str, inlinks: usize, outlinks: usize) -> MocNode {
        MocNode::new(path, path, MocType::Main, Category::General)
            .with_links(vec!["i".to_string(); inlinks], vec!["o".to_string(); outlinks])
    }

    #[test]
    fn mutual_pair_with_orphan() {
        let snap = GraphSnapshot::new(
            vec![node("A", 1, 1), node("B", 1, 1), node("C", 0, 0)],
            vec![
                MocLink::new("A".into(), "B".into(), 1),
                MocLink::new("B".into(), "A".into(), 1),
            ],
        );
        let stats = GraphStats::from_snapshot(&snap);
        assert_eq!(stats.total_mocs, 3);
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.orphans, 1);
        assert_eq!(stats.total_connections, 4);
        assert_eq!(stats.average_display(), "1.3");
    }

    #[test]
    fn empty_graph_averages_zero() {
        let stats = GraphStats::from_snapshot(&GraphSnapshot::empty());
        assert_eq!(stats.average_connections(), 0.0);
        assert_eq!(stats.average_display(), "0");
        assert!(stats.to_string().ends_with("Avg connections: 0"));
    }

    #[test]
    fn whole_averages_keep_one_decimal() {
        let snap = GraphSnapshot::new(vec![node("A", 1, 1), node("B", 2, 0)], Vec::new());
        assert_eq!(GraphStats::from_snapshot(&snap).average_display(), "2.0");
    }
}
