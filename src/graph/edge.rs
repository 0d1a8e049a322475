//! Links between MOC nodes

use super::node::{MocNode, NodeId};
use serde::{Deserialize, Serialize};

/// Weakest possible link: the link itself, no shared context
pub const MIN_STRENGTH: u8 = 1;
/// Strength cap
pub const MAX_STRENGTH: u8 = 5;

/// A directed link from one MOC to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MocLink {
    pub source: NodeId,
    pub target: NodeId,
    /// 1..=5
    pub strength: u8,
}

impl MocLink {
    pub fn new(source: NodeId, target: NodeId, strength: u8) -> Self {
        Self {
            source,
            target,
            strength: strength.clamp(MIN_STRENGTH, MAX_STRENGTH),
        }
    }
}

/// Strength of a link from `source` to `target`.
///
/// Counts the source's outlinks that also appear among the target's
/// outlinks or inlinks, plus one, capped at [`MAX_STRENGTH`]. Note the
/// overlap compares link *targets as written* on the source side with
/// both raw targets and resolved inbound paths on the target side, so it
/// is not symmetric in `source`/`target`.
pub fn link_strength(source: &MocNode, target: &MocNode) -> u8 {
    let common = source
        .outlinks()
        .iter()
        .filter(|&link| target.outlinks().contains(link) || target.inlinks().contains(link))
        .count();
    let capped = (common + 1).min(MAX_STRENGTH as usize);
    capped as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Category, MocType};

    fn node(path: &str, inlinks: &[&str], outlinks: &[&str]) -> MocNode {
        MocNode::new(path, path.trim_end_matches(".md"), MocType::Main, Category::General)
            .with_links(
                inlinks.iter().map(|s| s.to_string()).collect(),
                outlinks.iter().map(|s| s.to_string()).collect(),
            )
    }

    #[test]
    fn mutual_link_alone_is_baseline() {
        let a = node("A.md", &["B.md"], &["B"]);
        let b = node("B.md", &["A.md"], &["A"]);
        assert_eq!(link_strength(&a, &b), 1);
        assert_eq!(link_strength(&b, &a), 1);
    }

    #[test]
    fn shared_outlinks_add_strength() {
        let a = node("A.md", &[], &["B", "X", "Y"]);
        let b = node("B.md", &[], &["X", "Y"]);
        assert_eq!(link_strength(&a, &b), 3);
    }

    #[test]
    fn target_inlinks_count_as_shared_context() {
        let a = node("A.md", &[], &["B", "Hub.md"]);
        let b = node("B.md", &["Hub.md"], &[]);
        assert_eq!(link_strength(&a, &b), 2);
    }

    #[test]
    fn strength_is_capped() {
        let shared = ["a", "b", "c", "d", "e", "f", "g"];
        let a = node("A.md", &[], &shared);
        let b = node("B.md", &[], &shared);
        assert_eq!(link_strength(&a, &b), MAX_STRENGTH);
    }

    #[test]
    fn new_link_clamps_strength() {
        let link = MocLink::new("A.md".into(), "B.md".into(), 0);
        assert_eq!(link.strength, MIN_STRENGTH);
        let link = MocLink::new("A.md".into(), "B.md".into(), 9);
        assert_eq!(link.strength, MAX_STRENGTH);
    }
}
