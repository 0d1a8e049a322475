//! Link resolver
//!
//! Computes the inbound and outbound link sets of a document. Outbound links
//! come from the document's own parsed markup; inbound links come from the
//! corpus-wide index, inverted once per build so each lookup is O(1).

use crate::storage::LinkIndex;
use std::collections::{BTreeSet, HashMap};

/// Inbound and outbound links of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    /// Paths of other documents that link here
    pub inlinks: Vec<String>,
    /// Link targets as written in this document
    pub outlinks: Vec<String>,
}

/// Inverted view of a [`LinkIndex`]: path -> paths that link to it
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    inbound: HashMap<String, BTreeSet<String>>,
}

impl LinkResolver {
    /// Invert the corpus link index. Self-links are not inbound links.
    pub fn new(index: &LinkIndex) -> Self {
        let mut inbound: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (source, targets) in index {
            for target in targets {
                if target != source {
                    inbound
                        .entry(target.clone())
                        .or_default()
                        .insert(source.clone());
                }
            }
        }
        Self { inbound }
    }

    /// Paths linking to `path`, sorted
    pub fn inlinks(&self, path: &str) -> Vec<String> {
        self.inbound
            .get(path)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Combine the document's parsed outlinks with its inbound links
    pub fn resolve(&self, path: &str, parsed_links: Vec<String>) -> ResolvedLinks {
        ResolvedLinks {
            inlinks: self.inlinks(path),
            outlinks: parsed_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, &[&str])]) -> LinkIndex {
        entries
            .iter()
            .map(|(from, to)| {
                (
                    from.to_string(),
                    to.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn inlinks_come_from_other_documents() {
        let idx = index(&[
            ("A.md", &["B.md", "C.md"]),
            ("B.md", &["A.md"]),
            ("Notes/x.md", &["B.md"]),
        ]);
        let resolver = LinkResolver::new(&idx);

        assert_eq!(resolver.inlinks("B.md"), vec!["A.md", "Notes/x.md"]);
        assert_eq!(resolver.inlinks("A.md"), vec!["B.md"]);
        assert!(resolver.inlinks("Unlinked.md").is_empty());
    }

    #[test]
    fn self_links_are_not_inlinks() {
        let idx = index(&[("A.md", &["A.md"])]);
        let resolver = LinkResolver::new(&idx);
        assert!(resolver.inlinks("A.md").is_empty());
    }

    #[test]
    fn resolve_keeps_outlinks_as_written() {
        let idx = index(&[("B.md", &["A.md"])]);
        let resolver = LinkResolver::new(&idx);
        let links = resolver.resolve("A.md", vec!["B".into(), "B".into(), "Missing".into()]);

        assert_eq!(links.inlinks, vec!["B.md"]);
        assert_eq!(links.outlinks, vec!["B", "B", "Missing"]);
    }

    #[test]
    fn empty_index_degrades_to_empty_inlinks() {
        let resolver = LinkResolver::new(&LinkIndex::new());
        let links = resolver.resolve("A.md", Vec::new());
        assert_eq!(links, ResolvedLinks::default());
    }
}
