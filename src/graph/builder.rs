//! Graph builder
//!
//! Runs the classifier and link resolver over the candidate documents, then
//! derives links by resolving every outlink against the node set.

use super::edge::{link_strength, MocLink};
use super::node::MocNode;
use super::snapshot::GraphSnapshot;
use crate::analysis::{Classifier, LinkResolver};
use crate::storage::{DocumentRef, DocumentStore, LinkIndex, PathResolver, StorageResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// What to do when several outlinks of one node resolve to the same target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParallelLinks {
    /// One link per resolved outlink; repeated links yield repeated edges
    #[default]
    Keep,
    /// One link per (source, target) pair, keeping the strongest
    Merge,
}

/// Builds [`GraphSnapshot`]s from a document store
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    classifier: Classifier,
    parallel_links: ParallelLinks,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_parallel_links(mut self, policy: ParallelLinks) -> Self {
        self.parallel_links = policy;
        self
    }

    /// Build a snapshot from `documents`.
    ///
    /// Documents that fail to read are logged and left out; the build
    /// itself never fails. A path listed twice yields one node.
    pub async fn build<S>(
        &self,
        store: &S,
        documents: &[DocumentRef],
        index: &LinkIndex,
    ) -> GraphSnapshot
    where
        S: DocumentStore + ?Sized,
    {
        let resolver = LinkResolver::new(index);
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();

        for doc in documents {
            if !seen.insert(doc.path.as_str()) {
                debug!(path = %doc.path, "duplicate document path, keeping first");
                continue;
            }
            match self.node_for(store, doc, &resolver).await {
                Ok(node) => nodes.push(node),
                Err(e) => {
                    warn!(path = %doc.path, error = %e, "skipping MOC that could not be processed");
                    skipped.push(doc.path.clone());
                }
            }
        }

        let links = self.link_nodes(&nodes);
        debug!(
            nodes = nodes.len(),
            links = links.len(),
            skipped = skipped.len(),
            "built MOC graph"
        );

        let mut snapshot = GraphSnapshot::new(nodes, links);
        snapshot.skipped = skipped;
        snapshot
    }

    /// Classify one document and resolve its links
    async fn node_for<S>(
        &self,
        store: &S,
        doc: &DocumentRef,
        resolver: &LinkResolver,
    ) -> StorageResult<MocNode>
    where
        S: DocumentStore + ?Sized,
    {
        let content = store.read_content(&doc.path).await?;
        let parsed = store.parsed_links(&doc.path).await?;
        let (moc_type, category) = self.classifier.classify(&doc.path, &doc.basename, &content);
        let links = resolver.resolve(&doc.path, parsed);

        Ok(MocNode::new(&doc.path, &doc.basename, moc_type, category)
            .with_links(links.inlinks, links.outlinks))
    }

    /// Derive links: each outlink that names another node's path (or, failing
    /// that, its name) becomes a link. Outlinks written as paths without the
    /// extension or relative to the source's folder are resolved against the
    /// node paths last. Outlinks resolving to nothing are dropped.
    pub fn link_nodes(&self, nodes: &[MocNode]) -> Vec<MocLink> {
        let mut by_path: HashMap<&str, usize> = HashMap::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            by_path.entry(node.path.as_str()).or_insert(i);
            by_name.entry(node.name.as_str()).or_insert(i);
        }

        let resolver = PathResolver::new(nodes.iter().map(|n| n.path.as_str()));

        let mut links = Vec::new();
        let mut merged: HashMap<(usize, usize), usize> = HashMap::new();

        for (si, source) in nodes.iter().enumerate() {
            for outlink in source.outlinks() {
                let Some(&ti) = by_path
                    .get(outlink.as_str())
                    .or_else(|| by_name.get(outlink.as_str()))
                    .or_else(|| {
                        resolver
                            .resolve(outlink, &source.path)
                            .and_then(|path| by_path.get(path))
                    })
                else {
                    continue;
                };
                let target = &nodes[ti];
                let strength = link_strength(source, target);

                match self.parallel_links {
                    ParallelLinks::Keep => {
                        links.push(MocLink::new(source.id.clone(), target.id.clone(), strength));
                    }
                    ParallelLinks::Merge => match merged.get(&(si, ti)) {
                        Some(&existing) => {
                            let link: &mut MocLink = &mut links[existing];
                            link.strength = link.strength.max(strength);
                        }
                        None => {
                            merged.insert((si, ti), links.len());
                            links.push(MocLink::new(
                                source.id.clone(),
                                target.id.clone(),
                                strength,
                            ));
                        }
                    },
                }
            }
        }

        links
    }
}
