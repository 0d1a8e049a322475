//! Link target resolution
//!
//! Turns the target text of a link (`Writing MOC`, `Maps/PKM MOC.md`,
//! `../Home#Start`) into the path of a document in the corpus, the way a
//! note-taking host resolves links for its backlink index.

use super::traits::{basename_of, LinkIndex};
use std::collections::HashMap;

/// Clean a raw link target: drop the `#heading` / `#^block` subpath, decode
/// `%20`, trim whitespace and a leading `./`. Returns `None` when nothing
/// addressable is left (pure anchors, empty links).
pub fn normalize_target(raw: &str) -> Option<String> {
    let without_subpath = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let decoded = without_subpath.replace("%20", " ");
    let trimmed = decoded.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Join `target` onto the folder of `from`, collapsing `.` and `..` segments.
fn join_relative(from: &str, target: &str) -> String {
    let mut segments: Vec<&str> = from.split('/').collect();
    segments.pop();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn with_md(path: &str) -> String {
    if path.to_lowercase().ends_with(".md") {
        path.to_string()
    } else {
        format!("{}.md", path)
    }
}

/// Resolves link targets against a fixed set of document paths
#[derive(Debug, Default)]
pub struct PathResolver {
    /// lowercased path -> path
    by_path: HashMap<String, String>,
    /// lowercased basename -> paths, shortest first
    by_basename: HashMap<String, Vec<String>>,
}

impl PathResolver {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolver = Self::default();
        for path in paths {
            let path = path.as_ref();
            resolver
                .by_path
                .insert(path.to_lowercase(), path.to_string());
            resolver
                .by_basename
                .entry(basename_of(path).to_lowercase())
                .or_default()
                .push(path.to_string());
        }
        for candidates in resolver.by_basename.values_mut() {
            candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        }
        resolver
    }

    /// Resolve `target` as written in the document at `from`.
    pub fn resolve(&self, target: &str, from: &str) -> Option<&str> {
        let target = normalize_target(target)?;
        let exact = with_md(&target).to_lowercase();
        if let Some(path) = self.by_path.get(&exact) {
            return Some(path);
        }

        let relative = with_md(&join_relative(from, &target)).to_lowercase();
        if let Some(path) = self.by_path.get(&relative) {
            return Some(path);
        }

        let candidates = self.by_basename.get(&basename_of(&exact).to_lowercase())?;
        if target.contains('/') {
            let suffix = format!("/{}", exact);
            if let Some(path) = candidates
                .iter()
                .find(|p| p.to_lowercase().ends_with(&suffix))
            {
                return Some(path);
            }
        }
        candidates.first().map(String::as_str)
    }

    /// Build the corpus link index from each document's raw link targets.
    /// Unresolvable targets are left out.
    pub fn index<'a, I>(&self, links: I) -> LinkIndex
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut index = LinkIndex::new();
        for (from, targets) in links {
            let resolved = index.entry(from.to_string()).or_default();
            for target in targets {
                if let Some(path) = self.resolve(target, from) {
                    resolved.insert(path.to_string());
                }
            }
        }
        index
    }
}
