//! Document analysis for the MOC graph
//!
//! - **Classifier**: structural type and topical category from name/path
//! - **LinkResolver**: inbound and outbound links per document
//! - **markdown**: link extraction from note markup (used by the filesystem store)

pub mod classifier;
mod links;
pub mod markdown;

pub use classifier::{classify, Classifier, ClassifyInput, Rule};
pub use links::{LinkResolver, ResolvedLinks};
pub use markdown::{internal_link_targets, LinkKind, ParsedLink};
