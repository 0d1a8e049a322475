//! Core graph data structures

mod builder;
mod edge;
mod node;
mod snapshot;


pub use builder::{GraphBuilder, ParallelLinks};
pub use edge::{link_strength, MocLink, MAX_STRENGTH, MIN_STRENGTH};
pub use node::{Category, MocNode, MocType, NodeId};
pub use snapshot::GraphSnapshot;
