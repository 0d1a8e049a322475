//! Rendering and interaction
//!
//! Turns a snapshot plus its layout into a [`Scene`], tracks hover state,
//! and derives the statistics summary shown beside the diagram.

mod filter;
mod interaction;
mod scene;
mod stats;
pub mod svg;

pub use filter::{TypeFilter, UnknownTypeFilter, ViewFilter};
pub use interaction::{Interaction, Rect, Tooltip, TooltipContent, TOOLTIP_OFFSET};
pub use scene::{
    node_radius, palette, truncate_label, Emphasis, LinkLine, NodeMarker, Palette, Scene,
    SceneStyle, BLUE, LABEL_LIMIT, PURPLE,
};
pub use stats::GraphStats;
