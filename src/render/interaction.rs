//! Pointer interaction: hover tooltips
//!
//! At most one tooltip exists at a time. It is anchored at the hovered
//! marker's left edge, just above its top edge.

use super::scene::NodeMarker;
use crate::graph::{Category, MocType, NodeId};
use crate::layout::Point;
use serde::Serialize;

/// Gap between a marker's top edge and the tooltip's bottom
pub const TOOLTIP_OFFSET: f64 = 10.0;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// What a tooltip shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub moc_type: MocType,
    pub category: Category,
    pub connections: usize,
    pub path: String,
}

impl TooltipContent {
    pub fn for_marker(marker: &NodeMarker) -> Self {
        Self {
            name: marker.name.clone(),
            moc_type: marker.moc_type,
            category: marker.category,
            connections: marker.connections,
            path: marker.path.clone(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("Type: {}", self.moc_type),
            format!("Category: {}", self.category),
            format!("Connections: {}", self.connections),
            format!("Path: {}", self.path),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub node: NodeId,
    pub content: TooltipContent,
    /// Left edge and bottom edge of the tooltip box
    pub anchor: Point,
}

impl Tooltip {
    pub fn for_marker(marker: &NodeMarker) -> Self {
        let bounds = marker.bounds();
        Self {
            node: marker.id.clone(),
            content: TooltipContent::for_marker(marker),
            anchor: Point::new(bounds.left, bounds.top - TOOLTIP_OFFSET),
        }
    }
}

/// Tooltip state of one view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    tooltip: Option<Tooltip>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the tooltip for `marker`, replacing any other
    pub fn hover_enter(&mut self, marker: &NodeMarker) -> &Tooltip {
        self.tooltip.insert(Tooltip::for_marker(marker))
    }

    /// Remove the current tooltip, if any
    pub fn hover_leave(&mut self) -> Option<Tooltip> {
        self.tooltip.take()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Emphasis;

    fn marker(path: &str, x: f64, y: f64) -> NodeMarker {
        NodeMarker {
            id: path.into(),
            name: "Writing MOC".to_string(),
            label: "Writing MOC".to_string(),
            path: path.to_string(),
            moc_type: MocType::Main,
            category: Category::Creative,
            connections: 3,
            center: Point::new(x, y),
            radius: 16.0,
            color: "#7c3aed",
            emphasis: Emphasis::Normal,
        }
    }

    #[test]
    fn tooltip_anchors_above_marker() {
        let mut interaction = Interaction::new();
        let tooltip = interaction.hover_enter(&marker("Maps/W.md", 100.0, 200.0));
        assert_eq!(tooltip.anchor, Point::new(84.0, 174.0));
        assert_eq!(
            tooltip.content.lines(),
            vec![
                "Writing MOC",
                "Type: main",
                "Category: creative",
                "Connections: 3",
                "Path: Maps/W.md",
            ]
        );
    }

    #[test]
    fn at_most_one_tooltip() {
        let mut interaction = Interaction::new();
        interaction.hover_enter(&marker("a.md", 0.0, 0.0));
        interaction.hover_enter(&marker("b.md", 50.0, 50.0));
        assert_eq!(interaction.tooltip().unwrap().node.as_str(), "b.md");

        assert!(interaction.hover_leave().is_some());
        assert!(interaction.tooltip().is_none());
        assert!(interaction.hover_leave().is_none());
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }
}
