//! Layout engine
//!
//! Assigns 2D coordinates to the nodes of a snapshot. Positions live beside
//! the snapshot, keyed by node id, so a snapshot can be laid out again for a
//! new viewport without being rebuilt.

use crate::graph::{GraphSnapshot, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Node coordinates for one snapshot and viewport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    positions: HashMap<NodeId, Point>,
}

impl Layout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            positions: HashMap::new(),
        }
    }

    pub fn place(&mut self, id: NodeId, point: Point) {
        self.positions.insert(id, point);
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Something that can place a snapshot's nodes in a viewport.
///
/// Implementations must be deterministic for a fixed snapshot and viewport.
pub trait LayoutEngine: Send + Sync {
    fn layout(&self, snapshot: &GraphSnapshot, viewport: Viewport) -> Layout;
}

/// Nodes evenly spaced on a circle, in snapshot order; edges are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl LayoutEngine for CircularLayout {
    fn layout(&self, snapshot: &GraphSnapshot, viewport: Viewport) -> Layout {
        let mut layout = Layout::new(viewport);
        let n = snapshot.node_count();
        if n == 0 {
            return layout;
        }

        let center = viewport.center();
        let radius = viewport.width.min(viewport.height) / 3.0;
        for (i, node) in snapshot.nodes.iter().enumerate() {
            let angle = 2.0 * PI * i as f64 / n as f64;
            layout.place(
                node.id.clone(),
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                ),
            );
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Category, MocNode, MocType};

    fn snapshot(n: usize) -> GraphSnapshot {
        let nodes = (0..n)
            .map(|i| {
                MocNode::new(
                    format!("Maps/{i}.md"),
                    i.to_string(),
                    MocType::Main,
                    Category::General,
                )
            })
            .collect();
        GraphSnapshot::new(nodes, Vec::new())
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn places_nodes_on_circle() {
        let snap = snapshot(4);
        let layout = CircularLayout.layout(&snap, Viewport::default());
        assert_eq!(layout.len(), 4);

        let at = |i: usize| layout.position(&snap.nodes[i].id).unwrap();
        // radius = min(800, 600) / 3 = 200, centered at (400, 300)
        assert!(close(at(0), Point::new(600.0, 300.0)));
        assert!(close(at(1), Point::new(400.0, 500.0)));
        assert!(close(at(2), Point::new(200.0, 300.0)));
        assert!(close(at(3), Point::new(400.0, 100.0)));
    }

    #[test]
    fn every_node_is_equidistant_from_center() {
        let snap = snapshot(7);
        let viewport = Viewport::new(900.0, 300.0);
        let layout = CircularLayout.layout(&snap, viewport);
        for node in &snap.nodes {
            let d = layout.position(&node.id).unwrap().distance(viewport.center());
            assert!((d - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn deterministic_for_same_input() {
        let snap = snapshot(5);
        let a = CircularLayout.layout(&snap, Viewport::default());
        let b = CircularLayout.layout(&snap, Viewport::default());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_snapshot_has_no_positions() {
        let layout = CircularLayout.layout(&GraphSnapshot::empty(), Viewport::default());
        assert!(layout.is_empty());
    }
}
