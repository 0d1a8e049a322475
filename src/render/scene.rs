//! Scene model
//!
//! A scene is what gets drawn for one (snapshot, layout, filter) triple:
//! one line per visible link and one marker per visible node, with colors,
//! sizes and labels already decided. Backends such as [`super::svg`] only
//! serialize it.

use super::filter::ViewFilter;
use super::interaction::Rect;
use crate::config::Settings;
use crate::graph::{Category, GraphSnapshot, MocType, NodeId};
use crate::layout::{Layout, Point, Viewport};
use serde::Serialize;

/// Labels longer than this are cut and suffixed with `...`
pub const LABEL_LIMIT: usize = 15;
/// Radius of a node without connections
pub const BASE_RADIUS: u32 = 10;
pub const LINK_COLOR: &str = "#7c3aed";
pub const LINK_OPACITY: f64 = 0.6;
pub const NODE_STROKE: &str = "#fff";
pub const NODE_STROKE_WIDTH: f64 = 2.0;
pub const HIGHLIGHT_STROKE: &str = "#f59e0b";
pub const DIMMED_OPACITY: f64 = 0.25;

/// Node colors per MOC type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub main: &'static str,
    pub sub: &'static str,
    pub system: &'static str,
}

impl Palette {
    pub fn color(&self, moc_type: MocType) -> &'static str {
        match moc_type {
            MocType::Main => self.main,
            MocType::Sub => self.sub,
            MocType::System => self.system,
        }
    }
}

pub const PURPLE: Palette = Palette {
    name: "purple",
    main: "#7c3aed",
    sub: "#a78bfa",
    system: "#60a5fa",
};

pub const BLUE: Palette = Palette {
    name: "blue",
    main: "#2563eb",
    sub: "#60a5fa",
    system: "#34d399",
};

pub const PALETTES: [Palette; 2] = [PURPLE, BLUE];

/// Palette for a color scheme name; unknown names get purple
pub fn palette(scheme: &str) -> &'static Palette {
    PALETTES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(scheme))
        .unwrap_or(&PALETTES[0])
}

/// `min(10 + 2 * connections, max_node_size)`
pub fn node_radius(connections: usize, max_node_size: u32) -> f64 {
    let grown = (BASE_RADIUS as usize).saturating_add(connections.saturating_mul(2));
    grown.min(max_node_size as usize) as f64
}

pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_LIMIT {
        let head: String = name.chars().take(LABEL_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Presentation settings that shape a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub palette: &'static Palette,
    pub max_node_size: u32,
    pub show_connection_strength: bool,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SceneStyle {
    fn from(settings: &Settings) -> Self {
        Self {
            palette: palette(&settings.color_scheme),
            max_node_size: settings.max_node_size,
            show_connection_strength: settings.show_connection_strength,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Normal,
    /// Matches the active search
    Highlighted,
    /// A search is active and this node does not match
    Dimmed,
}

/// One drawn link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLine {
    pub source: NodeId,
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
    pub strength: u8,
    /// Stroke width
    pub width: f64,
}

/// One drawn node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMarker {
    pub id: NodeId,
    pub name: String,
    pub label: String,
    pub path: String,
    pub moc_type: MocType,
    pub category: Category,
    pub connections: usize,
    pub center: Point,
    pub radius: f64,
    pub color: &'static str,
    pub emphasis: Emphasis,
}

impl NodeMarker {
    /// Screen bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub links: Vec<LinkLine>,
    /// In draw order; later markers sit on top
    pub markers: Vec<NodeMarker>,
}

impl Scene {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            links: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Lay out the visible part of `snapshot`. The snapshot is only read.
    pub fn build(
        snapshot: &GraphSnapshot,
        layout: &Layout,
        filter: &ViewFilter,
        style: &SceneStyle,
    ) -> Self {
        let mut scene = Self::empty(layout.viewport);

        for node in &snapshot.nodes {
            if !filter.shows(node) {
                continue;
            }
            let Some(center) = layout.position(&node.id) else {
                continue;
            };
            let emphasis = match filter.matches_search(node) {
                None => Emphasis::Normal,
                Some(true) => Emphasis::Highlighted,
                Some(false) => Emphasis::Dimmed,
            };
            scene.markers.push(NodeMarker {
                id: node.id.clone(),
                name: node.name.clone(),
                label: truncate_label(&node.name),
                path: node.path.clone(),
                moc_type: node.moc_type,
                category: node.category,
                connections: node.connections(),
                center,
                radius: node_radius(node.connections(), style.max_node_size),
                color: style.palette.color(node.moc_type),
                emphasis,
            });
        }

        for link in &snapshot.links {
            let (Some(from), Some(to)) = (
                scene.marker(&link.source).map(|m| m.center),
                scene.marker(&link.target).map(|m| m.center),
            ) else {
                continue;
            };
            let width = if style.show_connection_strength {
                f64::from(link.strength)
            } else {
                1.0
            };
            scene.links.push(LinkLine {
                source: link.source.clone(),
                target: link.target.clone(),
                from,
                to,
                strength: link.strength,
                width,
            });
        }

        scene
    }

    pub fn marker(&self, id: &NodeId) -> Option<&NodeMarker> {
        self.markers.iter().find(|m| &m.id == id)
    }

    /// Top-most marker under `point`
    pub fn node_at(&self, point: Point) -> Option<&NodeMarker> {
        self.markers.iter().rev().find(|m| m.contains(point))
    }

    pub fn node_bounds(&self, id: &NodeId) -> Option<Rect> {
        self.marker(id).map(NodeMarker::bounds)
    }
}
