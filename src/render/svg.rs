//! SVG output for scenes

use super::scene::{
    Emphasis, Scene, DIMMED_OPACITY, HIGHLIGHT_STROKE, LINK_COLOR, LINK_OPACITY, NODE_STROKE,
    NODE_STROKE_WIDTH,
};
use super::interaction::TooltipContent;
use std::fmt::Write;

const BACKGROUND: &str = "#ffffff";
const LABEL_COLOR: &str = "#374151";
const LABEL_SIZE: f64 = 11.0;

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `scene` as a standalone SVG document
pub fn render(scene: &Scene) -> String {
    let w = scene.viewport.width;
    let h = scene.viewport.height;
    let mut svg = String::with_capacity(1024 + scene.markers.len() * 320);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>text {{ font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; }}</style>
<rect width="{w}" height="{h}" fill="{BACKGROUND}"/>
"#
    );

    svg.push_str("<g class=\"links\">\n");
    for link in &scene.links {
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{LINK_COLOR}" stroke-opacity="{LINK_OPACITY}" stroke-width="{}" data-source="{}" data-target="{}"/>"#,
            link.from.x,
            link.from.y,
            link.to.x,
            link.to.y,
            link.width,
            escape_xml(link.source.as_str()),
            escape_xml(link.target.as_str()),
        );
    }
    svg.push_str("</g>\n");

    svg.push_str("<g class=\"nodes\">\n");
    for marker in &scene.markers {
        let (stroke, stroke_width, opacity) = match marker.emphasis {
            Emphasis::Normal => (NODE_STROKE, NODE_STROKE_WIDTH, 1.0),
            Emphasis::Highlighted => (HIGHLIGHT_STROKE, NODE_STROKE_WIDTH + 1.0, 1.0),
            Emphasis::Dimmed => (NODE_STROKE, NODE_STROKE_WIDTH, DIMMED_OPACITY),
        };
        let _ = write!(
            svg,
            r#"<g class="node {}" data-path="{}" opacity="{opacity}">
<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{stroke}" stroke-width="{stroke_width}"/>
<title>{}</title>
<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{LABEL_SIZE}" fill="{LABEL_COLOR}">{}</text>
</g>
"#,
            marker.moc_type,
            escape_xml(&marker.path),
            marker.center.x,
            marker.center.y,
            marker.radius,
            marker.color,
            escape_xml(&TooltipContent::for_marker(marker).text()),
            marker.center.x,
            marker.center.y + marker.radius + LABEL_SIZE + 2.0,
            escape_xml(&marker.label),
        );
    }
    svg.push_str("</g>\n");

    svg.push_str("</svg>\n");
    svg
}
