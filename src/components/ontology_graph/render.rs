use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::simulation::LinkSegment;
use super::state::GraphScene;
use super::types::{node_color, node_radius};
use super::viewport::CanvasTransform;

const BACKGROUND: &str = "#020617";
const LINK_STROKE: &str = "rgba(71, 85, 105, 0.3)";
const LABEL_FILL: &str = "#f8fafc";
const LABEL_HALO: &str = "#020617";

/// A node as drawn this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: &'static str,
	pub label: String,
	pub selected: bool,
	pub pinned: bool,
}

/// Everything one canvas frame needs, projected from a [`GraphScene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneFrame {
	pub width: f64,
	pub height: f64,
	pub transform: CanvasTransform,
	pub links: Vec<LinkSegment>,
	pub nodes: Vec<NodeSprite>,
}

impl SceneFrame {
	pub fn project(scene: &GraphScene) -> Self {
		let data = scene.data();
		let nodes = scene
			.simulation
			.nodes()
			.iter()
			.zip(&data.nodes)
			.map(|(sim, node)| NodeSprite {
				x: sim.x,
				y: sim.y,
				radius: node_radius(sim.group),
				color: node_color(sim.group),
				label: node.label.clone(),
				selected: scene.selection().is_selected(&sim.id),
				pinned: sim.is_pinned(),
			})
			.collect();

		Self {
			width: scene.width,
			height: scene.height,
			transform: scene.viewport.canvas_transform(),
			links: scene.simulation.link_segments().collect(),
			nodes,
		}
	}
}

pub fn render(scene: &GraphScene, ctx: &CanvasRenderingContext2d) {
	draw(&SceneFrame::project(scene), ctx);
}

pub fn draw(frame: &SceneFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	ctx.save();
	let t = frame.transform;
	let _ = ctx.translate(t.translate_x, t.translate_y);
	let _ = ctx.scale(t.scale, t.scale);
	draw_links(frame, ctx);
	draw_nodes(frame, ctx);
	ctx.restore();
}

fn draw_links(frame: &SceneFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK_STROKE);
	ctx.set_line_width(2.0);
	ctx.begin_path();
	for seg in &frame.links {
		ctx.move_to(seg.x1, seg.y1);
		ctx.line_to(seg.x2, seg.y2);
	}
	ctx.stroke();
}

fn draw_nodes(frame: &SceneFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("700 14px Inter, sans-serif");
	ctx.set_text_baseline("middle");

	for node in &frame.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();
		ctx.set_stroke_style_str(if node.selected { "#facc15" } else { "#ffffff" });
		ctx.set_line_width(if node.selected { 4.0 } else { 2.5 });
		ctx.stroke();

		let (lx, ly) = (node.x + node.radius + 4.0, node.y);
		ctx.set_stroke_style_str(LABEL_HALO);
		ctx.set_line_width(1.2);
		let _ = ctx.stroke_text(&node.label, lx, ly);
		ctx.set_fill_style_str(LABEL_FILL);
		let _ = ctx.fill_text(&node.label, lx, ly);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ontology_graph::simulation::{SIMULATION_HEIGHT, SIMULATION_WIDTH};
	use crate::ontology::{NodeGroup, incose};

	#[test]
	fn test_projection_matches_scene() {
		let mut scene = GraphScene::with_defaults(incose(), SIMULATION_WIDTH, SIMULATION_HEIGHT).unwrap();
		scene.frame(0.0);
		let frame = SceneFrame::project(&scene);
		assert_eq!(frame.nodes.len(), incose().nodes.len());
		assert_eq!(frame.links.len(), incose().links.len());

		let c1 = &frame.nodes[0];
		assert_eq!(c1.label, "C1 - Необходимость");
		assert_eq!(c1.radius, node_radius(NodeGroup::Characteristic));
		assert_eq!((c1.x, c1.y), (scene.simulation.nodes()[0].x, scene.simulation.nodes()[0].y));
		assert!(frame.nodes.iter().all(|n| !n.selected));
		assert_eq!(frame.transform, scene.viewport.canvas_transform());
	}
}
