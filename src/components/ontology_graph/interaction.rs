//! Pointer gestures: press/move/release on nodes (drag, click) and on empty
//! canvas (pan, click).

use super::simulation::Simulation;
use super::types::{Cursor, node_radius};
use super::viewport::ViewportController;

/// Movement (canvas pixels) below which a press/release counts as a click.
pub const CLICK_TOLERANCE_PX: f64 = 3.0;

#[derive(Clone, Copy, Debug, Default)]
enum Gesture {
	#[default]
	Idle,
	Node {
		idx: usize,
		start_px: f64,
		start_py: f64,
		node_x: f64,
		node_y: f64,
		moved: bool,
	},
	Canvas {
		start_px: f64,
		start_py: f64,
		moved: bool,
	},
}

/// Result of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
	/// A drag or pan ended, or nothing was pressed.
	None,
	NodeClicked(usize),
	CanvasClicked,
}

/// Gesture state for one graph scene.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	gesture: Gesture,
	cursor: Cursor,
}

/// Topmost node under a canvas pixel.
pub fn node_at(sim: &Simulation, viewport: &ViewportController, px: f64, py: f64) -> Option<usize> {
	let (wx, wy) = viewport.screen_to_world(px, py);
	sim.nodes()
		.iter()
		.enumerate()
		.rev()
		.find(|(_, node)| {
			let r = node_radius(node.group);
			let (dx, dy) = (node.x - wx, node.y - wy);
			dx * dx + dy * dy <= r * r
		})
		.map(|(idx, _)| idx)
}

fn beyond_tolerance(x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
	(x1 - x0).hypot(y1 - y0) > CLICK_TOLERANCE_PX
}

impl Interaction {
	pub fn cursor(&self) -> Cursor {
		self.cursor
	}

	/// Node currently held by a drag.
	pub fn dragged_node(&self) -> Option<usize> {
		match self.gesture {
			Gesture::Node { idx, .. } => Some(idx),
			_ => None,
		}
	}

	pub fn is_idle(&self) -> bool {
		matches!(self.gesture, Gesture::Idle)
	}

	/// Press: starts a node drag (pin + reheat) or a canvas pan.
	pub fn pointer_down(
		&mut self,
		sim: &mut Simulation,
		viewport: &mut ViewportController,
		px: f64,
		py: f64,
	) {
		self.release(sim, viewport);
		match node_at(sim, viewport, px, py) {
			Some(idx) => {
				let Some(node) = sim.node(idx) else {
					return;
				};
				let (node_x, node_y) = (node.x, node.y);
				sim.pin(idx, node_x, node_y);
				sim.set_alpha_target(sim.params().reheat_target);
				self.gesture = Gesture::Node {
					idx,
					start_px: px,
					start_py: py,
					node_x,
					node_y,
					moved: false,
				};
				self.cursor = Cursor::Grabbing;
			}
			None => {
				viewport.pan_start(px, py);
				self.gesture = Gesture::Canvas {
					start_px: px,
					start_py: py,
					moved: false,
				};
			}
		}
	}

	/// Move: tracks a drag or pan; otherwise updates the hover cursor.
	pub fn pointer_move(
		&mut self,
		sim: &mut Simulation,
		viewport: &mut ViewportController,
		px: f64,
		py: f64,
	) {
		match &mut self.gesture {
			Gesture::Node {
				idx,
				start_px,
				start_py,
				node_x,
				node_y,
				moved,
			} => {
				*moved |= beyond_tolerance(*start_px, *start_py, px, py);
				let (x0, y0) = viewport.screen_to_world(*start_px, *start_py);
				let (x1, y1) = viewport.screen_to_world(px, py);
				sim.pin(*idx, *node_x + (x1 - x0), *node_y + (y1 - y0));
			}
			Gesture::Canvas {
				start_px,
				start_py,
				moved,
			} => {
				*moved |= beyond_tolerance(*start_px, *start_py, px, py);
				viewport.pan_move(px, py);
			}
			Gesture::Idle => {
				self.cursor = if node_at(sim, viewport, px, py).is_some() {
					Cursor::Pointer
				} else {
					Cursor::Grab
				};
			}
		}
	}

	/// Release: ends the gesture and reports a click when the pointer stayed
	/// within [`CLICK_TOLERANCE_PX`].
	pub fn pointer_up(&mut self, sim: &mut Simulation, viewport: &mut ViewportController) -> PointerOutcome {
		let outcome = match self.gesture {
			Gesture::Node {
				idx, moved: false, ..
			} => PointerOutcome::NodeClicked(idx),
			Gesture::Canvas { moved: false, .. } => PointerOutcome::CanvasClicked,
			_ => PointerOutcome::None,
		};
		self.release(sim, viewport);
		outcome
	}

	/// Pointer left the canvas: end any gesture, no click.
	pub fn pointer_leave(&mut self, sim: &mut Simulation, viewport: &mut ViewportController) {
		self.release(sim, viewport);
	}

	fn release(&mut self, sim: &mut Simulation, viewport: &mut ViewportController) {
		match std::mem::take(&mut self.gesture) {
			Gesture::Node { idx, .. } => {
				sim.unpin(idx);
				sim.set_alpha_target(0.0);
			}
			Gesture::Canvas { .. } => viewport.pan_end(),
			Gesture::Idle => {}
		}
		self.cursor = Cursor::Grab;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ontology_graph::simulation::{
		ForceParams, SIMULATION_HEIGHT, SIMULATION_WIDTH,
	};
	use crate::components::ontology_graph::viewport::ViewportConfig;
	use crate::ontology::incose;

	fn setup() -> (Simulation, ViewportController) {
		let sim = Simulation::new(incose(), SIMULATION_WIDTH, SIMULATION_HEIGHT, ForceParams::default()).unwrap();
		let vp = ViewportController::new(ViewportConfig::default(), SIMULATION_WIDTH, SIMULATION_HEIGHT);
		(sim, vp)
	}

	fn screen_of(sim: &Simulation, vp: &ViewportController, idx: usize) -> (f64, f64) {
		let n = &sim.nodes()[idx];
		vp.world_to_screen(n.x, n.y)
	}

	fn empty_spot(sim: &Simulation, vp: &ViewportController) -> (f64, f64) {
		let spot = (5.0, 5.0);
		assert!(node_at(sim, vp, spot.0, spot.1).is_none());
		spot
	}

	#[test]
	fn test_hit_test_finds_node() {
		let (mut sim, vp) = setup();
		sim.place(3, 900.0, 400.0);
		let (px, py) = vp.world_to_screen(900.0, 400.0);
		assert_eq!(node_at(&sim, &vp, px, py), Some(3));
	}

	#[test]
	fn test_click_without_move_selects() {
		let (mut sim, mut vp) = setup();
		let mut ix = Interaction::default();
		sim.place(0, 100.0, 100.0);
		let (px, py) = screen_of(&sim, &vp, 0);
		ix.pointer_down(&mut sim, &mut vp, px, py);
		assert_eq!(ix.cursor(), Cursor::Grabbing);
		ix.pointer_move(&mut sim, &mut vp, px + 1.0, py);
		assert_eq!(ix.pointer_up(&mut sim, &mut vp), PointerOutcome::NodeClicked(0));
		assert_eq!(ix.cursor(), Cursor::Grab);
	}

	#[test]
	fn test_drag_pins_and_releases() {
		let (mut sim, mut vp) = setup();
		let mut ix = Interaction::default();
		sim.place(0, 100.0, 100.0);
		let (px, py) = screen_of(&sim, &vp, 0);

		ix.pointer_down(&mut sim, &mut vp, px, py);
		assert!(sim.nodes()[0].is_pinned());
		assert_eq!(sim.alpha_target(), 0.3);

		ix.pointer_move(&mut sim, &mut vp, px + 75.0, py - 30.0);
		let dx = vp.screen_to_world_distance(75.0);
		let dy = vp.screen_to_world_distance(30.0);
		for _ in 0..5 {
			sim.tick();
			let n = &sim.nodes()[0];
			assert!((n.x - (100.0 + dx)).abs() < 1e-9);
			assert!((n.y - (100.0 - dy)).abs() < 1e-9);
		}

		assert_eq!(ix.pointer_up(&mut sim, &mut vp), PointerOutcome::None);
		assert!(!sim.nodes()[0].is_pinned());
		assert_eq!(sim.alpha_target(), 0.0);
		assert_eq!(ix.dragged_node(), None);
	}

	#[test]
	fn test_canvas_click_and_pan() {
		let (mut sim, mut vp) = setup();
		let mut ix = Interaction::default();
		let (px, py) = empty_spot(&sim, &vp);

		ix.pointer_down(&mut sim, &mut vp, px, py);
		assert_eq!(ix.pointer_up(&mut sim, &mut vp), PointerOutcome::CanvasClicked);

		let before = vp.transform();
		ix.pointer_down(&mut sim, &mut vp, px, py);
		ix.pointer_move(&mut sim, &mut vp, px + 40.0, py + 10.0);
		assert_eq!(ix.pointer_up(&mut sim, &mut vp), PointerOutcome::None);
		assert_eq!(vp.transform().x, before.x + 40.0);
		assert!(!vp.is_panning());
	}

	#[test]
	fn test_leave_cancels_without_click() {
		let (mut sim, mut vp) = setup();
		let mut ix = Interaction::default();
		sim.place(0, 100.0, 100.0);
		let (px, py) = screen_of(&sim, &vp, 0);
		ix.pointer_down(&mut sim, &mut vp, px, py);
		ix.pointer_leave(&mut sim, &mut vp);
		assert!(!sim.nodes()[0].is_pinned());
		assert!(ix.is_idle());
		assert_eq!(ix.pointer_up(&mut sim, &mut vp), PointerOutcome::None);
	}

	#[test]
	fn test_hover_cursor() {
		let (mut sim, mut vp) = setup();
		let mut ix = Interaction::default();
		sim.place(0, 100.0, 100.0);
		let (px, py) = screen_of(&sim, &vp, 0);
		ix.pointer_move(&mut sim, &mut vp, px, py);
		assert_eq!(ix.cursor(), Cursor::Pointer);
		let (ex, ey) = empty_spot(&sim, &vp);
		ix.pointer_move(&mut sim, &mut vp, ex, ey);
		assert_eq!(ix.cursor(), Cursor::Grab);
	}
}
