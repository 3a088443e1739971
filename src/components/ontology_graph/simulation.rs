//! Force-directed layout: link springs, many-body repulsion, centering and
//! collision, stepped one tick at a time under a decaying alpha.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::info;

use crate::error::{GraphError, LinkEndpoint};
use crate::ontology::{GraphData, NodeGroup};

/// Simulation extent the ontology view lays nodes out in.
pub const SIMULATION_WIDTH: f64 = 1600.0;
/// See [`SIMULATION_WIDTH`].
pub const SIMULATION_HEIGHT: f64 = 1000.0;

const INITIAL_RADIUS: f64 = 10.0;

/// Physics tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceParams {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Distances below this are clamped in the many-body force.
	pub charge_distance_min: f64,
	/// Per-node collision radius; two nodes keep `2 * radius` apart.
	pub collision_radius: f64,
	/// Fraction of an overlap resolved per tick.
	pub collision_strength: f64,
	/// Fraction of the remaining gap to `alpha_target` closed per tick.
	pub alpha_decay: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target while a node is being dragged.
	pub reheat_target: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 150.0,
			charge_strength: -600.0,
			charge_distance_min: 1.0,
			collision_radius: 80.0,
			collision_strength: 1.0,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			alpha_min,
			velocity_decay: 0.4,
			reheat_target: 0.3,
		}
	}
}

/// How a node moves on the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
	/// Integrated from forces.
	Free { vx: f64, vy: f64 },
	/// Held at a fixed point, forces ignored.
	Pinned { x: f64, y: f64 },
}

/// Simulation-local copy of an ontology node.
#[derive(Clone, Debug)]
pub struct SimNode {
	/// Id of the ontology node this mirrors.
	pub id: String,
	/// Copied for styling and hit-testing.
	pub group: NodeGroup,
	/// Current position.
	pub x: f64,
	/// Current position.
	pub y: f64,
	/// Velocity or pin.
	pub motion: Motion,
}

impl SimNode {
	/// Whether the node is held by a drag.
	pub fn is_pinned(&self) -> bool {
		matches!(self.motion, Motion::Pinned { .. })
	}
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Endpoint coordinates of one link after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSegment {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// A running layout over one [`GraphData`] snapshot.
///
/// Owns its node copies; the snapshot it was built from is never touched.
/// After [`Simulation::dispose`] every tick is a no-op.
#[derive(Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	index: HashMap<String, usize>,
	params: ForceParams,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	ticks: u64,
	disposed: bool,
}

impl Simulation {
	/// Validates `data` and seeds positions on a phyllotaxis spiral around
	/// the extent's center.
	pub fn new(data: &GraphData, width: f64, height: f64, params: ForceParams) -> Result<Self, GraphError> {
		let (cx, cy) = (width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * golden_angle;
			nodes.push(SimNode {
				id: node.id.clone(),
				group: node.group,
				x: cx + radius * angle.cos(),
				y: cy + radius * angle.sin(),
				motion: Motion::Free { vx: 0.0, vy: 0.0 },
			});
		}

		let mut degree = vec![0usize; nodes.len()];
		let mut resolved = Vec::with_capacity(data.links.len());
		for (i, link) in data.links.iter().enumerate() {
			let lookup = |id: &str, endpoint| {
				index
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::UnknownLinkEndpoint {
						link: i,
						endpoint,
						id: id.to_string(),
					})
			};
			let source = lookup(&link.source, LinkEndpoint::Source)?;
			let target = lookup(&link.target, LinkEndpoint::Target)?;
			degree[source] += 1;
			degree[target] += 1;
			resolved.push((source, target));
		}

		let links = resolved
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				SimLink {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		info!(
			"Layout initialised: {} nodes, {} links",
			nodes.len(),
			data.links.len()
		);

		Ok(Self {
			nodes,
			links,
			index,
			params,
			center: (cx, cy),
			alpha: 1.0,
			alpha_target: 0.0,
			ticks: 0,
			disposed: false,
		})
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	/// Index of the node with the given ontology id.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// `(source, target)` index pairs in input order.
	pub fn link_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.links.iter().map(|l| (l.source, l.target))
	}

	/// Current endpoint coordinates of every link.
	pub fn link_segments(&self) -> impl Iterator<Item = LinkSegment> + '_ {
		self.links.iter().map(|l| {
			let (s, t) = (&self.nodes[l.source], &self.nodes[l.target]);
			LinkSegment {
				source: l.source,
				target: l.target,
				x1: s.x,
				y1: s.y,
				x2: t.x,
				y2: t.y,
			}
		})
	}

	pub fn params(&self) -> &ForceParams {
		&self.params
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Alpha drifts toward this value; raising it re-heats the layout.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.max(0.0);
	}

	/// Sets alpha directly.
	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.max(0.0);
	}

	/// Below `alpha_min` with nothing holding it up.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Moves a free node and zeroes its velocity. Pinned nodes are re-pinned
	/// at the new point.
	pub fn place(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.x = x;
			node.y = y;
			node.motion = match node.motion {
				Motion::Free { .. } => Motion::Free { vx: 0.0, vy: 0.0 },
				Motion::Pinned { .. } => Motion::Pinned { x, y },
			};
		}
	}

	/// Moves a node to `(x, y)` and holds it there until
	/// [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.x = x;
			node.y = y;
			node.motion = Motion::Pinned { x, y };
		}
	}

	/// Releases a pinned node to the physics with zero velocity.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			if node.is_pinned() {
				node.motion = Motion::Free { vx: 0.0, vy: 0.0 };
			}
		}
	}

	/// Stops the simulation for good.
	pub fn dispose(&mut self) {
		self.disposed = true;
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Runs one physics step. Returns `false` without touching any state
	/// once disposed.
	pub fn tick(&mut self) -> bool {
		if self.disposed {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		let mut velocity: Vec<(f64, f64)> = self
			.nodes
			.iter()
			.map(|n| match n.motion {
				Motion::Free { vx, vy } => (vx, vy),
				Motion::Pinned { .. } => (0.0, 0.0),
			})
			.collect();

		self.apply_links(&mut velocity);
		self.apply_charge(&mut velocity);
		self.apply_center();
		self.apply_collision(&mut velocity);

		let keep = 1.0 - self.params.velocity_decay;
		for (node, (vx, vy)) in self.nodes.iter_mut().zip(velocity) {
			match node.motion {
				Motion::Free { .. } => {
					let (vx, vy) = (vx * keep, vy * keep);
					node.x += vx;
					node.y += vy;
					node.motion = Motion::Free { vx, vy };
				}
				Motion::Pinned { x, y } => {
					node.x = x;
					node.y = y;
				}
			}
		}

		self.ticks += 1;
		true
	}

	fn apply_links(&self, velocity: &mut [(f64, f64)]) {
		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let (vs, vt) = (velocity[link.source], velocity[link.target]);
			let mut x = t.x + vt.0 - s.x - vs.0;
			let mut y = t.y + vt.1 - s.y - vs.1;
			if x == 0.0 {
				x = jiggle(i * 2);
			}
			if y == 0.0 {
				y = jiggle(i * 2 + 1);
			}
			let len = (x * x + y * y).sqrt();
			let l = (len - self.params.link_distance) / len * self.alpha * link.strength;
			let (x, y) = (x * l, y * l);

			let b = link.bias;
			velocity[link.target].0 -= x * b;
			velocity[link.target].1 -= y * b;
			velocity[link.source].0 += x * (1.0 - b);
			velocity[link.source].1 += y * (1.0 - b);
		}
	}

	fn apply_charge(&self, velocity: &mut [(f64, f64)]) {
		let w = self.params.charge_strength * self.alpha;
		let min2 = self.params.charge_distance_min * self.params.charge_distance_min;
		for (i, node) in self.nodes.iter().enumerate() {
			for (j, other) in self.nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let mut x = other.x - node.x;
				let mut y = other.y - node.y;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = jiggle(i * 31 + j);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(j * 31 + i);
					l += y * y;
				}
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				velocity[i].0 += x * w / l;
				velocity[i].1 += y * w / l;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.nodes.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n as f64 - self.center.0, sy / n as f64 - self.center.1);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn apply_collision(&self, velocity: &mut [(f64, f64)]) {
		let r = self.params.collision_radius;
		let reach = r + r;
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let mut x = (a.x + velocity[i].0) - (b.x + velocity[j].0);
				let mut y = (a.y + velocity[i].1) - (b.y + velocity[j].1);
				let mut l = x * x + y * y;
				if l >= reach * reach {
					continue;
				}
				if x == 0.0 {
					x = jiggle(i * 17 + j);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(j * 17 + i);
					l += y * y;
				}
				let len = l.sqrt();
				let push = (reach - len) / len * self.params.collision_strength;
				let (x, y) = (x * push, y * push);
				// Equal radii: the overlap is split evenly.
				velocity[i].0 += x * 0.5;
				velocity[i].1 += y * 0.5;
				velocity[j].0 -= x * 0.5;
				velocity[j].1 -= y * 0.5;
			}
		}
	}
}

/// Tiny deterministic offset that breaks exact coincidences.
fn jiggle(seed: usize) -> f64 {
	let v = ((seed as f64 + 1.0) * 12.9898).sin() * 43_758.545_3;
	(v.fract() - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::{OntologyLink, OntologyNode};

	fn node(id: &str, group: NodeGroup) -> OntologyNode {
		OntologyNode {
			id: id.into(),
			label: id.into(),
			group,
			definition: None,
			rationale: None,
			example: None,
		}
	}

	fn link(source: &str, target: &str) -> OntologyLink {
		OntologyLink {
			source: source.into(),
			target: target.into(),
			kind: "supports".into(),
		}
	}

	fn pair() -> GraphData {
		GraphData {
			nodes: vec![node("R1", NodeGroup::Rule), node("C3", NodeGroup::Characteristic)],
			links: vec![link("R1", "C3")],
		}
	}

	fn new_sim(data: &GraphData) -> Simulation {
		Simulation::new(data, SIMULATION_WIDTH, SIMULATION_HEIGHT, ForceParams::default()).unwrap()
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (a, b) = (&sim.nodes()[a], &sim.nodes()[b]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn test_dangling_link_rejected() {
		let mut data = pair();
		data.links.push(link("R1", "C99"));
		let err = Simulation::new(&data, 100.0, 100.0, ForceParams::default())
			.err()
			.unwrap();
		assert_eq!(
			err,
			GraphError::UnknownLinkEndpoint {
				link: 1,
				endpoint: LinkEndpoint::Target,
				id: "C99".into()
			}
		);
	}

	#[test]
	fn test_dangling_source_rejected() {
		let mut data = pair();
		data.links.insert(0, link("R404", "C3"));
		let err = Simulation::new(&data, 100.0, 100.0, ForceParams::default())
			.err()
			.unwrap();
		assert!(matches!(
			err,
			GraphError::UnknownLinkEndpoint {
				link: 0,
				endpoint: LinkEndpoint::Source,
				..
			}
		));
	}

	#[test]
	fn test_duplicate_id_rejected() {
		let mut data = pair();
		data.nodes.push(node("R1", NodeGroup::Rule));
		assert_eq!(
			Simulation::new(&data, 100.0, 100.0, ForceParams::default())
				.err()
				.unwrap(),
			GraphError::DuplicateNodeId("R1".into())
		);
	}

	#[test]
	fn test_initial_positions_distinct() {
		let data = GraphData {
			nodes: (0..20)
				.map(|i| node(&format!("R{i}"), NodeGroup::Rule))
				.collect(),
			links: vec![],
		};
		let sim = new_sim(&data);
		for i in 0..20 {
			for j in (i + 1)..20 {
				assert!(distance(&sim, i, j) > 1.0);
			}
		}
	}

	#[test]
	fn test_link_converges_to_rest_length() {
		let data = pair();
		let mut sim = new_sim(&data);
		sim.place(0, 300.0, 500.0);
		sim.place(1, 1300.0, 500.0);
		for _ in 0..300 {
			sim.tick();
		}
		let d = distance(&sim, 0, 1);
		assert!(d.is_finite());
		assert!((120.0..=180.0).contains(&d), "link length {d}");

		for _ in 0..2000 {
			sim.tick();
		}
		let d = distance(&sim, 0, 1);
		assert!((120.0..=180.0).contains(&d), "link length {d}");
	}

	#[test]
	fn test_collision_separates_unlinked_nodes() {
		let data = GraphData {
			nodes: vec![node("C1", NodeGroup::Characteristic), node("C2", NodeGroup::Characteristic)],
			links: vec![],
		};
		let params = ForceParams {
			charge_strength: 0.0,
			..ForceParams::default()
		};
		let mut sim = Simulation::new(&data, 400.0, 400.0, params).unwrap();
		sim.place(0, 195.0, 200.0);
		sim.place(1, 205.0, 200.0);
		for _ in 0..200 {
			sim.tick();
		}
		assert!(distance(&sim, 0, 1) > 150.0);
	}

	#[test]
	fn test_center_holds_mean() {
		let mut sim = new_sim(crate::ontology::incose());
		for _ in 0..50 {
			sim.tick();
		}
		let n = sim.nodes().len() as f64;
		let mx = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let my = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		// Collision runs after centering, so only approximately centred.
		assert!((mx - SIMULATION_WIDTH / 2.0).abs() < 50.0);
		assert!((my - SIMULATION_HEIGHT / 2.0).abs() < 50.0);
	}

	#[test]
	fn test_alpha_decays_toward_target() {
		let mut sim = new_sim(&pair());
		let start = sim.alpha();
		for _ in 0..300 {
			sim.tick();
		}
		assert!(sim.alpha() < start);
		assert!(sim.alpha() > 0.0);
		assert!(sim.alpha() < 0.0011);

		sim.set_alpha_target(0.3);
		for _ in 0..500 {
			sim.tick();
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
	}

	#[test]
	fn test_pinned_node_holds_position() {
		let mut sim = new_sim(&pair());
		sim.pin(0, 10.0, 20.0);
		for _ in 0..30 {
			sim.tick();
			assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (10.0, 20.0));
		}
		sim.unpin(0);
		assert!(!sim.nodes()[0].is_pinned());
		sim.tick();
		assert_ne!((sim.nodes()[0].x, sim.nodes()[0].y), (10.0, 20.0));
	}

	#[test]
	fn test_disposed_tick_is_noop() {
		let mut sim = new_sim(&pair());
		sim.tick();
		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		let alpha = sim.alpha();
		sim.dispose();
		assert!(!sim.tick());
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
		assert_eq!(sim.alpha(), alpha);
		assert_eq!(sim.ticks(), 1);
	}

	#[test]
	fn test_link_segments_follow_nodes() {
		let mut sim = new_sim(&pair());
		sim.tick();
		let seg = sim.link_segments().next().unwrap();
		assert_eq!((seg.x1, seg.y1), (sim.nodes()[0].x, sim.nodes()[0].y));
		assert_eq!((seg.x2, seg.y2), (sim.nodes()[1].x, sim.nodes()[1].y));
	}

	#[test]
	fn test_link_strength_uses_degree() {
		let data = GraphData {
			nodes: vec![
				node("R1", NodeGroup::Rule),
				node("C3", NodeGroup::Characteristic),
				node("C7", NodeGroup::Characteristic),
			],
			links: vec![link("R1", "C3"), link("R1", "C7")],
		};
		let sim = new_sim(&data);
		assert_eq!(sim.links[0].strength, 1.0);
		assert!((sim.links[0].bias - 2.0 / 3.0).abs() < 1e-12);
	}
}
