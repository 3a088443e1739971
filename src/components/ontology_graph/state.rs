use log::{debug, error};

use super::interaction::{Interaction, PointerOutcome};
use super::selection::{NodeDetail, SelectionState};
use super::simulation::{ForceParams, SIMULATION_HEIGHT, SIMULATION_WIDTH, Simulation};
use super::types::Cursor;
use super::viewport::{ViewportConfig, ViewportController};
use crate::error::GraphError;
use crate::ontology::GraphData;

/// Height of the graph area in CSS pixels, adjusted in fixed steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphHeight {
	pub px: f64,
	pub step: f64,
	pub min: f64,
	pub max: f64,
}

impl Default for GraphHeight {
	fn default() -> Self {
		Self {
			px: 700.0,
			step: 200.0,
			min: 500.0,
			max: 1500.0,
		}
	}
}

impl GraphHeight {
	#[must_use]
	pub fn grow(self) -> Self {
		Self {
			px: (self.px + self.step).min(self.max),
			..self
		}
	}

	#[must_use]
	pub fn shrink(self) -> Self {
		Self {
			px: (self.px - self.step).max(self.min),
			..self
		}
	}
}

/// Everything one rendered ontology graph owns. Replaced wholesale when a new
/// [`GraphData`] snapshot arrives.
pub struct GraphScene {
	data: GraphData,
	pub simulation: Simulation,
	pub viewport: ViewportController,
	interaction: Interaction,
	selection: SelectionState,
	pub width: f64,
	pub height: f64,
}

impl GraphScene {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		params: ForceParams,
		view: ViewportConfig,
	) -> Result<Self, GraphError> {
		let simulation = Simulation::new(data, SIMULATION_WIDTH, SIMULATION_HEIGHT, params)
			.inspect_err(|e| error!("Ontology graph setup failed: {e}"))?;
		Ok(Self {
			data: data.clone(),
			simulation,
			viewport: ViewportController::new(view, width, height),
			interaction: Interaction::default(),
			selection: SelectionState::default(),
			width,
			height,
		})
	}

	/// Scene with default physics and viewport settings.
	pub fn with_defaults(data: &GraphData, width: f64, height: f64) -> Result<Self, GraphError> {
		Self::new(
			data,
			width,
			height,
			ForceParams::default(),
			ViewportConfig::default(),
		)
	}

	pub fn data(&self) -> &GraphData {
		&self.data
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn cursor(&self) -> Cursor {
		self.interaction.cursor()
	}

	/// Overlay contents for the selected node.
	pub fn selected_detail(&self) -> Option<NodeDetail> {
		self.selection
			.selected()
			.and_then(|id| self.data.node(id))
			.map(NodeDetail::from_node)
	}

	/// Clears the selection, as the overlay close button does.
	pub fn close_detail(&mut self) {
		self.selection = std::mem::take(&mut self.selection).clear();
	}

	/// One animation frame: advances the viewport animation and runs a
	/// physics step. Returns `false` once the simulation is disposed.
	pub fn frame(&mut self, now_ms: f64) -> bool {
		self.viewport.advance(now_ms);
		self.simulation.tick()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.viewport.resize(width, height);
	}

	pub fn dispose(&mut self) {
		self.simulation.dispose();
	}

	pub fn pointer_down(&mut self, px: f64, py: f64) {
		self.interaction
			.pointer_down(&mut self.simulation, &mut self.viewport, px, py);
	}

	pub fn pointer_move(&mut self, px: f64, py: f64) {
		self.interaction
			.pointer_move(&mut self.simulation, &mut self.viewport, px, py);
	}

	/// Applies click outcomes to the selection. Returns the outcome.
	pub fn pointer_up(&mut self) -> PointerOutcome {
		let outcome = self
			.interaction
			.pointer_up(&mut self.simulation, &mut self.viewport);
		let selection = std::mem::take(&mut self.selection);
		self.selection = match outcome {
			PointerOutcome::NodeClicked(idx) => match self.simulation.node(idx) {
				Some(node) => {
					debug!("Selected {}", node.id);
					selection.select(node.id.clone())
				}
				None => selection,
			},
			PointerOutcome::CanvasClicked => selection.clear(),
			PointerOutcome::None => selection,
		};
		outcome
	}

	pub fn pointer_leave(&mut self) {
		self.interaction
			.pointer_leave(&mut self.simulation, &mut self.viewport);
	}

	pub fn wheel(&mut self, delta_y: f64, px: f64, py: f64) {
		self.viewport.wheel(delta_y, px, py);
	}

	pub fn zoom_in(&mut self, now_ms: f64) {
		self.viewport.zoom_in(now_ms);
	}

	pub fn zoom_out(&mut self, now_ms: f64) {
		self.viewport.zoom_out(now_ms);
	}

	pub fn reset_view(&mut self, now_ms: f64) {
		self.viewport.reset(now_ms);
	}
}
