mod component;
pub mod interaction;
mod render;
pub mod selection;
pub mod simulation;
pub mod state;
pub mod types;
pub mod viewport;

pub use component::OntologyGraph;
pub use render::{NodeSprite, SceneFrame};
pub use selection::{NodeDetail, SelectionState};
pub use simulation::{ForceParams, Motion, Simulation};
pub use state::{GraphHeight, GraphScene};
pub use viewport::{ViewportConfig, ViewportController};
