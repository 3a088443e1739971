//! In-memory application state shared by the pages.

mod ontology_files;
mod sessions;

pub use ontology_files::{OntologyFile, OntologyFiles};
pub use sessions::{ChatSession, SessionId, SessionList, session_title};

/// Sample requirement offered on the analysis page.
pub const EXAMPLE_REQUIREMENT: &str = "Таймер должен иметь возможность устанавливать заданное время.";

/// Font size of rendered analysis results, in px.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSize(u32);

impl FontSize {
	pub const MIN: u32 = 10;
	pub const MAX: u32 = 24;
	pub const STEP: u32 = 2;

	pub fn px(self) -> u32 {
		self.0
	}

	pub fn larger(self) -> Self {
		Self((self.0 + Self::STEP).min(Self::MAX))
	}

	pub fn smaller(self) -> Self {
		Self(self.0.saturating_sub(Self::STEP).max(Self::MIN))
	}
}

impl Default for FontSize {
	fn default() -> Self {
		Self(14)
	}
}
