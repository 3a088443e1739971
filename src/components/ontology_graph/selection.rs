use crate::ontology::{NodeGroup, OntologyNode};

/// Shown when a node carries no definition.
pub const MISSING_DEFINITION: &str = "Нет определения";

/// At most one selected node, by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	selected: Option<String>,
}

impl SelectionState {
	/// Replaces any previous selection.
	#[must_use]
	pub fn select(self, id: impl Into<String>) -> Self {
		Self {
			selected: Some(id.into()),
		}
	}

	#[must_use]
	pub fn clear(self) -> Self {
		Self { selected: None }
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}
}

/// What the detail overlay shows for a selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetail {
	pub id: String,
	pub label: String,
	pub group: NodeGroup,
	/// Falls back to [`MISSING_DEFINITION`].
	pub definition: String,
	/// Omitted from the overlay when `None`.
	pub rationale: Option<String>,
	pub example: Option<String>,
}

impl NodeDetail {
	pub fn from_node(node: &OntologyNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			group: node.group,
			definition: node
				.definition
				.clone()
				.filter(|d| !d.is_empty())
				.unwrap_or_else(|| MISSING_DEFINITION.to_string()),
			rationale: node.rationale.clone().filter(|r| !r.is_empty()),
			example: node.example.clone().filter(|e| !e.is_empty()),
		}
	}
}
