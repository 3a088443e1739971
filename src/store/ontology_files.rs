use serde::{Deserialize, Serialize};

/// An uploaded Turtle file awaiting sync to the graph store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyFile {
	pub id: String,
	pub name: String,
	pub content: String,
}

/// Uploaded files plus the one open in the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OntologyFiles {
	files: Vec<OntologyFile>,
	editing: Option<String>,
}

impl OntologyFiles {
	pub fn files(&self) -> &[OntologyFile] {
		&self.files
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	pub fn editing(&self) -> Option<&str> {
		self.editing.as_deref()
	}

	pub fn add(&mut self, file: OntologyFile) {
		self.files.push(file);
	}

	pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> bool {
		match self.files.iter_mut().find(|f| f.id == id) {
			Some(f) => {
				f.content = content.into();
				true
			}
			None => false,
		}
	}

	pub fn remove(&mut self, id: &str) {
		self.files.retain(|f| f.id != id);
		if self.editing.as_deref() == Some(id) {
			self.editing = None;
		}
	}

	/// Opens `id` in the editor, or closes it if it is already open.
	pub fn toggle_editing(&mut self, id: &str) {
		self.editing = match self.editing.as_deref() {
			Some(current) if current == id => None,
			_ => Some(id.to_string()),
		};
	}
}
