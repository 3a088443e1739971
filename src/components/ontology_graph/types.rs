use crate::ontology::NodeGroup;

/// Disc radius in simulation units.
pub fn node_radius(group: NodeGroup) -> f64 {
	match group {
		NodeGroup::Characteristic => 20.0,
		NodeGroup::Rule | NodeGroup::Attribute => 16.0,
	}
}

pub fn node_color(group: NodeGroup) -> &'static str {
	match group {
		NodeGroup::Characteristic => "#3b82f6",
		NodeGroup::Rule => "#ef4444",
		NodeGroup::Attribute => "#94a3b8",
	}
}

/// Canvas cursor affordance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
	#[default]
	Grab,
	Grabbing,
	Pointer,
}

impl Cursor {
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
			Cursor::Pointer => "pointer",
		}
	}
}
