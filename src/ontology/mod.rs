//! Ontology data model and the embedded INCOSE dataset.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Node classification in the requirements-quality taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeGroup {
	/// Quality characteristic (C1..C14).
	Characteristic,
	/// Writing rule (R1..R44).
	Rule,
	/// Reserved; not present in the shipped data.
	Attribute,
}

impl NodeGroup {
	/// Name shown in the detail overlay badge.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeGroup::Characteristic => "Characteristic",
			NodeGroup::Rule => "Rule",
			NodeGroup::Attribute => "Attribute",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A single rule or characteristic.
pub struct OntologyNode {
	/// Stable identity across re-renders.
	pub id: String,
	/// Display text.
	pub label: String,
	/// Determines render radius and color.
	pub group: NodeGroup,
	/// What the rule or characteristic means.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub definition: Option<String>,
	/// Why it matters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rationale: Option<String>,
	/// Good/bad wording sample.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub example: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Directed edge between two ontology nodes, referenced by id.
pub struct OntologyLink {
	/// Id of the originating node.
	pub source: String,
	/// Id of the node pointed at.
	pub target: String,
	/// Edge classification, `supports` in the shipped data.
	#[serde(rename = "type")]
	pub kind: String,
}

/// A graph snapshot handed to the ontology view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Nodes; ids are unique.
	pub nodes: Vec<OntologyNode>,
	/// Links between `nodes`.
	pub links: Vec<OntologyLink>,
}

impl GraphData {
	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&OntologyNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// One `label: definition` line per node, the form the analysis prompts
	/// embed as ontology context.
	pub fn context_lines(&self) -> String {
		self.nodes
			.iter()
			.map(|n| format!("{}: {}", n.label, n.definition.as_deref().unwrap_or("")))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

static INCOSE: Lazy<GraphData> = Lazy::new(|| {
	serde_json::from_str(include_str!("incose.json")).expect("embedded INCOSE dataset parses")
});

/// The INCOSE rules and characteristics shipped with the application.
pub fn incose() -> &'static GraphData {
	&INCOSE
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_incose_dataset_shape() {
		let data = incose();
		let characteristics = data
			.nodes
			.iter()
			.filter(|n| n.group == NodeGroup::Characteristic)
			.count();
		let rules = data
			.nodes
			.iter()
			.filter(|n| n.group == NodeGroup::Rule)
			.count();
		assert_eq!(characteristics, 14);
		assert_eq!(rules, 40);
		assert_eq!(data.links.len(), 112);
		assert!(data.links.iter().all(|l| l.kind == "supports"));
	}

	#[test]
	fn test_incose_ids_unique_and_links_resolve() {
		let data = incose();
		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), data.nodes.len());
		for link in &data.links {
			assert!(ids.contains(link.source.as_str()), "{}", link.source);
			assert!(ids.contains(link.target.as_str()), "{}", link.target);
		}
	}

	#[test]
	fn test_link_type_field_name() {
		let json = r#"{"nodes":[],"links":[{"source":"R1","target":"C3","type":"supports"}]}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.links[0].kind, "supports");
		let back = serde_json::to_string(&data).unwrap();
		assert!(back.contains(r#""type":"supports""#));
	}

	#[test]
	fn test_context_lines() {
		let data = incose();
		let context = data.context_lines();
		assert_eq!(context.lines().count(), data.nodes.len());
		assert!(context.starts_with("C1 - Необходимость: Требование необходимо"));
	}
}
