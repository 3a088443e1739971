use crate::ontology::GraphData;

/// Placeholder replaced with the ontology rules and characteristics.
pub const ONTOLOGY_CONTEXT_PLACEHOLDER: &str = "{ontology_context}";

/// A selectable system prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromptDefinition {
	pub id: &'static str,
	pub name: &'static str,
	pub description: &'static str,
	pub template: &'static str,
}

pub const PRELOADED_PROMPTS: &[PromptDefinition] = &[
	PromptDefinition {
		id: "default",
		name: "Стандартный INCOSE (Standard)",
		description: "Полный анализ с таблицей нарушений и рекомендациями.",
		template: include_str!("prompts/default.md"),
	},
	PromptDefinition {
		id: "strict",
		name: "Строгий Аудитор (Strict)",
		description: "Жесткая проверка на соответствие правилам, минимум объяснений.",
		template: include_str!("prompts/strict.md"),
	},
	PromptDefinition {
		id: "educational",
		name: "Обучающий режим (Educational)",
		description: "Подробные объяснения причин ошибок с точки зрения архитектуры.",
		template: include_str!("prompts/educational.md"),
	},
];

/// Looks a prompt up by id, falling back to the first one.
pub fn prompt_or_default(id: &str) -> &'static PromptDefinition {
	PRELOADED_PROMPTS
		.iter()
		.find(|p| p.id == id)
		.unwrap_or(&PRELOADED_PROMPTS[0])
}

/// Fills the template's ontology placeholder.
pub fn render_system_prompt(template: &str, ontology: &GraphData) -> String {
	template.replacen(ONTOLOGY_CONTEXT_PLACEHOLDER, &ontology.context_lines(), 1)
}
