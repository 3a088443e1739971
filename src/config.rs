//! Connection settings and model catalogs.
//!
//! API keys and graph-store credentials come from the build environment
//! (`GIGACHAT_API_KEY`, `ROUTERAI_API_KEY`, `GEMINI_API_KEY`, `NEO4J_URL`,
//! `NEO4J_USER`, `NEO4J_PASSWORD`) and can be edited at runtime on the
//! settings page. Nothing is persisted.

use serde::{Deserialize, Serialize};

/// Chat-completion backend chosen for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiProvider {
	#[serde(rename = "gigachat")]
	GigaChat,
	#[default]
	#[serde(rename = "routerai")]
	RouterAi,
}

impl ApiProvider {
	pub fn label(self) -> &'static str {
		match self {
			ApiProvider::GigaChat => "GigaChat",
			ApiProvider::RouterAi => "RouterAI",
		}
	}

	/// Models offered for this provider.
	pub fn models(self) -> &'static [ModelInfo] {
		match self {
			ApiProvider::GigaChat => GIGACHAT_MODELS,
			ApiProvider::RouterAi => ROUTERAI_MODELS,
		}
	}

	/// First catalog entry; new sessions and provider switches start here.
	pub fn default_model(self) -> &'static str {
		self.models()[0].id
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelInfo {
	pub id: &'static str,
	pub name: &'static str,
}

pub const ROUTERAI_MODELS: &[ModelInfo] = &[
	ModelInfo {
		id: "google/gemini-3-flash-preview",
		name: "Google: Gemini 3 Flash (Recommended)",
	},
	ModelInfo {
		id: "deepseek/deepseek-chat-v3.1",
		name: "DeepSeek: Chat V3.1",
	},
	ModelInfo {
		id: "openai/gpt-4o",
		name: "OpenAI: GPT-4o",
	},
	ModelInfo {
		id: "anthropic/claude-3-haiku",
		name: "Anthropic: Claude 3 Haiku",
	},
];

pub const GIGACHAT_MODELS: &[ModelInfo] = &[
	ModelInfo {
		id: "GigaChat",
		name: "GigaChat (Standard)",
	},
	ModelInfo {
		id: "GigaChatPro",
		name: "GigaChat Pro",
	},
	ModelInfo {
		id: "GigaChatMax",
		name: "GigaChat Max",
	},
];

/// Graph database connection. Only checked for presence; the store is a mock.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStoreConfig {
	pub url: String,
	pub user: String,
	pub password: String,
}

impl GraphStoreConfig {
	pub fn is_complete(&self) -> bool {
		!self.url.trim().is_empty() && !self.password.is_empty()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
	pub gigachat: String,
	pub routerai: String,
	pub gemini: String,
}

/// Runtime configuration of the whole application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	pub keys: ApiKeys,
	pub routerai_base_url: String,
	pub gemini_base_url: String,
	/// Prefixed to provider URLs; empty disables proxying.
	pub cors_proxy: String,
	pub graph_store: GraphStoreConfig,
}

fn build_env(value: Option<&'static str>) -> String {
	value.unwrap_or_default().to_string()
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			keys: ApiKeys {
				gigachat: build_env(option_env!("GIGACHAT_API_KEY")),
				routerai: build_env(option_env!("ROUTERAI_API_KEY")),
				gemini: build_env(option_env!("GEMINI_API_KEY")),
			},
			routerai_base_url: "https://routerai.ru/api/v1".into(),
			gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
			cors_proxy: "https://corsproxy.io/?".into(),
			graph_store: GraphStoreConfig {
				url: build_env(option_env!("NEO4J_URL")),
				user: option_env!("NEO4J_USER").unwrap_or("neo4j").to_string(),
				password: build_env(option_env!("NEO4J_PASSWORD")),
			},
		}
	}
}
