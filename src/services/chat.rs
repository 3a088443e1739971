//! Chat messages, the provider interface and provider routing.

use serde::{Deserialize, Serialize};

use crate::config::{ApiProvider, AppConfig};
use crate::error::ProviderError;
use crate::ontology::incose;
use crate::services::gemini::GeminiClient;
use crate::services::gigachat::GigaChatClient;
use crate::services::http::Transport;
use crate::services::prompt::render_system_prompt;
use crate::services::routerai::RouterAiClient;

/// Returned in place of an empty completion.
pub const NO_RESPONSE: &str = "No response generated.";

pub const TEMPERATURE: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Assistant => "assistant",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: Role,
	pub content: String,
	/// Milliseconds since the epoch.
	pub timestamp: f64,
}

impl ChatMessage {
	pub fn user(content: impl Into<String>, timestamp: f64) -> Self {
		Self {
			role: Role::User,
			content: content.into(),
			timestamp,
		}
	}

	pub fn assistant(content: impl Into<String>, timestamp: f64) -> Self {
		Self {
			role: Role::Assistant,
			content: content.into(),
			timestamp,
		}
	}
}

/// A chat-completion backend.
///
/// `system_prompt_template` still carries its ontology placeholder; providers
/// render it against the INCOSE dataset before sending.
#[allow(async_fn_in_trait)]
pub trait ChatProvider {
	async fn complete(
		&self,
		model: &str,
		history: &[ChatMessage],
		system_prompt_template: &str,
	) -> Result<String, ProviderError>;
}

pub(crate) fn system_prompt(template: &str) -> String {
	render_system_prompt(template, incose())
}

pub(crate) fn non_empty(text: Option<String>) -> String {
	text.filter(|t| !t.trim().is_empty())
		.unwrap_or_else(|| NO_RESPONSE.to_string())
}

/// Where a session's request is actually sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
	/// Direct Gemini call with the bare model name.
	Gemini { model: String },
	GigaChat { model: String },
	RouterAi { model: String },
}

pub fn route(provider: ApiProvider, model: &str) -> Route {
	match provider {
		ApiProvider::GigaChat => Route::GigaChat {
			model: model.to_string(),
		},
		ApiProvider::RouterAi if model.to_lowercase().contains("gemini") => Route::Gemini {
			model: model.rsplit('/').next().unwrap_or(model).to_string(),
		},
		ApiProvider::RouterAi => Route::RouterAi {
			model: model.to_string(),
		},
	}
}

/// OpenAI-style chat-completions body, shared by GigaChat and RouterAI.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
	pub model: &'a str,
	pub messages: Vec<WireMessage<'a>>,
	pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
	pub role: &'a str,
	pub content: &'a str,
}

impl<'a> CompletionRequest<'a> {
	pub(crate) fn new(model: &'a str, system_prompt: &'a str, history: &'a [ChatMessage]) -> Self {
		let mut messages = Vec::with_capacity(history.len() + 1);
		messages.push(WireMessage {
			role: "system",
			content: system_prompt,
		});
		messages.extend(history.iter().map(|m| WireMessage {
			role: m.role.as_str(),
			content: &m.content,
		}));
		Self {
			model,
			messages,
			temperature: TEMPERATURE,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct CompletionResponse {
	#[serde(default)]
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
	content: Option<String>,
}

/// Text of the first choice.
pub(crate) fn completion_text(body: &str) -> Result<String, ProviderError> {
	let resp: CompletionResponse = serde_json::from_str(body)?;
	Ok(non_empty(
		resp.choices
			.into_iter()
			.next()
			.and_then(|c| c.message)
			.and_then(|m| m.content),
	))
}

/// Sends a session's history to whichever provider its settings route to.
pub struct Analyzer<'a, T> {
	config: &'a AppConfig,
	transport: &'a T,
	referer: String,
}

impl<'a, T: Transport> Analyzer<'a, T> {
	pub fn new(config: &'a AppConfig, transport: &'a T, referer: impl Into<String>) -> Self {
		Self {
			config,
			transport,
			referer: referer.into(),
		}
	}

	pub async fn analyze(
		&self,
		provider: ApiProvider,
		model: &str,
		history: &[ChatMessage],
		system_prompt_template: &str,
	) -> Result<String, ProviderError> {
		let route = route(provider, model);
		log::debug!("Routing {} request to {:?}", provider.label(), route);
		let result = match &route {
			Route::Gemini { model } => {
				GeminiClient::new(self.transport, &self.config.keys.gemini, &self.config.gemini_base_url)
					.complete(model, history, system_prompt_template)
					.await
			}
			Route::GigaChat { model } => {
				GigaChatClient::new(self.transport, &self.config.keys.gigachat, &self.config.cors_proxy)
					.complete(model, history, system_prompt_template)
					.await
			}
			Route::RouterAi { model } => {
				RouterAiClient::new(
					self.transport,
					&self.config.keys.routerai,
					&self.config.routerai_base_url,
					&self.config.cors_proxy,
					&self.referer,
				)
				.complete(model, history, system_prompt_template)
				.await
			}
		};
		if let Err(e) = &result {
			log::warn!("{} request failed: {e}", provider.label());
		}
		result
	}
}
