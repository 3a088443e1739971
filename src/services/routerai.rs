use serde::Deserialize;

use crate::error::ProviderError;
use crate::services::chat::{ChatMessage, ChatProvider, CompletionRequest, completion_text, system_prompt};
use crate::services::http::{HttpRequest, Transport, with_proxy};

const PROVIDER: &str = "RouterAI";
const APP_TITLE: &str = "SysAnalyst AI";

#[derive(Debug, Deserialize)]
struct ErrorBody {
	error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
	message: Option<String>,
}

/// OpenRouter-compatible chat completions.
pub struct RouterAiClient<'a, T> {
	transport: &'a T,
	api_key: &'a str,
	base_url: &'a str,
	proxy: &'a str,
	referer: &'a str,
}

impl<'a, T: Transport> RouterAiClient<'a, T> {
	pub fn new(transport: &'a T, api_key: &'a str, base_url: &'a str, proxy: &'a str, referer: &'a str) -> Self {
		Self {
			transport,
			api_key,
			base_url,
			proxy,
			referer,
		}
	}

	pub fn endpoint(&self) -> String {
		let base = self.base_url.strip_suffix('/').unwrap_or(self.base_url);
		with_proxy(self.proxy, &format!("{base}/chat/completions"))
	}

	pub fn request(&self, model: &str, history: &[ChatMessage], system_prompt: &str) -> Result<HttpRequest, ProviderError> {
		let body = CompletionRequest::new(model, system_prompt, history);
		Ok(HttpRequest::post(self.endpoint())
			.header("Authorization", format!("Bearer {}", self.api_key))
			.header("Content-Type", "application/json")
			.header("HTTP-Referer", self.referer)
			.header("X-Title", APP_TITLE)
			.body(serde_json::to_string(&body)?))
	}
}

fn error_detail(status: u16, body: &str, status_text: &str) -> String {
	if status == 401 {
		return "Invalid API Key.".into();
	}
	serde_json::from_str::<ErrorBody>(body)
		.ok()
		.and_then(|b| b.error)
		.and_then(|e| e.message)
		.unwrap_or_else(|| status_text.to_string())
}

impl<T: Transport> ChatProvider for RouterAiClient<'_, T> {
	async fn complete(
		&self,
		model: &str,
		history: &[ChatMessage],
		system_prompt_template: &str,
	) -> Result<String, ProviderError> {
		if self.api_key.is_empty() {
			return Err(ProviderError::MissingApiKey(PROVIDER));
		}
		let request = self.request(model, history, &system_prompt(system_prompt_template))?;
		let resp = self.transport.send(request).await?;
		if !resp.is_success() {
			return Err(ProviderError::from_status(
				PROVIDER,
				resp.status,
				error_detail(resp.status, &resp.body, &resp.status_text),
			));
		}
		completion_text(&resp.body)
	}
}
