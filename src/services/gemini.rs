use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::services::chat::{ChatMessage, ChatProvider, Role, TEMPERATURE, non_empty, system_prompt};
use crate::services::http::{HttpRequest, Transport};

const PROVIDER: &str = "Gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
	contents: Vec<Content<'a>>,
	system_instruction: Instruction<'a>,
	generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
	role: &'a str,
	parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Instruction<'a> {
	parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
	temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
	text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
	message: String,
}

/// Google Generative Language `generateContent`.
pub struct GeminiClient<'a, T> {
	transport: &'a T,
	api_key: &'a str,
	base_url: &'a str,
}

impl<'a, T: Transport> GeminiClient<'a, T> {
	pub fn new(transport: &'a T, api_key: &'a str, base_url: &'a str) -> Self {
		Self {
			transport,
			api_key,
			base_url,
		}
	}

	pub fn request(&self, model: &str, history: &[ChatMessage], system_prompt: &str) -> Result<HttpRequest, ProviderError> {
		let contents = history
			.iter()
			.map(|m| Content {
				role: match m.role {
					Role::User => "user",
					Role::Assistant => "model",
				},
				parts: [Part { text: &m.content }],
			})
			.collect();
		let body = GenerateRequest {
			contents,
			system_instruction: Instruction {
				parts: [Part { text: system_prompt }],
			},
			generation_config: GenerationConfig {
				temperature: TEMPERATURE,
			},
		};
		let url = format!(
			"{}/models/{}:generateContent?key={}",
			self.base_url.trim_end_matches('/'),
			model,
			self.api_key
		);
		Ok(HttpRequest::post(url)
			.header("Content-Type", "application/json")
			.body(serde_json::to_string(&body)?))
	}
}

/// All text parts of the first candidate, concatenated.
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
	let resp: GenerateResponse = serde_json::from_str(body)?;
	let text = resp
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>());
	Ok(non_empty(text))
}

fn error_detail(body: &str, status_text: &str) -> String {
	serde_json::from_str::<ErrorBody>(body)
		.map(|e| e.error.message)
		.unwrap_or_else(|_| status_text.to_string())
}

impl<T: Transport> ChatProvider for GeminiClient<'_, T> {
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
				error_detail(&resp.body, &resp.status_text),
			));
		}
		parse_response(&resp.body)
	}
}
