//! GigaChat: a per-call OAuth token exchange followed by an OpenAI-style
//! completion. Both hops go through the CORS proxy.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::services::chat::{ChatMessage, ChatProvider, CompletionRequest, completion_text, system_prompt};
use crate::services::http::{HttpRequest, Transport, random_id, with_proxy};

const PROVIDER: &str = "GigaChat";
pub const OAUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const COMPLETIONS_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";
const SCOPE: &str = "scope=GIGACHAT_API_PERS";

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
}

pub struct GigaChatClient<'a, T> {
	transport: &'a T,
	auth_key: &'a str,
	proxy: &'a str,
	request_id: fn() -> String,
}

impl<'a, T: Transport> GigaChatClient<'a, T> {
	/// `auth_key` is the Base64 client credentials used for Basic auth.
	pub fn new(transport: &'a T, auth_key: &'a str, proxy: &'a str) -> Self {
		Self {
			transport,
			auth_key,
			proxy,
			request_id: random_id,
		}
	}

	pub fn with_request_id(mut self, request_id: fn() -> String) -> Self {
		self.request_id = request_id;
		self
	}

	pub fn token_request(&self) -> HttpRequest {
		HttpRequest::post(with_proxy(self.proxy, OAUTH_URL))
			.header("Authorization", format!("Basic {}", self.auth_key))
			.header("RqUID", (self.request_id)())
			.header("Content-Type", "application/x-www-form-urlencoded")
			.body(SCOPE)
	}

	pub fn completion_request(
		&self,
		token: &str,
		model: &str,
		history: &[ChatMessage],
		system_prompt: &str,
	) -> Result<HttpRequest, ProviderError> {
		let body = CompletionRequest::new(model, system_prompt, history);
		Ok(HttpRequest::post(with_proxy(self.proxy, COMPLETIONS_URL))
			.header("Authorization", format!("Bearer {token}"))
			.header("Content-Type", "application/json")
			.body(serde_json::to_string(&body)?))
	}

	async fn access_token(&self) -> Result<String, ProviderError> {
		let resp = self.transport.send(self.token_request()).await?;
		if !resp.is_success() {
			return Err(match ProviderError::from_status(PROVIDER, resp.status, resp.body.clone()) {
				e @ (ProviderError::Quota { .. } | ProviderError::ProxyResolution(_)) => e,
				_ => ProviderError::Auth {
					provider: PROVIDER,
					status: resp.status,
					detail: resp.body,
				},
			});
		}
		let token: TokenResponse = serde_json::from_str(&resp.body)?;
		Ok(token.access_token)
	}
}

impl<T: Transport> ChatProvider for GigaChatClient<'_, T> {
	async fn complete(
		&self,
		model: &str,
		history: &[ChatMessage],
		system_prompt_template: &str,
	) -> Result<String, ProviderError> {
		if self.proxy.trim().is_empty() {
			return Err(ProviderError::MissingProxy);
		}
		if self.auth_key.is_empty() {
			return Err(ProviderError::MissingApiKey(PROVIDER));
		}
		let token = self.access_token().await?;
		log::debug!("GigaChat token acquired");
		let request = self.completion_request(&token, model, history, &system_prompt(system_prompt_template))?;
		let resp = self.transport.send(request).await?;
		if !resp.is_success() {
			return Err(ProviderError::from_status(PROVIDER, resp.status, resp.body));
		}
		completion_text(&resp.body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::http::testing::MockTransport;

	const PROXY: &str = "https://corsproxy.io/?";

	fn fixed_id() -> String {
		"00000000-0000-4000-8000-000000000000".into()
	}

	#[test]
	fn test_token_request() {
		let transport = MockTransport::default();
		let client = GigaChatClient::new(&transport, "Y3JlZHM=", PROXY).with_request_id(fixed_id);
		let req = client.token_request();
		assert_eq!(req.url, format!("{PROXY}{OAUTH_URL}"));
		assert_eq!(req.header_value("Authorization"), Some("Basic Y3JlZHM="));
		assert_eq!(req.header_value("RqUID"), Some("00000000-0000-4000-8000-000000000000"));
		assert_eq!(req.body.as_deref(), Some("scope=GIGACHAT_API_PERS"));
	}

	#[tokio::test]
	async fn test_token_then_completion() {
		let transport = MockTransport::default()
			.reply(200, r#"{"access_token":"tok","expires_at":1}"#)
			.reply(200, r#"{"choices":[{"message":{"content":"Ответ"}}]}"#);
		let client = GigaChatClient::new(&transport, "creds", PROXY).with_request_id(fixed_id);
		let out = client.complete("GigaChatPro", &[ChatMessage::user("req", 0.0)], "ctx").await;
		assert_eq!(out.unwrap(), "Ответ");

		let completion = transport.request(1);
		assert_eq!(completion.url, format!("{PROXY}{COMPLETIONS_URL}"));
		assert_eq!(completion.header_value("Authorization"), Some("Bearer tok"));
		let body: serde_json::Value = serde_json::from_str(completion.body.as_deref().unwrap()).unwrap();
		assert_eq!(body["model"], "GigaChatPro");
		assert_eq!(body["messages"][1]["content"], "req");
	}

	#[tokio::test]
	async fn test_failed_token_exchange_is_auth_error() {
		let transport = MockTransport::default().reply(400, "bad scope");
		let client = GigaChatClient::new(&transport, "creds", PROXY).with_request_id(fixed_id);
		assert_eq!(
			client.complete("GigaChat", &[], "").await,
			Err(ProviderError::Auth {
				provider: "GigaChat",
				status: 400,
				detail: "bad scope".into()
			})
		);
		assert_eq!(transport.requests.borrow().len(), 1);
	}

	#[tokio::test]
	async fn test_missing_key() {
		let transport = MockTransport::default();
		let client = GigaChatClient::new(&transport, "", PROXY);
		assert_eq!(
			client.complete("GigaChat", &[], "").await,
			Err(ProviderError::MissingApiKey("GigaChat"))
		);
	}

	#[tokio::test]
	async fn test_transport_failure_propagates() {
		let transport = MockTransport::default().fail(ProviderError::Network("offline".into()));
		let client = GigaChatClient::new(&transport, "creds", PROXY).with_request_id(fixed_id);
		assert_eq!(
			client.complete("GigaChat", &[], "").await,
			Err(ProviderError::Network("offline".into()))
		);
	}
}
