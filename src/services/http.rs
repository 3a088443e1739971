//! Minimal HTTP plumbing for the chat providers: a request/response pair, a
//! transport trait, and a browser `fetch` implementation.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::error::ProviderError;

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
	pub method: &'static str,
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub body: Option<String>,
}

impl HttpRequest {
	pub fn post(url: impl Into<String>) -> Self {
		Self {
			method: "POST",
			url: url.into(),
			headers: Vec::new(),
			body: None,
		}
	}

	pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.push((name.to_string(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}

	/// Value of the first header named `name` (case-insensitive).
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
	pub status: u16,
	pub status_text: String,
	pub body: String,
}

impl HttpResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends one request and returns the full response, whatever its status.
/// Only transport-level failures are errors.
#[allow(async_fn_in_trait)]
pub trait Transport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError>;
}

/// Prefixes `url` with a CORS proxy, if one is configured.
pub fn with_proxy(proxy: &str, url: &str) -> String {
	format!("{}{}", proxy.trim(), url)
}

/// Random UUID from `window.crypto`, used for request and record ids.
pub fn random_id() -> String {
	web_sys::window()
		.and_then(|w| w.crypto().ok())
		.map(|c| c.random_uuid())
		.unwrap_or_else(|| format!("{:016x}", (js_sys::Math::random() * u64::MAX as f64) as u64))
}

/// Resolves after `ms` milliseconds on the browser timer queue.
pub async fn sleep(ms: i32) {
	let promise = Promise::new(&mut |resolve, _reject| {
		let scheduled = web_sys::window()
			.and_then(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms).ok())
			.is_some();
		if !scheduled {
			let _ = resolve.call0(&JsValue::NULL);
		}
	});
	let _ = JsFuture::from(promise).await;
}

/// `window.fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

fn js_error(value: JsValue) -> ProviderError {
	ProviderError::Network(
		value
			.as_string()
			.or_else(|| {
				value
					.dyn_ref::<js_sys::Error>()
					.map(|e| String::from(e.message()))
			})
			.unwrap_or_else(|| format!("{value:?}")),
	)
}

async fn resolve(promise: Promise) -> Result<JsValue, ProviderError> {
	JsFuture::from(promise).await.map_err(js_error)
}

impl Transport for FetchTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
		let window = web_sys::window().ok_or_else(|| ProviderError::Network("no window".into()))?;

		let headers = Headers::new().map_err(js_error)?;
		for (name, value) in &request.headers {
			headers.set(name, value).map_err(js_error)?;
		}
		let init = RequestInit::new();
		init.set_method(request.method);
		init.set_mode(RequestMode::Cors);
		init.set_headers(&headers);
		if let Some(body) = &request.body {
			init.set_body(&JsValue::from_str(body));
		}

		let req = Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;
		let resp: Response = resolve(window.fetch_with_request(&req))
			.await?
			.dyn_into()
			.map_err(js_error)?;
		let body = resolve(resp.text().map_err(js_error)?).await?;

		Ok(HttpResponse {
			status: resp.status(),
			status_text: resp.status_text(),
			body: body.as_string().unwrap_or_default(),
		})
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::RefCell;
	use std::collections::VecDeque;

	use super::*;

	/// Replays canned responses in order and records every request.
	#[derive(Default)]
	pub(crate) struct MockTransport {
		replies: RefCell<VecDeque<Result<HttpResponse, ProviderError>>>,
		pub(crate) requests: RefCell<Vec<HttpRequest>>,
	}

	impl MockTransport {
		pub(crate) fn reply(self, status: u16, body: &str) -> Self {
			self.replies.borrow_mut().push_back(Ok(HttpResponse {
				status,
				status_text: String::new(),
				body: body.to_string(),
			}));
			self
		}

		pub(crate) fn fail(self, err: ProviderError) -> Self {
			self.replies.borrow_mut().push_back(Err(err));
			self
		}

		pub(crate) fn request(&self, i: usize) -> HttpRequest {
			self.requests.borrow()[i].clone()
		}
	}

	impl Transport for MockTransport {
		async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
			self.requests.borrow_mut().push(request);
			self.replies
				.borrow_mut()
				.pop_front()
				.unwrap_or_else(|| Err(ProviderError::Network("no reply queued".into())))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_proxy() {
		assert_eq!(
			with_proxy("https://corsproxy.io/?", "https://a.b/c"),
			"https://corsproxy.io/?https://a.b/c"
		);
		assert_eq!(with_proxy("", "https://a.b/c"), "https://a.b/c");
	}

	#[test]
	fn test_request_builder() {
		let req = HttpRequest::post("https://x")
			.header("Content-Type", "application/json")
			.body("{}");
		assert_eq!(req.header_value("content-type"), Some("application/json"));
		assert_eq!(req.body.as_deref(), Some("{}"));
	}

	#[tokio::test]
	async fn test_mock_replays_across_yields() {
		use testing::MockTransport;

		let transport = MockTransport::default()
			.reply(200, "first")
			.fail(ProviderError::Network("offline".into()));
		let first = transport.send(HttpRequest::post("https://a")).await.unwrap();
		tokio::task::yield_now().await;
		let second = transport.send(HttpRequest::post("https://b")).await;
		tokio::task::yield_now().await;
		let drained = transport.send(HttpRequest::post("https://c")).await;

		assert_eq!(first.body, "first");
		assert_eq!(second, Err(ProviderError::Network("offline".into())));
		assert_eq!(drained, Err(ProviderError::Network("no reply queued".into())));
		assert_eq!(transport.request(2).url, "https://c");
	}
}
