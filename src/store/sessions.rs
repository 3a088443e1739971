use serde::{Deserialize, Serialize};

use crate::config::ApiProvider;
use crate::services::chat::{ChatMessage, Role};
use crate::services::prompt::PRELOADED_PROMPTS;

pub type SessionId = u64;

const INITIAL_NAME: &str = "Новый анализ";
const TITLE_CHARS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
	pub id: SessionId,
	pub name: String,
	pub messages: Vec<ChatMessage>,
	/// Unsent text in the input box.
	pub draft: String,
	pub prompt_id: String,
	pub provider: ApiProvider,
	pub model: String,
	pub timestamp: f64,
}

impl ChatSession {
	fn new(id: SessionId, name: String, timestamp: f64) -> Self {
		let provider = ApiProvider::default();
		Self {
			id,
			name,
			messages: Vec::new(),
			draft: String::new(),
			prompt_id: PRELOADED_PROMPTS[0].id.to_string(),
			provider,
			model: provider.default_model().to_string(),
			timestamp,
		}
	}

	/// Latest assistant reply, if any.
	pub fn last_reply(&self) -> Option<&ChatMessage> {
		self.messages.iter().rev().find(|m| m.role == Role::Assistant)
	}
}

/// First `TITLE_CHARS` characters, with an ellipsis when cut.
pub fn session_title(text: &str) -> String {
	let mut chars = text.chars();
	let head: String = chars.by_ref().take(TITLE_CHARS).collect();
	if chars.next().is_some() {
		format!("{head}...")
	} else {
		head
	}
}

/// Ordered chat sessions, newest first, with exactly one active.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionList {
	sessions: Vec<ChatSession>,
	active: SessionId,
	next_id: SessionId,
}

impl SessionList {
	pub fn new(now: f64) -> Self {
		Self {
			sessions: vec![ChatSession::new(1, INITIAL_NAME.to_string(), now)],
			active: 1,
			next_id: 2,
		}
	}

	pub fn sessions(&self) -> &[ChatSession] {
		&self.sessions
	}

	pub fn active_id(&self) -> SessionId {
		self.active
	}

	pub fn active(&self) -> &ChatSession {
		self.sessions
			.iter()
			.find(|s| s.id == self.active)
			.unwrap_or(&self.sessions[0])
	}

	pub fn get(&self, id: SessionId) -> Option<&ChatSession> {
		self.sessions.iter().find(|s| s.id == id)
	}

	fn get_mut(&mut self, id: SessionId) -> Option<&mut ChatSession> {
		self.sessions.iter_mut().find(|s| s.id == id)
	}

	fn active_mut(&mut self) -> &mut ChatSession {
		let active = self.active;
		let idx = self.sessions.iter().position(|s| s.id == active).unwrap_or(0);
		&mut self.sessions[idx]
	}

	/// Inserts "Анализ N" at the front and activates it.
	pub fn create(&mut self, now: f64) -> SessionId {
		let id = self.next_id;
		self.next_id += 1;
		let name = format!("Анализ {}", self.sessions.len() + 1);
		self.sessions.insert(0, ChatSession::new(id, name, now));
		self.active = id;
		id
	}

	pub fn activate(&mut self, id: SessionId) -> bool {
		if self.get(id).is_some() {
			self.active = id;
			true
		} else {
			false
		}
	}

	/// Removing the only session leaves a single fresh one behind.
	pub fn delete(&mut self, id: SessionId, now: f64) {
		self.sessions.retain(|s| s.id != id);
		if self.sessions.is_empty() {
			let fresh = self.next_id;
			self.next_id += 1;
			self.sessions.push(ChatSession::new(fresh, INITIAL_NAME.to_string(), now));
			self.active = fresh;
		} else if self.active == id {
			self.active = self.sessions[0].id;
		}
	}

	pub fn set_draft(&mut self, text: impl Into<String>) {
		self.active_mut().draft = text.into();
	}

	pub fn set_prompt(&mut self, prompt_id: &str) {
		self.active_mut().prompt_id = prompt_id.to_string();
	}

	/// Switching provider also resets the model to the provider's first one.
	pub fn set_provider(&mut self, provider: ApiProvider) {
		let session = self.active_mut();
		session.provider = provider;
		session.model = provider.default_model().to_string();
	}

	pub fn set_model(&mut self, model: &str) {
		self.active_mut().model = model.to_string();
	}

	/// Moves the active draft into the history as a user message and returns
	/// the session it went to. Blank drafts are ignored.
	pub fn submit_draft(&mut self, now: f64) -> Option<SessionId> {
		let session = self.active_mut();
		let text = session.draft.trim().to_string();
		if text.is_empty() {
			return None;
		}
		if !session.messages.iter().any(|m| m.role == Role::User) {
			session.name = session_title(&text);
		}
		session.messages.push(ChatMessage::user(text, now));
		session.draft.clear();
		session.timestamp = now;
		Some(session.id)
	}

	/// Appends a reply to `id`; a session deleted meanwhile is skipped.
	pub fn push_reply(&mut self, id: SessionId, content: String, now: f64) -> bool {
		match self.get_mut(id) {
			Some(session) => {
				session.messages.push(ChatMessage::assistant(content, now));
				true
			}
			None => false,
		}
	}
}
