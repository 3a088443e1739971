pub mod graph;
pub mod home;
pub mod not_found;
pub mod ontology_files;
pub mod settings;

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::ontology::{GraphData, incose};
use crate::store::{FontSize, OntologyFiles, SessionList};

/// Banner shown above every page until dismissed or replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
	Error(String),
	Success(String),
}

/// Application state shared by all pages through context.
#[derive(Clone, Copy)]
pub struct AppState {
	pub config: RwSignal<AppConfig>,
	pub sessions: RwSignal<SessionList>,
	pub files: RwSignal<OntologyFiles>,
	pub graph: RwSignal<GraphData>,
	pub notice: RwSignal<Option<Notice>>,
	pub font_size: RwSignal<FontSize>,
	pub dark: RwSignal<bool>,
	pub analyzing: RwSignal<bool>,
	pub syncing: RwSignal<bool>,
	pub refreshing: RwSignal<bool>,
}

impl AppState {
	pub fn new() -> Self {
		Self {
			config: RwSignal::new(AppConfig::default()),
			sessions: RwSignal::new(SessionList::new(js_sys::Date::now())),
			files: RwSignal::new(OntologyFiles::default()),
			graph: RwSignal::new(incose().clone()),
			notice: RwSignal::new(None),
			font_size: RwSignal::new(FontSize::default()),
			dark: RwSignal::new(false),
			analyzing: RwSignal::new(false),
			syncing: RwSignal::new(false),
			refreshing: RwSignal::new(false),
		}
	}

	pub fn error(&self, message: impl ToString) {
		self.notice.set(Some(Notice::Error(message.to_string())));
	}

	pub fn success(&self, message: impl ToString) {
		self.notice.set(Some(Notice::Success(message.to_string())));
	}
}

pub fn use_app_state() -> AppState {
	expect_context::<AppState>()
}

/// Dismissible error/success banner.
#[component]
pub fn NoticeBanner() -> impl IntoView {
	let state = use_app_state();
	move || {
		state.notice.get().map(|notice| {
			let (class, text) = match notice {
				Notice::Error(text) => ("notice notice-error", text),
				Notice::Success(text) => ("notice notice-success", text),
			};
			view! {
				<div class=class>
					<span>{text}</span>
					<button class="close" on:click=move |_| state.notice.set(None)>"×"</button>
				</div>
			}
		})
	}
}
