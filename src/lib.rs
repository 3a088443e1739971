//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod config;
pub mod error;
pub mod ontology;
pub mod pages;
pub mod services;
pub mod store;

// Top-Level pages
use crate::pages::graph::GraphPage;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::ontology_files::OntologyFilesPage;
use crate::pages::settings::SettingsPage;
use crate::pages::{AppState, NoticeBanner};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app shell: navigation, notice banner and the four pages.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	let state = AppState::new();
	provide_context(state);

	view! {
		<Html
			attr:lang="ru"
			attr:dir="ltr"
			attr:data-theme=move || if state.dark.get() { "dark" } else { "light" }
		/>

		// sets the document title
		<Title text="SysAnalyst AI" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<div class="app">
				<nav class="sidebar">
					<div class="brand">"SysAnalyst " <span>"AI"</span></div>
					<A href="/">"Анализ"</A>
					<A href="/graph">"Онтология"</A>
					<A href="/ontology">"Управление TTL (Neo4j)"</A>
					<A href="/settings">"Настройки"</A>
				</nav>
				<main>
					<NoticeBanner />
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Home />
						<Route path=path!("/graph") view=GraphPage />
						<Route path=path!("/ontology") view=OntologyFilesPage />
						<Route path=path!("/settings") view=SettingsPage />
					</Routes>
				</main>
			</div>
		</Router>
	}
}
