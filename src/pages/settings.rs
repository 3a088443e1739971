use leptos::prelude::*;

use super::use_app_state;
use crate::config::AppConfig;

#[component]
fn SettingField(
	label: &'static str,
	#[prop(default = "text")] kind: &'static str,
	get: fn(&AppConfig) -> String,
	set: fn(&mut AppConfig, String),
) -> impl IntoView {
	let state = use_app_state();
	view! {
		<label class="setting">
			<span>{label}</span>
			<input
				type=kind
				prop:value=move || state.config.with(get)
				on:input=move |ev| {
					let value = event_target_value(&ev);
					state.config.update(|c| set(c, value));
				}
			/>
		</label>
	}
}

/// API keys, endpoints and graph store connection. Edits apply immediately
/// and last for the session.
#[component]
pub fn SettingsPage() -> impl IntoView {
	let state = use_app_state();

	view! {
		<section class="page page-settings">
			<h3>"Ключи API"</h3>
			<SettingField
				label="RouterAI API Key"
				kind="password"
				get=|c| c.keys.routerai.clone()
				set=|c, v| c.keys.routerai = v
			/>
			<SettingField
				label="GigaChat Authorization Key"
				kind="password"
				get=|c| c.keys.gigachat.clone()
				set=|c, v| c.keys.gigachat = v
			/>
			<SettingField
				label="Gemini API Key"
				kind="password"
				get=|c| c.keys.gemini.clone()
				set=|c, v| c.keys.gemini = v
			/>

			<h3>"Сеть"</h3>
			<SettingField
				label="RouterAI Base URL"
				get=|c| c.routerai_base_url.clone()
				set=|c, v| c.routerai_base_url = v
			/>
			<SettingField
				label="Gemini Base URL"
				get=|c| c.gemini_base_url.clone()
				set=|c, v| c.gemini_base_url = v
			/>
			<SettingField label="CORS Proxy" get=|c| c.cors_proxy.clone() set=|c, v| c.cors_proxy = v />

			<h3>"Neo4j"</h3>
			<SettingField label="URL" get=|c| c.graph_store.url.clone() set=|c, v| c.graph_store.url = v />
			<SettingField label="User" get=|c| c.graph_store.user.clone() set=|c, v| c.graph_store.user = v />
			<SettingField
				label="Password"
				kind="password"
				get=|c| c.graph_store.password.clone()
				set=|c, v| c.graph_store.password = v
			/>

			<h3>"Интерфейс"</h3>
			<label class="setting setting-toggle">
				<input
					type="checkbox"
					prop:checked=move || state.dark.get()
					on:change=move |_| state.dark.update(|d| *d = !*d)
				/>
				<span>"Тёмная тема"</span>
			</label>
		</section>
	}
}
