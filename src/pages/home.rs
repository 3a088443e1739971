use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{AppState, use_app_state};
use crate::config::ApiProvider;
use crate::services::chat::{Analyzer, Role};
use crate::services::http::FetchTransport;
use crate::services::prompt::{PRELOADED_PROMPTS, prompt_or_default};
use crate::store::{EXAMPLE_REQUIREMENT, SessionId};

fn page_url() -> String {
	web_sys::window()
		.and_then(|w| w.location().href().ok())
		.unwrap_or_default()
}

/// Submits the active draft and appends the provider's reply when it lands.
fn analyze(state: AppState) {
	if state.analyzing.get_untracked() {
		return;
	}
	let mut sent = None;
	state.sessions.update(|s| sent = s.submit_draft(js_sys::Date::now()));
	let Some(id) = sent else {
		return;
	};
	let Some(session) = state.sessions.with_untracked(|s| s.get(id).cloned()) else {
		return;
	};
	let config = state.config.get_untracked();
	state.analyzing.set(true);
	state.notice.set(None);

	spawn_local(async move {
		let transport = FetchTransport;
		let analyzer = Analyzer::new(&config, &transport, page_url());
		let template = prompt_or_default(&session.prompt_id).template;
		match analyzer
			.analyze(session.provider, &session.model, &session.messages, template)
			.await
		{
			Ok(reply) => state.sessions.update(|s| {
				s.push_reply(id, reply, js_sys::Date::now());
			}),
			Err(e) => state.error(e),
		}
		state.analyzing.set(false);
	});
}

#[component]
fn SessionSidebar() -> impl IntoView {
	let state = use_app_state();
	let delete = move |id: SessionId| state.sessions.update(|s| s.delete(id, js_sys::Date::now()));

	view! {
		<aside class="sessions">
			<button class="new-session" on:click=move |_| {
				state.sessions.update(|s| {
					s.create(js_sys::Date::now());
				})
			}>"+ Новый анализ"</button>
			<ul>
				<For
					each=move || state.sessions.with(|s| s.sessions().iter().map(|c| (c.id, c.name.clone())).collect::<Vec<_>>())
					key=|(id, name)| (*id, name.clone())
					children=move |(id, name)| {
						let active = move || state.sessions.with(|s| s.active_id() == id);
						view! {
							<li class:active=active on:click=move |_| {
								state.sessions.update(|s| {
									s.activate(id);
								})
							}>
								<span>{name}</span>
								<button class="delete" on:click=move |ev| {
									ev.stop_propagation();
									delete(id);
								}>"×"</button>
							</li>
						}
					}
				/>
			</ul>
		</aside>
	}
}

#[component]
fn SessionSettings() -> impl IntoView {
	let state = use_app_state();
	let active = move || state.sessions.with(|s| s.active().clone());

	view! {
		<div class="session-settings">
			<label>
				<span>"Промпт"</span>
				<select
					prop:value=move || active().prompt_id
					on:change=move |ev| {
						let id = event_target_value(&ev);
						state.sessions.update(|s| s.set_prompt(&id));
					}
				>
					{PRELOADED_PROMPTS
						.iter()
						.map(|p| view! { <option value=p.id title=p.description>{p.name}</option> })
						.collect_view()}
				</select>
			</label>
			<label>
				<span>"Провайдер"</span>
				<select
					prop:value=move || match active().provider {
						ApiProvider::GigaChat => "gigachat",
						ApiProvider::RouterAi => "routerai",
					}
					on:change=move |ev| {
						let provider = match event_target_value(&ev).as_str() {
							"gigachat" => ApiProvider::GigaChat,
							_ => ApiProvider::RouterAi,
						};
						state.sessions.update(|s| s.set_provider(provider));
					}
				>
					<option value="routerai">{ApiProvider::RouterAi.label()}</option>
					<option value="gigachat">{ApiProvider::GigaChat.label()}</option>
				</select>
			</label>
			<label>
				<span>"Модель"</span>
				<select
					prop:value=move || active().model
					on:change=move |ev| {
						let model = event_target_value(&ev);
						state.sessions.update(|s| s.set_model(&model));
					}
				>
					{move || {
						active()
							.provider
							.models()
							.iter()
							.map(|m| view! { <option value=m.id>{m.name}</option> })
							.collect_view()
					}}
				</select>
			</label>
		</div>
	}
}

#[component]
fn Conversation() -> impl IntoView {
	let state = use_app_state();
	let messages = move || state.sessions.with(|s| s.active().messages.clone());

	view! {
		<div class="conversation" style=move || format!("font-size: {}px;", state.font_size.get().px())>
			<div class="font-controls">
				<button on:click=move |_| state.font_size.update(|f| *f = f.smaller())>"A−"</button>
				<span>{move || format!("{}px", state.font_size.get().px())}</span>
				<button on:click=move |_| state.font_size.update(|f| *f = f.larger())>"A+"</button>
			</div>
			{move || {
				messages()
					.into_iter()
					.map(|m| {
						let class = match m.role {
							Role::User => "message message-user",
							Role::Assistant => "message message-assistant",
						};
						view! { <div class=class>{m.content}</div> }
					})
					.collect_view()
			}}
			<Show when=move || state.analyzing.get()>
				<div class="message message-pending">"Анализ..."</div>
			</Show>
		</div>
	}
}

/// Requirement analysis chat.
#[component]
pub fn Home() -> impl IntoView {
	let state = use_app_state();
	let draft = move || state.sessions.with(|s| s.active().draft.clone());

	view! {
		<section class="page page-analysis">
			<SessionSidebar />
			<div class="analysis-main">
				<SessionSettings />
				<Conversation />
				<div class="composer">
					<textarea
						placeholder="Введите требование..."
						prop:value=draft
						on:input=move |ev| {
							let text = event_target_value(&ev);
							state.sessions.update(|s| s.set_draft(text));
						}
					/>
					<div class="composer-actions">
						<button on:click=move |_| state.sessions.update(|s| s.set_draft(EXAMPLE_REQUIREMENT))>
							"Пример"
						</button>
						<button
							class="primary"
							disabled=move || state.analyzing.get() || draft().trim().is_empty()
							on:click=move |_| analyze(state)
						>
							"Анализировать"
						</button>
					</div>
				</div>
			</div>
		</section>
	}
}
