use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use super::use_app_state;
use crate::services::http::random_id;
use crate::services::{GraphStore, MockGraphStore};
use crate::store::OntologyFile;

/// Upload, edit and sync Turtle files to the graph store.
#[component]
pub fn OntologyFilesPage() -> impl IntoView {
	let state = use_app_state();

	let on_upload = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(list) = input.files() else {
			return;
		};
		for i in 0..list.length() {
			let Some(file) = list.get(i) else {
				continue;
			};
			spawn_local(async move {
				match JsFuture::from(file.text()).await {
					Ok(text) => state.files.update(|f| {
						f.add(OntologyFile {
							id: random_id(),
							name: file.name(),
							content: text.as_string().unwrap_or_default(),
						})
					}),
					Err(e) => log::error!("Failed to read {}: {e:?}", file.name()),
				}
			});
		}
		input.set_value("");
	};

	let sync = move |_| {
		let files = state.files.with_untracked(|f| f.files().to_vec());
		let store = MockGraphStore::with_browser_latency(state.config.get_untracked().graph_store);
		state.syncing.set(true);
		state.notice.set(None);
		spawn_local(async move {
			match store.sync(&files).await {
				Ok(report) => state.success(report.message),
				Err(e) => state.error(e),
			}
			state.syncing.set(false);
		});
	};

	view! {
		<section class="page page-files">
			<div class="files-toolbar">
				<label class="upload">
					"Загрузить .ttl"
					<input type="file" multiple accept=".ttl" on:change=on_upload style="display: none;" />
				</label>
				<button
					class="primary"
					disabled=move || state.syncing.get() || state.files.with(|f| f.is_empty())
					on:click=sync
				>
					{move || if state.syncing.get() { "Синхронизация..." } else { "Синхронизировать с Neo4j" }}
				</button>
			</div>

			<Show
				when=move || state.files.with(|f| !f.is_empty())
				fallback=|| view! { <p class="empty">"Файлы не загружены."</p> }
			>
				<ul class="files">
					<For
						each=move || state.files.with(|f| f.files().iter().map(|file| (file.id.clone(), file.name.clone())).collect::<Vec<_>>())
						key=|(id, _)| id.clone()
						children=move |(id, name)| {
							let (edit_id, remove_id, content_id, input_id) = (id.clone(), id.clone(), id.clone(), id.clone());
							let editing = move || state.files.with(|f| f.editing() == Some(id.as_str()));
							let editing_label = editing.clone();
							view! {
								<li>
									<div class="file-row">
										<span class="file-name">{name}</span>
										<button on:click=move |_| state.files.update(|f| f.toggle_editing(&edit_id))>
											{move || if editing_label() { "Сохранить" } else { "Редактировать" }}
										</button>
										<button class="delete" on:click=move |_| state.files.update(|f| f.remove(&remove_id))>
											"Удалить"
										</button>
									</div>
									<Show when=editing>
										<textarea
											class="file-editor"
											prop:value={
												let content_id = content_id.clone();
												move || {
													state.files.with(|f| {
														f.files()
															.iter()
															.find(|file| file.id == content_id)
															.map(|file| file.content.clone())
															.unwrap_or_default()
													})
												}
											}
											on:input={
												let input_id = input_id.clone();
												move |ev| {
													let text = event_target_value(&ev);
													state.files.update(|f| {
														f.update_content(&input_id, text);
													});
												}
											}
										/>
									</Show>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</section>
	}
}
