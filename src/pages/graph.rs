use leptos::prelude::*;
use leptos::task::spawn_local;

use super::use_app_state;
use crate::components::ontology_graph::OntologyGraph;
use crate::services::{MockGraphStore, refresh_graph};

/// Ontology graph page. The DB button reloads the graph from the store and
/// keeps the current graph if that fails.
#[component]
pub fn GraphPage() -> impl IntoView {
	let state = use_app_state();

	let refresh = Callback::new(move |_: ()| {
		if state.refreshing.get_untracked() {
			return;
		}
		state.refreshing.set(true);
		state.notice.set(None);
		let store = MockGraphStore::with_browser_latency(state.config.get_untracked().graph_store);
		spawn_local(async move {
			let mut next = state.graph.get_untracked();
			match refresh_graph(&store, &mut next).await {
				Ok(()) => {
					state.graph.set(next);
					state.success("Граф успешно обновлен из Neo4j.");
				}
				Err(e) => state.error(e),
			}
			state.refreshing.set(false);
		});
	});

	view! {
		<section class="page page-graph">
			<h2>"Онтология INCOSE"</h2>
			<OntologyGraph data=state.graph on_refresh=refresh is_refreshing=state.refreshing />
		</section>
	}
}
