use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="page page-not-found">
			<h1>"Страница не найдена"</h1>
			<A href="/">"К анализу"</A>
		</section>
	}
}
