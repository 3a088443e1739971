use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use super::render;
use super::selection::NodeDetail;
use super::state::{GraphHeight, GraphScene};
use super::types::Cursor;
use crate::ontology::{GraphData, NodeGroup};

fn now_ms() -> f64 {
	js_sys::Date::now()
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: Cursor) {
	let _ = HtmlElement::style(canvas).set_property("cursor", cursor.as_css());
}

fn parent_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Interactive INCOSE ontology graph.
///
/// Rebuilds its whole scene whenever `data` changes. `on_refresh`, when
/// given, is invoked by the database button; the host reports progress
/// through `is_refreshing`, during which a loading overlay covers the graph.
#[component]
pub fn OntologyGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] on_refresh: Option<Callback<()>>,
	#[prop(into, default = Signal::stored(false))] is_refreshing: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene = StoredValue::new_local(None::<GraphScene>);
	let selected = RwSignal::new(None::<NodeDetail>);
	let height = RwSignal::new(GraphHeight::default());
	let setup_error = RwSignal::new(None::<String>);
	let generation = StoredValue::new(0u64);
	let resize_cb = StoredValue::new_local(None::<Closure<dyn FnMut()>>);

	Effect::new(move |_| {
		let snapshot = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			error!("Canvas 2D context unavailable");
			return;
		};

		let (w, h) = (parent_width(&canvas), height.get_untracked().px);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		scene.update_value(|s| {
			if let Some(old) = s.as_mut() {
				old.dispose();
			}
			*s = None;
		});
		selected.set(None);
		let current = generation.get_value() + 1;
		generation.set_value(current);

		match GraphScene::with_defaults(&snapshot, w, h) {
			Ok(s) => {
				set_cursor(&canvas, s.cursor());
				scene.set_value(Some(s));
				setup_error.set(None);
			}
			Err(e) => {
				setup_error.set(Some(e.to_string()));
				return;
			}
		}

		if resize_cb.with_value(Option::is_none) {
			let canvas_resize = canvas.clone();
			let cb = Closure::<dyn FnMut()>::new(move || {
				let (nw, nh) = (parent_width(&canvas_resize), height.get_untracked().px);
				canvas_resize.set_width(nw as u32);
				scene.update_value(|s| {
					if let Some(s) = s.as_mut() {
						s.resize(nw, nh);
					}
				});
			});
			if let Some(window) = web_sys::window() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			resize_cb.set_value(Some(cb));
		}

		// One loop per scene; a loop whose generation is stale, or whose
		// component is gone, drops itself without ticking.
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			let live = generation.try_get_value() == Some(current)
				&& scene
					.try_update_value(|s| {
						let Some(s) = s.as_mut() else {
							return false;
						};
						if !s.frame(now_ms()) {
							return false;
						}
						render::render(s, &ctx);
						true
					})
					.unwrap_or(false);
			if !live {
				let _ = animate_inner.borrow_mut().take();
				return;
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				request_frame(cb);
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			request_frame(cb);
		}
	});

	// Unmount: detach the resize listener and stop the scene so any frame
	// still queued finds it disposed.
	on_cleanup(move || {
		let _ = resize_cb.try_update_value(|cb| {
			if let (Some(cb), Some(window)) = (cb.take(), web_sys::window()) {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});
		let _ = scene.try_update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.dispose();
			}
			*s = None;
		});
		let _ = generation.try_update_value(|g| *g += 1);
	});

	Effect::new(move |_| {
		let h = height.get().px;
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_height(h as u32);
		let w = parent_width(&canvas);
		canvas.set_width(w as u32);
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.resize(w, h);
			}
		});
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.pointer_down(x, y);
				set_cursor(&canvas, s.cursor());
			}
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.pointer_move(x, y);
				set_cursor(&canvas, s.cursor());
			}
		});
	};

	let on_mouseup = move |_: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let detail = scene
			.try_update_value(|s| {
				s.as_mut().map(|s| {
					s.pointer_up();
					set_cursor(&canvas, s.cursor());
					s.selected_detail()
				})
			})
			.flatten();
		match detail {
			Some(detail) => selected.set(detail),
			None => warn!("Pointer release with no active scene"),
		}
	};

	let on_mouseleave = move |_: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.pointer_leave();
				set_cursor(&canvas, s.cursor());
			}
		});
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.wheel(ev.delta_y(), x, y);
			}
		});
	};

	let with_scene = move |f: fn(&mut GraphScene, f64)| {
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				f(s, now_ms());
			}
		});
	};

	let close_detail = move |_| {
		scene.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.close_detail();
			}
		});
		selected.set(None);
	};

	let refresh = move |_| {
		if let Some(cb) = on_refresh {
			cb.run(());
		}
	};

	view! {
		<div class="ontology-graph">
			<div class="graph-area" style=move || format!("height: {}px;", height.get().px)>
				<Show when=move || is_refreshing.get()>
					<div class="graph-loading">
						<span>"Загрузка из Neo4j..."</span>
					</div>
				</Show>

				<canvas
					node_ref=canvas_ref
					class="ontology-graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>

				{move || {
					setup_error
						.get()
						.map(|msg| view! { <div class="graph-error">{msg}</div> })
				}}

				<div class="graph-controls">
					<div class="control-group">
						<button title="Zoom In" on:click=move |_| with_scene(GraphScene::zoom_in)>"+"</button>
						<button title="Zoom Out" on:click=move |_| with_scene(GraphScene::zoom_out)>"−"</button>
						<button title="Reset View" on:click=move |_| with_scene(GraphScene::reset_view)>"⟲"</button>
					</div>
					<div class="control-group">
						<button title="Expand Window" on:click=move |_| height.update(|h| *h = h.grow())>"⤢"</button>
						<button title="Shrink Window" on:click=move |_| height.update(|h| *h = h.shrink())>"⤡"</button>
					</div>
					<div class="control-group">
						<button
							title="Загрузить из Neo4j"
							on:click=refresh
							disabled=move || is_refreshing.get() || on_refresh.is_none()
						>
							"DB"
						</button>
					</div>
				</div>

				<Show when=move || selected.with(Option::is_some)>
					<div class="node-detail">
						<div class="node-detail-header">
							<span class=move || {
								match selected.get().map(|d| d.group) {
									Some(NodeGroup::Characteristic) => "badge badge-characteristic",
									_ => "badge badge-rule",
								}
							}>{move || selected.get().map(|d| d.group.as_str())}</span>
							<button class="close" on:click=close_detail>"×"</button>
						</div>
						<h3>{move || selected.get().map(|d| d.label)}</h3>
						<div class="node-detail-field">
							<span class="caption">"Определение"</span>
							<p>{move || selected.get().map(|d| d.definition)}</p>
						</div>
						{move || {
							selected
								.get()
								.and_then(|d| d.rationale)
								.map(|r| {
									view! {
										<div class="node-detail-field">
											<span class="caption">"Обоснование"</span>
											<p class="rationale">{r}</p>
										</div>
									}
								})
						}}
						{move || {
							selected
								.get()
								.and_then(|d| d.example)
								.map(|e| {
									view! {
										<div class="node-detail-field">
											<span class="caption">"Пример"</span>
											<p class="example">{e}</p>
										</div>
									}
								})
						}}
					</div>
				</Show>
			</div>

			<div class="graph-legend">
				<span class="legend-item legend-characteristic">"Characteristic (C)"</span>
				<span class="legend-item legend-rule">"Rule (R)"</span>
				<span class="legend-hint">
					"Нажмите на узел для деталей. Используйте колесо мыши для зума. Кнопка БД загружает граф из Neo4j."
				</span>
				<span class="legend-viewport">{move || format!("VIEWPORT: {}PX", height.get().px)}</span>
			</div>
		</div>
	}
}
