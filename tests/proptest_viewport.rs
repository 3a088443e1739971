use proptest::prelude::*;
use proptest::test_runner::Config;
use requirements_lens::components::ontology_graph::simulation::{SIMULATION_HEIGHT, SIMULATION_WIDTH};
use requirements_lens::components::ontology_graph::{GraphScene, ViewportConfig, ViewportController};
use requirements_lens::ontology::incose;

#[derive(Clone, Debug)]
enum ViewOp {
	ZoomIn,
	ZoomOut,
	Reset,
	Wheel { delta_y: f64, px: f64, py: f64 },
	Advance(f64),
}

fn view_op() -> impl Strategy<Value = ViewOp> {
	prop_oneof![
		Just(ViewOp::ZoomIn),
		Just(ViewOp::ZoomOut),
		Just(ViewOp::Reset),
		(-500.0_f64..500.0, 0.0_f64..1600.0, 0.0_f64..1000.0)
			.prop_map(|(delta_y, px, py)| ViewOp::Wheel { delta_y, px, py }),
		(0.0_f64..800.0).prop_map(ViewOp::Advance),
	]
}

#[derive(Clone, Debug)]
enum Click {
	Node(usize),
	Canvas,
}

fn click() -> impl Strategy<Value = Click> {
	prop_oneof![
		3 => (0_usize..54).prop_map(Click::Node),
		1 => Just(Click::Canvas),
	]
}

proptest! {
	#![proptest_config(Config::with_cases(128))]
	#[test]
	fn scale_stays_clamped(ops in prop::collection::vec(view_op(), 1..60)) {
		let config = ViewportConfig::default();
		let (min, max) = (config.min_scale, config.max_scale);
		let mut viewport = ViewportController::new(config, 1200.0, 700.0);
		let mut now = 0.0;
		for op in ops {
			match op {
				ViewOp::ZoomIn => viewport.zoom_in(now),
				ViewOp::ZoomOut => viewport.zoom_out(now),
				ViewOp::Reset => viewport.reset(now),
				ViewOp::Wheel { delta_y, px, py } => viewport.wheel(delta_y, px, py),
				ViewOp::Advance(dt) => {
					now += dt;
					viewport.advance(now);
				}
			}
			let k = viewport.transform().k;
			prop_assert!(k >= min - 1e-9 && k <= max + 1e-9, "scale {k} escaped [{min}, {max}]");
		}
		now += 1000.0;
		viewport.advance(now);
		prop_assert!(!viewport.is_animating());
		let k = viewport.transform().k;
		prop_assert!(k >= min - 1e-9 && k <= max + 1e-9);
	}

	#[test]
	fn at_most_one_node_selected(clicks in prop::collection::vec(click(), 1..20)) {
		let data = incose();
		let mut scene = GraphScene::with_defaults(data, SIMULATION_WIDTH, SIMULATION_HEIGHT).unwrap();
		for (step, click) in clicks.into_iter().enumerate() {
			let expected = match click {
				Click::Node(i) => {
					// Off to the side of the layout, one slot per step.
					let (wx, wy) = (-200.0 * (step as f64 + 1.0), -150.0);
					scene.simulation.place(i, wx, wy);
					let (px, py) = scene.viewport.world_to_screen(wx, wy);
					scene.pointer_down(px, py);
					scene.pointer_up();
					Some(data.nodes[i].id.clone())
				}
				Click::Canvas => {
					scene.pointer_down(1595.0, 995.0);
					scene.pointer_up();
					None
				}
			};
			prop_assert_eq!(scene.selection().selected().map(str::to_string), expected);
			let selected = scene
				.simulation
				.nodes()
				.iter()
				.filter(|n| scene.selection().is_selected(&n.id))
				.count();
			prop_assert!(selected <= 1);
		}
	}
}
