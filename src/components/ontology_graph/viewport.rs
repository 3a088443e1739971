//! Pan/zoom transform over the simulation space.
//!
//! Three coordinate spaces meet here: world (simulation) coordinates, view
//! coordinates (the fixed `SIMULATION_WIDTH x SIMULATION_HEIGHT` view box the
//! zoom transform maps into), and canvas pixels (the view box letterboxed
//! into whatever size the canvas currently has). Node positions are never
//! rewritten by anything in this module.

use super::simulation::{SIMULATION_HEIGHT, SIMULATION_WIDTH};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// `view = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn apply(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	pub fn invert(&self, vx: f64, vy: f64) -> (f64, f64) {
		((vx - self.x) / self.k, (vy - self.y) / self.k)
	}

	/// Rescales to `k`, keeping the view point `(ax, ay)` fixed.
	fn rescaled_about(&self, k: f64, ax: f64, ay: f64) -> Self {
		let ratio = k / self.k;
		Self {
			x: ax - (ax - self.x) * ratio,
			y: ay - (ay - self.y) * ratio,
			k,
		}
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Zoom bounds, step factors and animation timings.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	pub zoom_in_factor: f64,
	pub zoom_out_factor: f64,
	pub wheel_in_factor: f64,
	pub wheel_out_factor: f64,
	pub zoom_duration_ms: f64,
	pub reset_duration_ms: f64,
	/// Transform applied when a scene is set up.
	pub initial: ViewTransform,
	/// Transform [`ViewportController::reset`] animates to.
	pub home: ViewTransform,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.2,
			max_scale: 4.0,
			zoom_in_factor: 1.3,
			zoom_out_factor: 0.7,
			wheel_in_factor: 1.1,
			wheel_out_factor: 0.9,
			zoom_duration_ms: 300.0,
			reset_duration_ms: 750.0,
			initial: ViewTransform {
				x: SIMULATION_WIDTH / 8.0,
				y: SIMULATION_HEIGHT / 8.0,
				k: 0.75,
			},
			home: ViewTransform {
				x: 200.0 * 0.75,
				y: 150.0 * 0.75,
				k: 0.75,
			},
		}
	}
}

/// View box letterboxed into the canvas (`xMidYMid meet`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBoxFit {
	pub scale: f64,
	pub offset_x: f64,
	pub offset_y: f64,
}

impl ViewBoxFit {
	pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
		let scale = (canvas_width / SIMULATION_WIDTH)
			.min(canvas_height / SIMULATION_HEIGHT)
			.max(f64::EPSILON);
		Self {
			scale,
			offset_x: (canvas_width - SIMULATION_WIDTH * scale) / 2.0,
			offset_y: (canvas_height - SIMULATION_HEIGHT * scale) / 2.0,
		}
	}

	pub fn to_view(&self, px: f64, py: f64) -> (f64, f64) {
		(
			(px - self.offset_x) / self.scale,
			(py - self.offset_y) / self.scale,
		)
	}
}

#[derive(Clone, Copy, Debug)]
struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	start_ms: f64,
	duration_ms: f64,
}

#[derive(Clone, Copy, Debug)]
struct Pan {
	start_x: f64,
	start_y: f64,
	from: ViewTransform,
}

/// Canvas-space affine `(a, e, f)` such that `pixel = a * world + (e, f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
	pub scale: f64,
	pub translate_x: f64,
	pub translate_y: f64,
}

/// Owns the pan/zoom transform and its animations.
#[derive(Clone, Debug)]
pub struct ViewportController {
	config: ViewportConfig,
	transform: ViewTransform,
	fit: ViewBoxFit,
	transition: Option<Transition>,
	pan: Option<Pan>,
}

impl ViewportController {
	pub fn new(config: ViewportConfig, canvas_width: f64, canvas_height: f64) -> Self {
		let mut controller = Self {
			transform: ViewTransform::default(),
			fit: ViewBoxFit::new(canvas_width, canvas_height),
			transition: None,
			pan: None,
			config,
		};
		controller.set_transform(controller.config.initial);
		controller
	}

	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn fit(&self) -> ViewBoxFit {
		self.fit
	}

	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
		self.fit = ViewBoxFit::new(canvas_width, canvas_height);
	}

	fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.config.min_scale, self.config.max_scale)
	}

	/// Jumps to `t`, clamping its scale and cancelling any animation.
	pub fn set_transform(&mut self, t: ViewTransform) {
		self.transition = None;
		self.transform = ViewTransform {
			k: self.clamp_scale(t.k),
			..t
		};
	}

	/// Composition of the view-box fit and the zoom transform.
	pub fn canvas_transform(&self) -> CanvasTransform {
		let (s, t) = (self.fit.scale, self.transform);
		CanvasTransform {
			scale: s * t.k,
			translate_x: self.fit.offset_x + s * t.x,
			translate_y: self.fit.offset_y + s * t.y,
		}
	}

	/// Canvas pixel to simulation coordinates.
	pub fn screen_to_world(&self, px: f64, py: f64) -> (f64, f64) {
		let (vx, vy) = self.fit.to_view(px, py);
		self.transform.invert(vx, vy)
	}

	/// Simulation coordinates to canvas pixel.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		let c = self.canvas_transform();
		(wx * c.scale + c.translate_x, wy * c.scale + c.translate_y)
	}

	/// Canvas-pixel distance expressed in world units.
	pub fn screen_to_world_distance(&self, d: f64) -> f64 {
		d / (self.fit.scale * self.transform.k)
	}

	fn animate_to(&mut self, to: ViewTransform, duration_ms: f64, now_ms: f64) {
		let to = ViewTransform {
			k: self.clamp_scale(to.k),
			..to
		};
		self.transition = Some(Transition {
			from: self.transform,
			to,
			start_ms: now_ms,
			duration_ms,
		});
	}

	/// Multiplies the scale by `factor` about the view-box center.
	pub fn scale_by(&mut self, factor: f64, duration_ms: f64, now_ms: f64) {
		let target = self.transition.map(|t| t.to).unwrap_or(self.transform);
		let k = self.clamp_scale(target.k * factor);
		let to = target.rescaled_about(k, SIMULATION_WIDTH / 2.0, SIMULATION_HEIGHT / 2.0);
		self.animate_to(to, duration_ms, now_ms);
	}

	pub fn zoom_in(&mut self, now_ms: f64) {
		self.scale_by(self.config.zoom_in_factor, self.config.zoom_duration_ms, now_ms);
	}

	pub fn zoom_out(&mut self, now_ms: f64) {
		self.scale_by(self.config.zoom_out_factor, self.config.zoom_duration_ms, now_ms);
	}

	pub fn reset(&mut self, now_ms: f64) {
		self.animate_to(self.config.home, self.config.reset_duration_ms, now_ms);
	}

	/// Steps the running animation to `now_ms`. Returns `true` while one is
	/// still in flight.
	pub fn advance(&mut self, now_ms: f64) -> bool {
		let Some(tr) = self.transition else {
			return false;
		};
		let t = if tr.duration_ms <= 0.0 {
			1.0
		} else {
			((now_ms - tr.start_ms) / tr.duration_ms).clamp(0.0, 1.0)
		};
		self.transform = tr.from.lerp(&tr.to, ease_out_cubic(t));
		if t >= 1.0 {
			self.transform = tr.to;
			self.transition = None;
		}
		self.transition.is_some()
	}

	pub fn pan_start(&mut self, px: f64, py: f64) {
		self.transition = None;
		self.pan = Some(Pan {
			start_x: px,
			start_y: py,
			from: self.transform,
		});
	}

	pub fn pan_move(&mut self, px: f64, py: f64) {
		if let Some(pan) = self.pan {
			self.transform.x = pan.from.x + (px - pan.start_x) / self.fit.scale;
			self.transform.y = pan.from.y + (py - pan.start_y) / self.fit.scale;
		}
	}

	pub fn pan_end(&mut self) {
		self.pan = None;
	}

	/// One wheel notch about the pointer; positive `delta_y` zooms out.
	pub fn wheel(&mut self, delta_y: f64, px: f64, py: f64) {
		self.transition = None;
		let factor = if delta_y > 0.0 {
			self.config.wheel_out_factor
		} else {
			self.config.wheel_in_factor
		};
		let (ax, ay) = self.fit.to_view(px, py);
		let k = self.clamp_scale(self.transform.k * factor);
		self.transform = self.transform.rescaled_about(k, ax, ay);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn controller() -> ViewportController {
		ViewportController::new(ViewportConfig::default(), SIMULATION_WIDTH, SIMULATION_HEIGHT)
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn test_initial_transform() {
		let vp = controller();
		assert_eq!(
			vp.transform(),
			ViewTransform {
				x: 200.0,
				y: 125.0,
				k: 0.75
			}
		);
	}

	#[test]
	fn test_zoom_in_animates_and_lands() {
		let mut vp = controller();
		vp.zoom_in(0.0);
		assert!(vp.is_animating());
		assert!(vp.advance(150.0));
		let mid = vp.transform().k;
		assert!(mid > 0.75 && mid < 0.75 * 1.3);
		assert!(!vp.advance(300.0));
		assert!(close(vp.transform().k, 0.75 * 1.3));
	}

	#[test]
	fn test_zoom_keeps_view_center_fixed() {
		let mut vp = controller();
		let before = vp.transform().invert(800.0, 500.0);
		vp.zoom_out(0.0);
		vp.advance(1000.0);
		let after = vp.transform().invert(800.0, 500.0);
		assert!(close(before.0, after.0) && close(before.1, after.1));
	}

	#[test]
	fn test_scale_clamped_at_both_ends() {
		let mut vp = controller();
		for i in 0..20 {
			vp.zoom_in(i as f64);
		}
		vp.advance(10_000.0);
		assert_eq!(vp.transform().k, 4.0);
		for i in 0..40 {
			vp.zoom_out(i as f64);
		}
		vp.advance(10_000.0);
		assert_eq!(vp.transform().k, 0.2);
	}

	#[test]
	fn test_reset_goes_home() {
		let mut vp = controller();
		vp.pan_start(0.0, 0.0);
		vp.pan_move(300.0, -40.0);
		vp.pan_end();
		vp.reset(0.0);
		vp.advance(750.0);
		assert_eq!(vp.transform(), ViewportConfig::default().home);
	}

	#[test]
	fn test_pan_translates_by_delta() {
		let mut vp = ViewportController::new(ViewportConfig::default(), 800.0, 500.0);
		let start = vp.transform();
		vp.pan_start(10.0, 10.0);
		vp.pan_move(30.0, 0.0);
		// Canvas is half the view box, so pixels count double.
		assert!(close(vp.transform().x, start.x + 40.0));
		assert!(close(vp.transform().y, start.y - 20.0));
		vp.pan_end();
		vp.pan_move(500.0, 500.0);
		assert!(close(vp.transform().x, start.x + 40.0));
	}

	#[test]
	fn test_wheel_zooms_about_pointer() {
		let mut vp = controller();
		let anchor = vp.screen_to_world(400.0, 300.0);
		vp.wheel(-1.0, 400.0, 300.0);
		assert!(close(vp.transform().k, 0.75 * 1.1));
		let after = vp.screen_to_world(400.0, 300.0);
		assert!(close(anchor.0, after.0) && close(anchor.1, after.1));
	}

	#[test]
	fn test_letterboxed_fit() {
		let fit = ViewBoxFit::new(1600.0, 1500.0);
		assert!(close(fit.scale, 1.0));
		assert!(close(fit.offset_x, 0.0));
		assert!(close(fit.offset_y, 250.0));
		assert_eq!(fit.to_view(100.0, 250.0), (100.0, 0.0));
	}

	#[test]
	fn test_screen_world_roundtrip() {
		let mut vp = ViewportController::new(ViewportConfig::default(), 1200.0, 700.0);
		vp.wheel(1.0, 50.0, 80.0);
		let (sx, sy) = vp.world_to_screen(123.0, -45.0);
		let (wx, wy) = vp.screen_to_world(sx, sy);
		assert!((wx - 123.0).abs() < 1e-6 && (wy + 45.0).abs() < 1e-6);
	}

	#[test]
	fn test_user_gesture_cancels_animation() {
		let mut vp = controller();
		vp.reset(0.0);
		vp.pan_start(0.0, 0.0);
		assert!(!vp.is_animating());
	}
}
