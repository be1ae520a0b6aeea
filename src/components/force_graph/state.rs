//! The scene store driven by the canvas component.

use std::f64::consts::PI;

use log::{debug, info};

use super::config::SceneConfig;
use super::frame::{Frame, Point, Viewport, tether};
use super::interaction::{DragEvent, DragTracker, Highlight, PinState};
use super::scene::Scene;
use super::simulation::Simulation;
use super::types::{AnchorRole, LabelAnchor};

/// Seconds simulated per animation frame.
pub const TICK_SECONDS: f32 = 0.016;
const INITIAL_SPREAD: f64 = 100.0;

/// Whether ticks advance the simulations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
	/// Built, not started yet.
	Idle,
	/// Ticks step both simulations.
	Running,
	/// Ticks are ignored until `start`.
	Stopped,
}

/// The scene store: both simulations, pins, hover and the current frame.
///
/// All mutation goes through the methods here so the clamp, mirror and pin
/// invariants are enforced in one place.
pub struct ForceGraphState {
	/// The bound scene.
	pub scene: Scene,
	/// Tunables.
	pub config: SceneConfig,
	/// Clamp bounds.
	pub viewport: Viewport,
	/// Geometry of the last step.
	pub frame: Frame,
	/// Hover focus.
	pub hover: Highlight,
	primary: Simulation,
	labels: Simulation,
	pins: Vec<PinState>,
	drags: DragTracker,
	dragged: Option<usize>,
	label_widths: Vec<f64>,
	lifecycle: Lifecycle,
}

impl ForceGraphState {
	/// Lay out `scene` on a circle around the viewport center and seed the
	/// label anchors next to their nodes. `measure` returns the rendered width
	/// of a label.
	pub fn new(
		scene: Scene,
		config: SceneConfig,
		width: f64,
		height: f64,
		measure: impl Fn(&str) -> f64,
	) -> Self {
		let viewport = Viewport {
			width,
			height,
			padding: config.padding,
		};
		let mut primary = Simulation::new(&config.primary, width, height);
		let mut labels = Simulation::new(&config.labels, width, height);

		let count = scene.nodes.len().max(1) as f64;
		let angles: Vec<f64> = (0..scene.nodes.len())
			.map(|i| (i as f64) * 2.0 * PI / count)
			.collect();
		for angle in &angles {
			primary.add_particle(
				width / 2.0 + INITIAL_SPREAD * angle.cos(),
				height / 2.0 + INITIAL_SPREAD * angle.sin(),
				false,
			);
		}
		for link in &scene.links {
			primary.add_spring(link.source, link.target);
		}

		let label_widths = scene
			.anchors
			.chunks_exact(2)
			.map(|pair| {
				let text = scene.nodes[pair[0].node].label.as_deref().unwrap_or_default();
				measure(text)
			})
			.collect();

		for (i, anchor) in scene.anchors.iter().enumerate() {
			let angle = angles[anchor.node];
			let reach = INITIAL_SPREAD
				+ match LabelAnchor::role(i) {
					AnchorRole::Node => 0.0,
					AnchorRole::Label => config.label_distance,
				};
			labels.add_particle(
				width / 2.0 + reach * angle.cos(),
				height / 2.0 + reach * angle.sin(),
				LabelAnchor::role(i) == AnchorRole::Node,
			);
		}
		for link in &scene.anchor_links {
			labels.add_spring(link.source, link.target);
		}

		let pins = vec![PinState::Free; scene.nodes.len()];
		let mut state = Self {
			scene,
			config,
			viewport,
			frame: Frame::default(),
			hover: Highlight::default(),
			primary,
			labels,
			pins,
			drags: DragTracker::default(),
			dragged: None,
			label_widths,
			lifecycle: Lifecycle::Idle,
		};
		state.refresh_frame();
		state
	}

	/// Begin ticking.
	pub fn start(&mut self) {
		self.lifecycle = Lifecycle::Running;
		self.primary.restart();
		self.labels.restart();
		debug!("Simulations started");
	}

	/// Stop ticking. Positions are kept.
	pub fn stop(&mut self) {
		self.lifecycle = Lifecycle::Stopped;
		self.primary.stop();
		self.labels.stop();
		debug!("Simulations stopped");
	}

	/// Stop and release the scene.
	pub fn dispose(mut self) {
		self.stop();
		info!("Disposed scene with {} nodes", self.scene.nodes.len());
	}

	/// Current lifecycle stage.
	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	/// Whether either simulation still has energy.
	pub fn is_active(&self) -> bool {
		self.lifecycle == Lifecycle::Running
			&& (self.primary.is_running() || self.labels.is_running())
	}

	/// Energy of the node and label simulations.
	pub fn alpha(&self) -> (f64, f64) {
		(self.primary.alpha(), self.labels.alpha())
	}

	/// Advance both simulations in lockstep, then rebuild the frame.
	/// Returns whether anything was integrated.
	pub fn tick(&mut self, dt: f32) -> bool {
		if self.lifecycle != Lifecycle::Running {
			return false;
		}
		let nodes_moved = self.primary.step(dt);
		let labels_moved = self.labels.step(dt);
		self.refresh_frame();
		nodes_moved || labels_moved
	}

	/// Clamp nodes, glue node anchors to their nodes, keep label anchors
	/// within reach, then recompute every line and label offset.
	fn refresh_frame(&mut self) {
		let viewport = self.viewport;
		self.primary.update_positions(|_, x, y| {
			(*x, *y) = viewport.clamp(*x, *y);
		});
		let nodes: Vec<Point> = self.primary.positions().into_iter().map(Point::from).collect();

		let anchors = &self.scene.anchors;
		let max_distance = self.config.label_distance;
		self.labels.update_positions(|slot, x, y| {
			let Some(node) = anchors.get(slot).and_then(|a| nodes.get(a.node)) else {
				return;
			};
			match LabelAnchor::role(slot) {
				AnchorRole::Node => {
					(*x, *y) = (node.x, node.y);
				}
				AnchorRole::Label => {
					let p = tether(*node, Point { x: *x, y: *y }, max_distance);
					(*x, *y) = (p.x, p.y);
				}
			}
		});
		let anchors: Vec<Point> = self.labels.positions().into_iter().map(Point::from).collect();

		self.frame = Frame::build(
			&self.scene,
			nodes,
			anchors,
			&self.label_widths,
			self.config.label_offset_y,
		);
	}

	/// Hit test against marker radii. The topmost (last drawn) node wins.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (idx, (node, pos)) in self.scene.nodes.iter().zip(&self.frame.nodes).enumerate() {
			let (dx, dy) = (pos.x - x, pos.y - y);
			if (dx * dx + dy * dy).sqrt() < node.radius + self.config.hit_slop {
				found = Some(idx);
			}
		}
		found
	}

	/// Current position of a node.
	pub fn node_position(&self, node: usize) -> Option<Point> {
		self.frame.nodes.get(node).copied()
	}

	/// Pin state of a node.
	pub fn pin_state(&self, node: usize) -> PinState {
		self.pins.get(node).copied().unwrap_or_default()
	}

	/// Fixed coordinates of a node, if pinned.
	pub fn pin(&self, node: usize) -> Option<(f64, f64)> {
		self.pin_state(node).fixed()
	}

	/// The node under an active drag gesture.
	pub fn dragged(&self) -> Option<usize> {
		self.dragged
	}

	/// Grab a node. The first concurrent grab reheats both simulations.
	pub fn drag_start(&mut self, node: usize) {
		let Some(pos) = self.node_position(node) else {
			return;
		};
		if self.pin_state(node).is_dragging() {
			return;
		}
		if self.drags.begin() {
			self.reheat();
		}
		self.transition(node, DragEvent::Start { x: pos.x, y: pos.y });
		self.dragged = Some(node);
		debug!("Drag start on node {}", self.scene.nodes[node].id);
	}

	/// Move a grabbed node to the pointer.
	pub fn drag_move(&mut self, node: usize, x: f64, y: f64) {
		if !self.pin_state(node).is_dragging() {
			return;
		}
		self.transition(node, DragEvent::Move { x, y });
	}

	/// Let go of a node. The last concurrent release cools both simulations.
	pub fn drag_end(&mut self, node: usize) {
		if !self.pin_state(node).is_dragging() {
			return;
		}
		self.transition(node, DragEvent::End);
		if self.dragged == Some(node) {
			self.dragged = None;
		}
		if self.drags.end() {
			self.cool();
		}
		debug!(
			"Drag end on node {}: {:?}",
			self.scene.nodes[node].id, self.pins[node]
		);
	}

	/// Unpin a node left pinned by a drag. Returns whether it was pinned.
	pub fn release(&mut self, node: usize) -> bool {
		let before = self.pin_state(node);
		let after = before.release();
		if before == after {
			return false;
		}
		self.pins[node] = after;
		self.primary.set_fixed(node, false);
		true
	}

	fn transition(&mut self, node: usize, event: DragEvent) {
		let Some(pin) = self.pins.get_mut(node) else {
			return;
		};
		*pin = pin.apply(event, self.config.release_policy);
		match pin.fixed() {
			Some((fx, fy)) => {
				self.primary.set_fixed(node, true);
				self.primary.set_position(node, fx, fy);
			}
			None => self.primary.set_fixed(node, false),
		}
	}

	/// Both simulations are reheated together so labels never lag.
	fn reheat(&mut self) {
		self.primary
			.set_alpha_target(self.config.primary.alpha.reheat_target);
		self.labels
			.set_alpha_target(self.config.labels.alpha.reheat_target);
		if self.lifecycle == Lifecycle::Running {
			self.primary.restart();
			self.labels.restart();
		}
	}

	fn cool(&mut self) {
		self.primary.set_alpha_target(0.0);
		self.labels.set_alpha_target(0.0);
	}

	/// Hover a node, or nothing.
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.set(node) {
			debug!(
				"Hover {:?}",
				node.and_then(|i| self.scene.nodes.get(i)).map(|n| &n.id)
			);
		}
	}

	/// Pointer pressed at canvas coordinates.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(node) = self.node_at_position(x, y) {
			self.drag_start(node);
		}
	}

	/// Pointer moved: drag the grabbed node, or update the hover.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		match self.dragged {
			Some(node) => self.drag_move(node, x, y),
			None => {
				let hovered = self.node_at_position(x, y);
				self.set_hover(hovered);
			}
		}
	}

	/// Pointer released anywhere.
	pub fn pointer_up(&mut self) {
		if let Some(node) = self.dragged {
			self.drag_end(node);
		}
	}

	/// Pointer left the canvas.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Double-click at canvas coordinates.
	pub fn double_click(&mut self, x: f64, y: f64) {
		if let Some(node) = self.node_at_position(x, y) {
			if self.release(node) {
				debug!("Released node {}", self.scene.nodes[node].id);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::{LabelPolicy, ReleasePolicy};
	use crate::graph::{GraphData, GraphLink, GraphNode};

	const WIDTH: f64 = 320.0;
	const HEIGHT: f64 = 240.0;

	fn data() -> GraphData {
		let node = |id: &str, group: &str| GraphNode {
			id: id.into(),
			label: Some(format!("Node {id}")),
			group: Some(group.into()),
		};
		let link = |s: &str, t: &str| GraphLink {
			source: s.into(),
			target: t.into(),
			value: Some(1u64.into()),
		};
		GraphData {
			nodes: vec![
				node("a", "Individual"),
				node("b", "Org"),
				node("c", "Org"),
				node("d", "Individual"),
				node("e", "Org"),
			],
			links: vec![link("a", "b"), link("c", "d"), link("d", "e")],
		}
	}

	fn state_with(config: SceneConfig) -> ForceGraphState {
		let scene = Scene::build(&data(), &config).unwrap();
		let mut state =
			ForceGraphState::new(scene, config, WIDTH, HEIGHT, |text| text.len() as f64 * 6.0);
		state.start();
		state
	}

	fn state() -> ForceGraphState {
		state_with(SceneConfig::default())
	}

	fn assert_invariants(state: &ForceGraphState) {
		let padding = state.config.padding;
		for p in &state.frame.nodes {
			assert!(p.x >= padding && p.x <= WIDTH - padding, "x out of bounds: {p:?}");
			assert!(p.y >= padding && p.y <= HEIGHT - padding, "y out of bounds: {p:?}");
		}
		for (i, anchor) in state.scene.anchors.iter().enumerate() {
			if LabelAnchor::role(i) == AnchorRole::Node {
				assert_eq!(state.frame.anchors[i], state.frame.nodes[anchor.node]);
			}
		}
	}

	#[test]
	fn nodes_stay_in_viewport_and_anchors_follow() {
		let mut state = state();
		assert_invariants(&state);
		for _ in 0..200 {
			state.tick(TICK_SECONDS);
			assert_invariants(&state);
		}
	}

	#[test]
	fn tiny_viewport_still_clamps() {
		let config = SceneConfig::default();
		let scene = Scene::build(&data(), &config).unwrap();
		let mut state = ForceGraphState::new(scene, config, 20.0, 20.0, |_| 10.0);
		state.start();
		for _ in 0..50 {
			state.tick(TICK_SECONDS);
			for p in &state.frame.nodes {
				assert!((6.0..=14.0).contains(&p.x) && (6.0..=14.0).contains(&p.y));
			}
		}
	}

	#[test]
	fn frame_lines_follow_bound_nodes() {
		let mut state = state();
		state.tick(TICK_SECONDS);
		let frame = &state.frame;
		assert_eq!(frame.links.len(), 3);
		assert_eq!(frame.links[1].from, frame.nodes[2]);
		assert_eq!(frame.links[1].to, frame.nodes[3]);
		assert_eq!(frame.anchor_links.len(), 5);
		assert_eq!(frame.anchor_links[4].from, frame.anchors[8]);
		assert_eq!(frame.labels.len(), 5);
		for label in &frame.labels {
			let width = state.scene.nodes[label.node].label.as_ref().unwrap().len() as f64 * 6.0;
			assert!(label.shift_x >= -width && label.shift_x <= 0.0);
			assert_eq!(label.shift_y, 10.0);
		}
	}

	#[test]
	fn label_anchors_stay_within_reach() {
		let mut state = state();
		for _ in 0..100 {
			state.tick(TICK_SECONDS);
		}
		for label in &state.frame.labels {
			let node = state.frame.nodes[label.node];
			let (dx, dy) = (label.at.x - node.x, label.at.y - node.y);
			assert!((dx * dx + dy * dy).sqrt() <= state.config.label_distance + 1e-3);
		}
	}

	#[test]
	fn drag_and_release_clears_pin() {
		let mut state = state();
		state.drag_start(1);
		assert!(state.pin_state(1).is_dragging());
		state.drag_move(1, 100.0, 100.0);
		assert_eq!(state.pin(1), Some((100.0, 100.0)));
		state.tick(TICK_SECONDS);
		assert_eq!(state.node_position(1), Some(Point { x: 100.0, y: 100.0 }));
		state.drag_end(1);
		assert_eq!(state.pin(1), None);
		assert_eq!(state.pin_state(1), PinState::Free);
		assert_eq!(state.dragged(), None);
	}

	#[test]
	fn pinned_drag_outside_viewport_is_clamped() {
		let mut state = state();
		state.drag_start(0);
		state.drag_move(0, -50.0, 1000.0);
		state.tick(TICK_SECONDS);
		assert_eq!(
			state.node_position(0),
			Some(Point {
				x: 6.0,
				y: HEIGHT - 6.0
			})
		);
	}

	#[test]
	fn keep_policy_pins_until_double_click() {
		let mut state = state_with(SceneConfig {
			release_policy: ReleasePolicy::OnDoubleClick,
			..SceneConfig::default()
		});
		state.drag_start(2);
		state.drag_move(2, 50.0, 60.0);
		state.drag_end(2);
		assert_eq!(state.pin(2), Some((50.0, 60.0)));
		for _ in 0..20 {
			state.tick(TICK_SECONDS);
		}
		assert_eq!(state.node_position(2), Some(Point { x: 50.0, y: 60.0 }));
		assert!(state.release(2));
		assert!(!state.release(2));
		assert_eq!(state.pin_state(2), PinState::Free);
	}

	#[test]
	fn drag_reheats_and_cools_both_simulations() {
		let mut state = state();
		while state.tick(TICK_SECONDS) {}
		assert!(!state.is_active());

		state.drag_start(0);
		assert!(state.is_active());
		for _ in 0..400 {
			assert!(state.tick(TICK_SECONDS));
		}
		let (nodes, labels) = state.alpha();
		assert!((nodes - 0.1).abs() < 0.01);
		assert!((labels - 0.1).abs() < 0.01);

		state.drag_end(0);
		let mut steps = 0;
		while state.tick(TICK_SECONDS) {
			steps += 1;
			assert!(steps < 1000);
		}
		assert!(!state.is_active());
	}

	#[test]
	fn hover_highlights_neighborhood() {
		let mut state = state();
		let (a, b, c) = (0, 1, 2);
		state.set_hover(Some(b));
		let scene = &state.scene;
		let dimmed = state.config.dimmed_opacity;
		assert_eq!(state.hover.node_opacity(&scene.adjacency, a, dimmed), 1.0);
		assert_eq!(state.hover.node_opacity(&scene.adjacency, b, dimmed), 1.0);
		for other in c..scene.nodes.len() {
			assert_eq!(state.hover.node_opacity(&scene.adjacency, other, dimmed), dimmed);
		}
		assert_eq!(state.hover.link_opacity(&scene.links[0], dimmed), 1.0);
		assert_eq!(state.hover.link_opacity(&scene.links[1], dimmed), dimmed);

		state.set_hover(None);
		for idx in 0..state.scene.nodes.len() {
			assert_eq!(
				state.hover.node_opacity(&state.scene.adjacency, idx, dimmed),
				1.0
			);
		}
	}

	#[test]
	fn pointer_events_drive_drag_and_hover() {
		let mut state = state();
		let target = state.node_position(3).unwrap();
		state.pointer_move(target.x, target.y);
		assert_eq!(state.hover.focus(), Some(3));
		state.pointer_down(target.x, target.y);
		assert_eq!(state.dragged(), Some(3));
		state.pointer_move(80.0, 90.0);
		assert_eq!(state.pin(3), Some((80.0, 90.0)));
		state.pointer_leave();
		assert_eq!(state.dragged(), None);
		assert_eq!(state.pin(3), None);
		assert_eq!(state.hover.focus(), None);
	}

	#[test]
	fn filtered_policy_only_labels_kept_groups() {
		let state = state_with(SceneConfig {
			label_policy: LabelPolicy::Filtered {
				excluded_groups: vec!["Individual".into()],
			},
			..SceneConfig::default()
		});
		let owners: Vec<usize> = state.frame.labels.iter().map(|l| l.node).collect();
		assert_eq!(owners, vec![1, 2, 4]);
	}

	#[test]
	fn stopped_scene_ignores_ticks() {
		let mut state = state();
		state.stop();
		let before = state.frame.nodes.clone();
		assert!(!state.tick(TICK_SECONDS));
		assert_eq!(state.frame.nodes, before);
		assert_eq!(state.lifecycle(), Lifecycle::Stopped);
		state.dispose();
	}
}
