//! Alpha-scheduled wrapper around a `force_graph` particle system.
//!
//! The engine integrates springs, and repulsion when it has no range limit.
//! This layer adds what the scene needs on top: an energy value that decays
//! toward a target and parks the system once it drops below a threshold,
//! repulsion cut off at a maximum distance, a centering pull, and
//! slot-addressed access to particle positions.

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::config::{ForceParams, SimulationConfig};

/// A particle system whose particles are addressed by insertion slot.
pub struct Simulation {
	graph: ForceGraph<usize, ()>,
	indices: Vec<DefaultNodeIdx>,
	springs: Vec<(usize, usize)>,
	forces: ForceParams,
	centering: Option<f64>,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	alpha_min: f64,
	alpha_decay: f64,
	running: bool,
}

impl Simulation {
	/// Empty system centered on a `width` x `height` viewport.
	pub fn new(config: &SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			graph: ForceGraph::new(config.forces.parameters()),
			indices: Vec::new(),
			springs: Vec::new(),
			forces: config.forces.clone(),
			centering: config.centering,
			center: (width / 2.0, height / 2.0),
			alpha: config.alpha.initial,
			alpha_target: 0.0,
			alpha_min: config.alpha.min,
			alpha_decay: config.alpha.decay,
			running: false,
		}
	}

	/// Add a particle and return its slot.
	pub fn add_particle(&mut self, x: f64, y: f64, fixed: bool) -> usize {
		let slot = self.indices.len();
		let idx = self.graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: self.forces.mass,
			is_anchor: fixed,
			user_data: slot,
		});
		self.indices.push(idx);
		slot
	}

	/// Spring between two slots. Unknown slots are ignored.
	pub fn add_spring(&mut self, a: usize, b: usize) {
		if let (Some(&src), Some(&tgt)) = (self.indices.get(a), self.indices.get(b)) {
			self.graph.add_edge(src, tgt, EdgeData::default());
			self.springs.push((a, b));
		}
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.indices.len()
	}

	/// No particles.
	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy the system is converging to.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Whether `step` still moves particles.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Change the energy the system converges to.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resume stepping. Alpha is left where it is.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Stop stepping.
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Advance one timestep. Returns false when the system is idle.
	pub fn step(&mut self, dt: f32) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		if self.alpha < self.alpha_min {
			self.running = false;
			return false;
		}
		let dt = dt * self.alpha as f32;
		self.graph.update(dt);
		if let Some(max_distance) = self.forces.max_distance {
			self.repel_within(max_distance, dt);
		}
		if let Some(strength) = self.centering {
			self.pull_to_center(strength);
		}
		true
	}

	/// Inverse-square repulsion between particles closer than
	/// `max_distance`, applied to free particles as a displacement the size of
	/// the drift the engine settles at under a constant force.
	fn repel_within(&mut self, max_distance: f32, dt: f32) {
		let mut points = vec![(0.0_f32, 0.0_f32); self.len()];
		self.graph.visit_nodes(|node| {
			if let Some(p) = points.get_mut(node.data.user_data) {
				*p = (node.x(), node.y());
			}
		});

		let f = &self.forces;
		let scale = dt * dt * dt * f.node_speed * f.damping / (1.0 - f.damping).max(1e-3);
		let cap = |v: f32| v.clamp(-f.max_force, f.max_force);
		let mut shift = vec![(0.0_f32, 0.0_f32); points.len()];
		for (i, &(x1, y1)) in points.iter().enumerate() {
			for (j, &(x2, y2)) in points.iter().enumerate().skip(i + 1) {
				let (dx, dy) = (x2 - x1, y2 - y1);
				let distance = (dx * dx + dy * dy).sqrt();
				if distance == 0.0 || distance > max_distance {
					continue;
				}
				let strength = -f.charge * f.mass * f.mass / (distance * distance);
				let fx = cap(dx / distance * strength) * scale;
				let fy = cap(dy / distance * strength) * scale;
				shift[i].0 += fx;
				shift[i].1 += fy;
				shift[j].0 -= fx;
				shift[j].1 -= fy;
			}
		}

		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(sx, sy)) = shift.get(node.data.user_data) {
				node.data.x += sx;
				node.data.y += sy;
			}
		});
	}

	/// Shift free particles so the centroid moves toward the center.
	fn pull_to_center(&mut self, strength: f64) {
		if self.is_empty() {
			return;
		}
		let (mut sx, mut sy) = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			sx += node.x() as f64;
			sy += node.y() as f64;
		});
		let n = self.len() as f64;
		let (dx, dy) = (
			((self.center.0 - sx / n) * strength) as f32,
			((self.center.1 - sy / n) * strength) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}

	/// Positions indexed by slot.
	pub fn positions(&self) -> Vec<(f64, f64)> {
		let mut out = vec![(0.0, 0.0); self.len()];
		self.graph.visit_nodes(|node| {
			if let Some(pos) = out.get_mut(node.data.user_data) {
				*pos = (node.x() as f64, node.y() as f64);
			}
		});
		out
	}

	/// Position of one slot.
	pub fn position(&self, slot: usize) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data == slot {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Move one slot.
	pub fn set_position(&mut self, slot: usize, x: f64, y: f64) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == slot {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
	}

	/// Exclude one slot from integration, or hand it back at rest.
	pub fn set_fixed(&mut self, slot: usize, fixed: bool) {
		if !fixed && self.is_fixed(slot) {
			self.reinsert(slot);
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data == slot {
				node.data.is_anchor = fixed;
			}
		});
	}

	/// The engine keeps accumulating spring forces on fixed particles without
	/// ever integrating them. Re-adding the particle drops that backlog.
	fn reinsert(&mut self, slot: usize) {
		let (Some(&idx), Some((x, y))) = (self.indices.get(slot), self.position(slot)) else {
			return;
		};
		self.graph.remove_node(idx);
		self.indices[slot] = self.graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: self.forces.mass,
			is_anchor: false,
			user_data: slot,
		});
		for &(a, b) in self.springs.iter().filter(|(a, b)| *a == slot || *b == slot) {
			if let (Some(&src), Some(&tgt)) = (self.indices.get(a), self.indices.get(b)) {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
	}

	/// Whether one slot is excluded from integration.
	pub fn is_fixed(&self, slot: usize) -> bool {
		let mut fixed = false;
		self.graph.visit_nodes(|node| {
			if node.data.user_data == slot {
				fixed = node.data.is_anchor;
			}
		});
		fixed
	}

	/// Rewrite every position in one pass.
	pub fn update_positions<F>(&mut self, mut f: F)
	where
		F: FnMut(usize, &mut f64, &mut f64),
	{
		self.graph.visit_nodes_mut(|node| {
			let (mut x, mut y) = (node.data.x as f64, node.data.y as f64);
			f(node.data.user_data, &mut x, &mut y);
			node.data.x = x as f32;
			node.data.y = y as f32;
		});
	}
}
