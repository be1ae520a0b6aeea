//! Scene tunables: forces, styling and interaction policies.

use std::collections::HashMap;

use force_graph::SimulationParameters;

/// d3's `schemeCategory10`.
pub const CATEGORY10: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Group that gets the small marker and no default label.
pub const INDIVIDUAL_GROUP: &str = "Individual";

/// What happens to a node's pin when the user lets go of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
	/// Clear the pin immediately; physics takes over again.
	#[default]
	OnDragEnd,
	/// Keep the node pinned until it is double-clicked.
	OnDoubleClick,
}

/// Which nodes carry a floating label.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelPolicy {
	/// Every labelled node gets an anchor pair. Text for `hidden_groups` only
	/// shows up while a hover highlights it.
	AllNodes {
		/// Groups whose text is hidden outside of a highlight.
		hidden_groups: Vec<String>,
	},
	/// Nodes in `excluded_groups` get no anchors and never show text.
	Filtered {
		/// Groups without labels.
		excluded_groups: Vec<String>,
	},
}

impl Default for LabelPolicy {
	fn default() -> Self {
		Self::AllNodes {
			hidden_groups: vec![INDIVIDUAL_GROUP.into()],
		}
	}
}

impl LabelPolicy {
	/// Whether a node of `group` gets a label-anchor pair.
	pub fn has_anchors(&self, group: Option<&str>) -> bool {
		match self {
			Self::AllNodes { .. } => true,
			Self::Filtered { excluded_groups } => !contains(excluded_groups, group),
		}
	}

	/// Whether the label of a node of `group` is shown when nothing is hovered.
	pub fn visible_by_default(&self, group: Option<&str>) -> bool {
		match self {
			Self::AllNodes { hidden_groups } => !contains(hidden_groups, group),
			Self::Filtered { .. } => true,
		}
	}
}

fn contains(groups: &[String], group: Option<&str>) -> bool {
	group.is_some_and(|g| groups.iter().any(|candidate| candidate == g))
}

/// Per-group marker styling.
#[derive(Clone, Debug)]
pub struct GroupStyles {
	/// Marker radius by group name.
	pub radii: HashMap<String, f64>,
	/// Radius for groups missing from `radii`, including ungrouped nodes.
	pub default_radius: f64,
	/// Ordinal palette, assigned to groups in first-seen order.
	pub palette: Vec<String>,
}

impl Default for GroupStyles {
	fn default() -> Self {
		Self {
			radii: HashMap::from([(INDIVIDUAL_GROUP.to_string(), 4.0)]),
			default_radius: 7.0,
			palette: CATEGORY10.iter().map(|c| c.to_string()).collect(),
		}
	}
}

impl GroupStyles {
	/// Marker radius for a node of `group`.
	pub fn radius(&self, group: Option<&str>) -> f64 {
		group
			.and_then(|g| self.radii.get(g))
			.copied()
			.unwrap_or(self.default_radius)
	}
}

/// Knobs handed to the `force_graph` engine.
#[derive(Clone, Debug)]
pub struct ForceParams {
	/// Pairwise repulsion strength.
	pub charge: f32,
	/// Link attraction strength.
	pub spring: f32,
	/// Cap on the force between any pair of particles.
	pub max_force: f32,
	/// Pairs further apart than this do not repel. `None` leaves repulsion
	/// to the engine, which has no range limit.
	pub max_distance: Option<f32>,
	/// Velocity scale.
	pub node_speed: f32,
	/// Per-step velocity damping.
	pub damping: f32,
	/// Particle mass.
	pub mass: f32,
}

impl ForceParams {
	/// Engine parameters. With a range limit the engine's own repulsion is
	/// switched off and applied by [`Simulation`](super::simulation::Simulation)
	/// instead.
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: match self.max_distance {
				Some(_) => 0.0,
				None => self.charge,
			},
			force_spring: self.spring,
			force_max: self.max_force,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}

/// Alpha (energy) schedule, same shape as d3's.
#[derive(Clone, Debug)]
pub struct AlphaConfig {
	/// Alpha at construction.
	pub initial: f64,
	/// Below this the simulation goes idle.
	pub min: f64,
	/// Fraction of the distance to the target covered per step.
	pub decay: f64,
	/// Target while a drag is in progress.
	pub reheat_target: f64,
}

impl Default for AlphaConfig {
	fn default() -> Self {
		Self {
			initial: 1.0,
			min: 0.001,
			// reaches `min` from 1.0 in 300 steps
			decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			reheat_target: 0.1,
		}
	}
}

/// One particle system.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Engine forces.
	pub forces: ForceParams,
	/// Strength of the pull of the centroid toward the viewport center.
	pub centering: Option<f64>,
	/// Energy schedule.
	pub alpha: AlphaConfig,
}

impl SimulationConfig {
	/// Defaults for the node/link system.
	pub fn primary() -> Self {
		Self {
			forces: ForceParams {
				charge: 150.0,
				spring: 0.05,
				max_force: 100.0,
				max_distance: Some(150.0),
				node_speed: 3000.0,
				damping: 0.9,
				mass: 10.0,
			},
			centering: Some(1.0),
			alpha: AlphaConfig::default(),
		}
	}

	/// Defaults for the label-anchor system: weaker, shorter range, stiff links.
	pub fn labels() -> Self {
		Self {
			forces: ForceParams {
				charge: 20.0,
				spring: 0.5,
				max_force: 30.0,
				max_distance: Some(50.0),
				node_speed: 3000.0,
				damping: 0.8,
				mass: 1.0,
			},
			centering: None,
			alpha: AlphaConfig::default(),
		}
	}
}

/// Everything tunable about a scene.
#[derive(Clone, Debug)]
pub struct SceneConfig {
	/// Minimum distance between a node and the viewport edge.
	pub padding: f64,
	/// Opacity of elements outside the hovered neighborhood.
	pub dimmed_opacity: f64,
	/// Vertical offset of label text below its anchor.
	pub label_offset_y: f64,
	/// Furthest a label anchor may drift from its node.
	pub label_distance: f64,
	/// Extra hit-test radius around node markers.
	pub hit_slop: f64,
	/// Draw the anchor links (normally invisible).
	pub show_anchor_links: bool,
	/// Which nodes get labels.
	pub label_policy: LabelPolicy,
	/// Pin behavior on drag end.
	pub release_policy: ReleasePolicy,
	/// Colors and radii.
	pub styles: GroupStyles,
	/// Node/link system.
	pub primary: SimulationConfig,
	/// Label-anchor system.
	pub labels: SimulationConfig,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			padding: 6.0,
			dimmed_opacity: 0.1,
			label_offset_y: 10.0,
			label_distance: 30.0,
			hit_slop: 4.0,
			show_anchor_links: false,
			label_policy: LabelPolicy::default(),
			release_policy: ReleasePolicy::default(),
			styles: GroupStyles::default(),
			primary: SimulationConfig::primary(),
			labels: SimulationConfig::labels(),
		}
	}
}
