//! Scene elements.

/// A node marker, bound to its slot in the primary simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	/// Id from the artifact.
	pub id: String,
	/// Label text, if any.
	pub label: Option<String>,
	/// Display group.
	pub group: Option<String>,
	/// Fill color from the group palette.
	pub color: String,
	/// Marker radius from the group table.
	pub radius: f64,
	/// Index `k` of the anchor pair `(2k, 2k + 1)` carrying this node's label.
	pub label_pair: Option<usize>,
	/// Whether the label shows when nothing is hovered.
	pub label_by_default: bool,
}

/// A link with both ends resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLink {
	/// Source node index.
	pub source: usize,
	/// Target node index.
	pub target: usize,
	/// Link value, if present.
	pub value: Option<f64>,
}

impl SceneLink {
	/// Line width, `sqrt(value)`.
	pub fn stroke_width(&self) -> f64 {
		self.value.map_or(1.0, |v| v.max(0.0).sqrt())
	}

	/// Whether `node` is one of the ends.
	pub fn touches(&self, node: usize) -> bool {
		self.source == node || self.target == node
	}
}

/// Parity of an anchor inside its pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRole {
	/// Even index, glued to the node.
	Node,
	/// Odd index, floats and carries the text.
	Label,
}

/// A particle of the label simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelAnchor {
	/// Owning node index.
	pub node: usize,
}

impl LabelAnchor {
	/// Role of the anchor at `index`.
	pub fn role(index: usize) -> AnchorRole {
		if index % 2 == 0 {
			AnchorRole::Node
		} else {
			AnchorRole::Label
		}
	}
}

/// Binds anchor `2k` to `2k + 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelAnchorLink {
	/// Node anchor index.
	pub source: usize,
	/// Label anchor index.
	pub target: usize,
	/// Link weight.
	pub weight: f64,
}
