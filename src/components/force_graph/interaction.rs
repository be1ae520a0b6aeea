//! Pin, drag and hover state.

use super::adjacency::AdjacencyIndex;
use super::config::ReleasePolicy;
use super::types::SceneLink;

/// Pin state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PinState {
	/// Physics controls the node.
	#[default]
	Free,
	/// Held under the pointer.
	Dragging {
		/// Pinned x.
		fx: f64,
		/// Pinned y.
		fy: f64,
	},
	/// Left in place after a drag; waits for a double-click.
	Pinned {
		/// Pinned x.
		fx: f64,
		/// Pinned y.
		fy: f64,
	},
}

/// Pointer gestures on a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
	/// Pointer pressed on the node, which currently sits at `(x, y)`.
	Start {
		/// Node x at press time.
		x: f64,
		/// Node y at press time.
		y: f64,
	},
	/// Pointer moved to `(x, y)`.
	Move {
		/// Pointer x.
		x: f64,
		/// Pointer y.
		y: f64,
	},
	/// Pointer released.
	End,
}

impl PinState {
	/// The fixed coordinates, if any.
	pub fn fixed(&self) -> Option<(f64, f64)> {
		match *self {
			Self::Free => None,
			Self::Dragging { fx, fy } | Self::Pinned { fx, fy } => Some((fx, fy)),
		}
	}

	/// Whether a gesture currently holds the node.
	pub fn is_dragging(&self) -> bool {
		matches!(self, Self::Dragging { .. })
	}

	/// Next state after `event`.
	pub fn apply(self, event: DragEvent, policy: ReleasePolicy) -> Self {
		match (self, event) {
			(_, DragEvent::Start { x, y }) => Self::Dragging { fx: x, fy: y },
			(Self::Dragging { .. }, DragEvent::Move { x, y }) => Self::Dragging { fx: x, fy: y },
			(Self::Dragging { fx, fy }, DragEvent::End) => match policy {
				ReleasePolicy::OnDragEnd => Self::Free,
				ReleasePolicy::OnDoubleClick => Self::Pinned { fx, fy },
			},
			(state, _) => state,
		}
	}

	/// Double-click: unpin a pinned node.
	pub fn release(self) -> Self {
		match self {
			Self::Pinned { .. } => Self::Free,
			state => state,
		}
	}
}

/// Counts concurrent drag gestures so only the first reheats and the last
/// cools.
#[derive(Clone, Debug, Default)]
pub struct DragTracker {
	active: usize,
}

impl DragTracker {
	/// A gesture began. True if none was active before.
	pub fn begin(&mut self) -> bool {
		self.active += 1;
		self.active == 1
	}

	/// A gesture ended. True if none is active anymore.
	pub fn end(&mut self) -> bool {
		self.active = self.active.saturating_sub(1);
		self.active == 0
	}

	/// Gestures in progress.
	pub fn active(&self) -> usize {
		self.active
	}
}

/// Whether a label is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelVisibility {
	/// Drawn.
	Visible,
	/// Skipped.
	Hidden,
}

/// Hover focus and the opacity rules derived from it.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	focus: Option<usize>,
}

impl Highlight {
	/// The hovered node.
	pub fn focus(&self) -> Option<usize> {
		self.focus
	}

	/// Change the hovered node. Returns whether anything changed.
	pub fn set(&mut self, node: Option<usize>) -> bool {
		if self.focus == node {
			return false;
		}
		self.focus = node;
		true
	}

	/// Full opacity inside the hovered neighborhood, `dimmed` outside.
	pub fn node_opacity(&self, adjacency: &AdjacencyIndex, node: usize, dimmed: f64) -> f64 {
		match self.focus {
			Some(focus) if !adjacency.is_connected(focus, node) => dimmed,
			_ => 1.0,
		}
	}

	/// Full opacity for links touching the hovered node, `dimmed` otherwise.
	pub fn link_opacity(&self, link: &SceneLink, dimmed: f64) -> f64 {
		match self.focus {
			Some(focus) if !link.touches(focus) => dimmed,
			_ => 1.0,
		}
	}

	/// Hovering shows exactly the neighborhood's labels; otherwise the
	/// policy default applies.
	pub fn label_visibility(
		&self,
		adjacency: &AdjacencyIndex,
		node: usize,
		by_default: bool,
	) -> LabelVisibility {
		let visible = match self.focus {
			Some(focus) => adjacency.is_connected(focus, node),
			None => by_default,
		};
		if visible {
			LabelVisibility::Visible
		} else {
			LabelVisibility::Hidden
		}
	}

	/// Only the hovered node's own label is bold.
	pub fn is_bold(&self, node: usize) -> bool {
		self.focus == Some(node)
	}
}
