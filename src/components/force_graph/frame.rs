//! Per-step geometry: viewport clamping, label offsets and line endpoints.

use super::scene::Scene;

/// A position in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl From<(f64, f64)> for Point {
	fn from((x, y): (f64, f64)) -> Self {
		Self { x, y }
	}
}

/// A line between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Segment {
	/// Start, the link source.
	pub from: Point,
	/// End, the link target.
	pub to: Point,
}

/// Where a label's text goes this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
	/// Owning node index.
	pub node: usize,
	/// Position of the label anchor.
	pub at: Point,
	/// Horizontal text offset, in `[-text width, 0]`.
	pub shift_x: f64,
	/// Vertical text offset.
	pub shift_y: f64,
}

/// The drawable area nodes are kept inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Canvas width.
	pub width: f64,
	/// Canvas height.
	pub height: f64,
	/// Margin kept free along every edge.
	pub padding: f64,
}

impl Viewport {
	/// Clamp a position into `[padding, extent - padding]` on both axes.
	pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		(
			clamp_axis(x, self.padding, self.width),
			clamp_axis(y, self.padding, self.height),
		)
	}

	/// Whether a position satisfies the clamp bounds.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		self.clamp(x, y) == (x, y)
	}
}

/// When the padding leaves no room the midpoint is the only valid spot.
fn clamp_axis(value: f64, padding: f64, extent: f64) -> f64 {
	let (lo, hi) = (padding, extent - padding);
	if hi < lo {
		return extent / 2.0;
	}
	// `max` discards NaN, so a broken coordinate lands on the low edge
	value.max(lo).min(hi)
}

/// Horizontal shift of a label of `width` whose anchor sits at `(dx, dy)`
/// from its node.
///
/// Zero when the label is straight to the right of the node, `-width` when it
/// is straight to the left, so the text never covers the node marker.
/// Coincident anchors have no direction; the text is centered.
pub fn label_shift(dx: f64, dy: f64, width: f64) -> f64 {
	let width = width.max(0.0);
	let dist = (dx * dx + dy * dy).sqrt();
	if !(dist > f64::EPSILON) || !dist.is_finite() {
		return -width / 2.0;
	}
	(width * (dx - dist) / (dist * 2.0)).clamp(-width, 0.0)
}

/// Pull `label` back onto the circle of radius `max` around `anchor` when it
/// has drifted further than that.
pub fn tether(anchor: Point, label: Point, max: f64) -> Point {
	let (dx, dy) = (label.x - anchor.x, label.y - anchor.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if !(dist > max) || !dist.is_finite() {
		return label;
	}
	let scale = max / dist;
	Point {
		x: anchor.x + dx * scale,
		y: anchor.y + dy * scale,
	}
}

/// Everything the renderer reads, recomputed once per step.
#[derive(Clone, Debug, Default)]
pub struct Frame {
	/// Node positions, clamped.
	pub nodes: Vec<Point>,
	/// Label-anchor positions.
	pub anchors: Vec<Point>,
	/// One segment per scene link.
	pub links: Vec<Segment>,
	/// One segment per anchor link.
	pub anchor_links: Vec<Segment>,
	/// One placement per anchor pair.
	pub labels: Vec<LabelPlacement>,
}

impl Frame {
	/// Derive segments and label placements from current positions.
	///
	/// `label_widths` holds the measured text width of each anchor pair.
	pub fn build(
		scene: &Scene,
		nodes: Vec<Point>,
		anchors: Vec<Point>,
		label_widths: &[f64],
		label_offset_y: f64,
	) -> Self {
		let point = |points: &[Point], i: usize| points.get(i).copied().unwrap_or_default();

		let links = scene
			.links
			.iter()
			.map(|link| Segment {
				from: point(&nodes, link.source),
				to: point(&nodes, link.target),
			})
			.collect();

		let anchor_links = scene
			.anchor_links
			.iter()
			.map(|link| Segment {
				from: point(&anchors, link.source),
				to: point(&anchors, link.target),
			})
			.collect();

		let labels = scene
			.anchors
			.chunks_exact(2)
			.enumerate()
			.map(|(k, pair)| {
				let (base, at) = (point(&anchors, 2 * k), point(&anchors, 2 * k + 1));
				let width = label_widths.get(k).copied().unwrap_or(0.0);
				LabelPlacement {
					node: pair[1].node,
					at,
					shift_x: label_shift(at.x - base.x, at.y - base.y, width),
					shift_y: label_offset_y,
				}
			})
			.collect();

		Self {
			nodes,
			anchors,
			links,
			anchor_links,
			labels,
		}
	}
}
