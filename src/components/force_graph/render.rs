use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::interaction::LabelVisibility;
use super::state::ForceGraphState;

/// Font used to draw and to measure labels.
pub const LABEL_FONT: &str = "10px sans-serif";
const LABEL_FONT_BOLD: &str = "bold 10px sans-serif";
const BACKGROUND: &str = "#1a1a2e";
const LINK_COLOR: &str = "rgba(153, 153, 153, 0.6)";
const ANCHOR_LINK_COLOR: &str = "rgba(255, 255, 255, 0.3)";

/// Width of `text` in the label font.
pub fn measure_label(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.set_font(LABEL_FONT);
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.viewport.width, state.viewport.height);
	draw_links(state, ctx);
	if state.config.show_anchor_links {
		draw_anchor_links(state, ctx);
	}
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.set_global_alpha(1.0);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let dimmed = state.config.dimmed_opacity;
	ctx.set_stroke_style_str(LINK_COLOR);
	for (link, segment) in state.scene.links.iter().zip(&state.frame.links) {
		ctx.set_global_alpha(state.hover.link_opacity(link, dimmed));
		ctx.set_line_width(link.stroke_width());
		ctx.begin_path();
		ctx.move_to(segment.from.x, segment.from.y);
		ctx.line_to(segment.to.x, segment.to.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_anchor_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(ANCHOR_LINK_COLOR);
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(2.0),
		&JsValue::from_f64(2.0),
	));
	for segment in &state.frame.anchor_links {
		ctx.begin_path();
		ctx.move_to(segment.from.x, segment.from.y);
		ctx.line_to(segment.to.x, segment.to.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (adjacency, dimmed) = (&state.scene.adjacency, state.config.dimmed_opacity);
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(1.5);

	for (idx, (node, pos)) in state.scene.nodes.iter().zip(&state.frame.nodes).enumerate() {
		ctx.set_global_alpha(state.hover.node_opacity(adjacency, idx, dimmed));
		ctx.begin_path();
		let _ = ctx.arc(pos.x, pos.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let adjacency = &state.scene.adjacency;
	ctx.set_fill_style_str("white");

	for placement in &state.frame.labels {
		let node = &state.scene.nodes[placement.node];
		let Some(label) = &node.label else {
			continue;
		};
		let visibility = state
			.hover
			.label_visibility(adjacency, placement.node, node.label_by_default);
		if visibility == LabelVisibility::Hidden {
			continue;
		}
		ctx.set_font(if state.hover.is_bold(placement.node) {
			LABEL_FONT_BOLD
		} else {
			LABEL_FONT
		});
		let _ = ctx.fill_text(
			label,
			placement.at.x + placement.shift_x,
			placement.at.y + placement.shift_y,
		);
	}
}
