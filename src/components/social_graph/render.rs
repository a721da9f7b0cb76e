use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::label::{self, RoleStyle};
use super::state::LayoutEngine;
use super::types::{Role, SimNode};

const BACKGROUND: &str = "#f9fafb";
const LINK_COLOR: &str = "#cccccc";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImageState {
	Loading,
	Loaded,
	Failed,
}

/// An avatar being fetched by the browser. Handlers are detached on drop so a
/// late load never calls into a freed closure.
struct Avatar {
	img: HtmlImageElement,
	state: Rc<Cell<ImageState>>,
	_onload: Closure<dyn FnMut()>,
	_onerror: Closure<dyn FnMut()>,
}

impl Avatar {
	fn load(url: &str) -> Option<Self> {
		let img = HtmlImageElement::new().ok()?;
		let state = Rc::new(Cell::new(ImageState::Loading));
		let (ok, err) = (state.clone(), state.clone());
		let onload = Closure::<dyn FnMut()>::new(move || ok.set(ImageState::Loaded));
		let src = url.to_owned();
		let onerror = Closure::<dyn FnMut()>::new(move || {
			debug!("avatar failed to load: {src}");
			err.set(ImageState::Failed);
		});
		img.set_onload(Some(onload.as_ref().unchecked_ref()));
		img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
		img.set_cross_origin(Some("anonymous"));
		img.set_src(url);
		Some(Self {
			img,
			state,
			_onload: onload,
			_onerror: onerror,
		})
	}

	fn ready(&self) -> Option<&HtmlImageElement> {
		(self.state.get() == ImageState::Loaded).then_some(&self.img)
	}

	fn failed(&self) -> bool {
		self.state.get() == ImageState::Failed
	}
}

impl Drop for Avatar {
	fn drop(&mut self) {
		self.img.set_onload(None);
		self.img.set_onerror(None);
	}
}

/// Per-node drawing resources, index-aligned with [`LayoutEngine::nodes`].
pub struct NodeArt {
	label: String,
	glyph: String,
	avatar: Option<Avatar>,
}

impl NodeArt {
	/// Still waiting on the avatar; the frame loop keeps drawing until it lands.
	pub fn is_loading(&self) -> bool {
		self.avatar
			.as_ref()
			.is_some_and(|a| a.state.get() == ImageState::Loading)
	}
}

/// Starts avatar loads and truncates labels once per layout.
pub fn prepare(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d) -> Vec<NodeArt> {
	engine
		.nodes()
		.iter()
		.map(|node| {
			let style = label::style_for(node.entity.role);
			ctx.set_font(style.label_font);
			let text = label::truncate_label(
				label::display_label(&node.entity),
				style.label_max_width,
				|s| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0),
			);
			NodeArt {
				label: text,
				glyph: label::fallback_glyph(node.entity.display_name.as_deref()),
				avatar: node
					.entity
					.avatar_url
					.as_deref()
					.filter(|u| !u.is_empty())
					.and_then(Avatar::load),
			}
		})
		.collect()
}

pub fn render(
	engine: &LayoutEngine,
	art: &[NodeArt],
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	if !engine.should_render() {
		return;
	}
	draw_links(engine, ctx);
	for (node, art) in engine.nodes().iter().zip(art) {
		draw_node(node, art, ctx);
	}
	draw_overflow(engine.overflow(), ctx, width, height);
}

fn draw_links(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d) {
	let nodes = engine.nodes();
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(1.5);
	ctx.begin_path();
	for link in engine.links() {
		let (a, b) = (nodes[link.source].position, nodes[link.target].position);
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
	}
	ctx.stroke();
}

fn draw_node(node: &SimNode, art: &NodeArt, ctx: &CanvasRenderingContext2d) {
	let style = label::style_for(node.entity.role);
	let (x, y) = (node.position.x, node.position.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, style.circle_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(style.stroke_width);
	ctx.stroke();

	match art.avatar.as_ref() {
		Some(avatar) => {
			if let Some(img) = avatar.ready() {
				draw_avatar(img, style, x, y, ctx);
			} else if avatar.failed() {
				draw_glyph(&art.glyph, node.entity.role, style, x, y, ctx);
			}
		}
		None => draw_glyph(&art.glyph, node.entity.role, style, x, y, ctx),
	}

	ctx.set_fill_style_str("#000");
	ctx.set_font(style.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	let _ = ctx.fill_text(&art.label, x, y + style.label_offset);
}

fn draw_avatar(img: &HtmlImageElement, style: &RoleStyle, x: f64, y: f64, ctx: &CanvasRenderingContext2d) {
	let r = style.avatar_radius;
	ctx.save();
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.clip();
	let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x - r, y - r, 2.0 * r, 2.0 * r);
	ctx.restore();
}

fn draw_glyph(
	glyph: &str,
	role: Role,
	style: &RoleStyle,
	x: f64,
	y: f64,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, style.avatar_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(match role {
		Role::Focal => label::FOCAL_STYLE.stroke,
		Role::Related => label::RELATED_STYLE.stroke,
	});
	ctx.fill();
	ctx.set_fill_style_str("white");
	ctx.set_font(style.glyph_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(glyph, x, y);
}

fn draw_overflow(overflow: usize, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	if overflow == 0 {
		return;
	}
	ctx.set_fill_style_str("#666");
	ctx.set_font("10px sans-serif");
	ctx.set_text_align("end");
	ctx.set_text_baseline("alphabetic");
	let _ = ctx.fill_text(&format!("+{overflow} more connections"), width - 10.0, height - 10.0);
}
