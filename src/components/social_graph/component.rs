use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::render::{self, NodeArt};
use super::state::LayoutEngine;
use super::types::{Entity, LayoutConfig};
use crate::components::animation::{AnimationLoop, FixedTimestep};

struct GraphSurface {
	engine: LayoutEngine,
	art: Vec<NodeArt>,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	timestep: FixedTimestep,
	drag_id: Option<String>,
}

impl GraphSurface {
	/// Advances and draws one display frame; returns whether another is
	/// needed.
	fn frame(&mut self, now: f64) -> bool {
		for _ in 0..self.timestep.ticks(now) {
			if self.engine.is_settled() {
				break;
			}
			self.engine.advance();
		}
		render::render(&self.engine, &self.art, &self.ctx, self.width, self.height);
		!self.engine.is_settled() || self.art.iter().any(NodeArt::is_loading)
	}

	fn press(&mut self, x: f64, y: f64) {
		self.release();
		if let Some(id) = self.engine.node_at(x, y).map(str::to_owned) {
			self.engine.begin_drag(&id);
			self.drag_id = Some(id);
		}
	}

	fn move_to(&mut self, x: f64, y: f64) {
		if let Some(id) = self.drag_id.as_deref() {
			self.engine.drag(id, x, y);
		}
	}

	fn release(&mut self) {
		if let Some(id) = self.drag_id.take() {
			self.engine.end_drag(&id);
		}
	}
}

type SharedSurface = Rc<RefCell<Option<GraphSurface>>>;

/// Keeps the frame loop alive while the layout is warm.
fn drive(anim: &AnimationLoop, surface: &SharedSurface) {
	if anim.is_running() {
		return;
	}
	if let Some(s) = surface.borrow_mut().as_mut() {
		s.timestep.reset();
	}
	let surface = surface.clone();
	anim.start(move |now| match surface.borrow_mut().as_mut() {
		Some(s) => s.frame(now),
		None => false,
	});
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x - rect.left(), client_y - rect.top())
}

/// Star-shaped social graph of `focal` and its `related` profiles.
///
/// Renders nothing when there are no related profiles. Nodes can be dragged;
/// the focal node springs back to the center on release.
#[component]
pub fn SocialGraphCanvas(
	#[prop(into)] focal: Signal<Entity>,
	#[prop(into)] related: Signal<Vec<Entity>>,
	#[prop(default = 250.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedSurface = Rc::new(RefCell::new(None));
	let current_loop: Rc<RefCell<AnimationLoop>> = Rc::new(RefCell::new(AnimationLoop::new()));
	let (state_init, loop_init) = (state.clone(), current_loop.clone());

	Effect::new(move |_| {
		let (focal, related) = (focal.get(), related.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// A fresh loop per input set; the previous one is cancelled by its cleanup.
		let anim = AnimationLoop::new();
		on_cleanup({
			let anim = anim.clone();
			move || anim.cancel()
		});
		*loop_init.borrow_mut() = anim.clone();

		let width = canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(300.0);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};

		let engine = match LayoutEngine::new(focal, related, LayoutConfig::sized(width, height)) {
			Ok(engine) => engine,
			Err(e) => {
				error!("social graph layout rejected: {e}");
				*state_init.borrow_mut() = None;
				return;
			}
		};
		if !engine.should_render() {
			warn!("social graph has no related profiles, skipping");
		}
		let art = render::prepare(&engine, &ctx);
		*state_init.borrow_mut() = Some(GraphSurface {
			engine,
			art,
			ctx,
			width,
			height,
			timestep: FixedTimestep::default(),
			drag_id: None,
		});
		drive(&anim, &state_init);
	});

	let (state_md, loop_md) = (state.clone(), current_loop.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if let Some(s) = state_md.borrow_mut().as_mut() {
			s.press(x, y);
		}
		drive(&loop_md.borrow(), &state_md);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if let Some(s) = state_mm.borrow_mut().as_mut() {
			s.move_to(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(s) = state_mu.borrow_mut().as_mut() {
			s.release();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.release();
		}
	};

	let (state_ts, loop_ts) = (state.clone(), current_loop.clone());
	let on_touchstart = move |ev: TouchEvent| {
		let (Some(canvas), Some(touch)) = (canvas_ref.get(), ev.touches().get(0)) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, touch.client_x() as f64, touch.client_y() as f64);
		if let Some(s) = state_ts.borrow_mut().as_mut() {
			s.press(x, y);
			if s.drag_id.is_some() {
				ev.prevent_default();
			}
		}
		drive(&loop_ts.borrow(), &state_ts);
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let (Some(canvas), Some(touch)) = (canvas_ref.get(), ev.touches().get(0)) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, touch.client_x() as f64, touch.client_y() as f64);
		if let Some(s) = state_tm.borrow_mut().as_mut() {
			if s.drag_id.is_some() {
				ev.prevent_default();
				s.move_to(x, y);
			}
		}
	};

	let state_te = state.clone();
	let on_touchend = move |_: TouchEvent| {
		if let Some(s) = state_te.borrow_mut().as_mut() {
			s.release();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="social-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; width: 100%; cursor: grab; touch-action: none;"
		/>
	}
}
