use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::GameSimulation;
use super::types::{GameConfig, Phase, TickOutcome};
use crate::components::animation::{AnimationLoop, FixedTimestep};

struct GameSurface {
	sim: GameSimulation,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	timestep: FixedTimestep,
}

impl GameSurface {
	fn draw(&self) {
		let snap = self.sim.snapshot();
		let (w, h) = (snap.canvas_width as u32, snap.canvas_height as u32);
		if self.canvas.width() != w || self.canvas.height() != h {
			self.canvas.set_width(w);
			self.canvas.set_height(h);
		}
		render::render(&snap, &self.ctx);
	}

	/// Runs the ticks owed for this frame, then draws. Returns whether the
	/// loop should keep going.
	fn frame(&mut self, now: f64) -> bool {
		for _ in 0..self.timestep.ticks(now) {
			if self.sim.advance() != TickOutcome::Continue {
				break;
			}
		}
		self.draw();
		self.sim.phase() == Phase::Running
	}
}

type SharedGame = Rc<RefCell<Option<GameSurface>>>;

fn viewport() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn session_seed() -> u64 {
	(js_sys::Date::now() as u64) ^ ((js_sys::Math::random() * u32::MAX as f64) as u64)
}

fn run(anim: &AnimationLoop, game: &SharedGame) {
	if anim.is_running() {
		return;
	}
	if let Some(g) = game.borrow_mut().as_mut() {
		g.timestep.reset();
	}
	let game = game.clone();
	anim.start(move |now| match game.borrow_mut().as_mut() {
		Some(g) => g.frame(now),
		None => false,
	});
}

/// Full-viewport Flappy Bird. A click or tap starts, flaps and restarts.
#[component]
pub fn FlappyCanvas() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let game: SharedGame = Rc::new(RefCell::new(None));
	let anim = AnimationLoop::new();
	on_cleanup({
		let anim = anim.clone();
		move || anim.cancel()
	});

	let game_init = game.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};

		let (w, h) = viewport().unwrap_or((350.0, 600.0));
		let config = GameConfig {
			canvas_width: w,
			canvas_height: h,
			..GameConfig::default()
		};
		let sim = match GameSimulation::with_seed(config, session_seed()) {
			Ok(sim) => sim,
			Err(e) => {
				warn!("viewport {w}x{h} rejected ({e}), using default canvas");
				match GameSimulation::with_seed(GameConfig::default(), session_seed()) {
					Ok(sim) => sim,
					Err(e) => {
						error!("default game config rejected: {e}");
						return;
					}
				}
			}
		};
		let surface = GameSurface {
			sim,
			canvas,
			ctx,
			timestep: FixedTimestep::default(),
		};
		surface.draw();
		*game_init.borrow_mut() = Some(surface);
	});

	let game_rs = game.clone();
	let resize = window_event_listener(ev::resize, move |_| {
		let Some((w, h)) = viewport() else {
			return;
		};
		if let Some(g) = game_rs.borrow_mut().as_mut() {
			match g.sim.resize(w, h) {
				Ok(()) => {
					if g.sim.phase() != Phase::Running {
						g.draw();
					}
				}
				Err(e) => warn!("ignoring resize to {w}x{h}: {e}"),
			}
		}
	});
	on_cleanup(move || resize.remove());

	let (game_click, anim_click) = (game.clone(), anim.clone());
	let on_click = move |_: MouseEvent| {
		let running = match game_click.borrow_mut().as_mut() {
			Some(g) => {
				g.sim.apply_input();
				g.draw();
				g.sim.phase() == Phase::Running
			}
			None => false,
		};
		if running {
			run(&anim_click, &game_click);
		}
	};

	view! {
		<div class="flappy-container">
			<canvas
				node_ref=canvas_ref
				class="flappy-canvas"
				on:click=on_click
				style="display: block; width: 100%; height: 100%; touch-action: manipulation;"
			/>
		</div>
	}
}
