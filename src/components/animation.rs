//! `requestAnimationFrame` driving shared by the canvas components.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use wasm_bindgen::prelude::*;

/// Milliseconds per logical simulation tick.
pub const TICK_MS: f64 = 1000.0 / 60.0;

/// Converts frame timestamps into whole fixed-size ticks.
///
/// The first frame yields one tick. Leftover time carries into the next
/// frame; anything beyond `max_steps` in one frame is dropped so a
/// backgrounded tab does not fast-forward on return.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
	step_ms: f64,
	max_steps: u32,
	last: Option<f64>,
	carry: f64,
}

impl Default for FixedTimestep {
	fn default() -> Self {
		Self::new(TICK_MS, 5)
	}
}

impl FixedTimestep {
	/// Creates an accumulator with the given step length and per-frame cap.
	pub fn new(step_ms: f64, max_steps: u32) -> Self {
		Self {
			step_ms,
			max_steps,
			last: None,
			carry: 0.0,
		}
	}

	/// Number of ticks to run for a frame stamped `now_ms`.
	pub fn ticks(&mut self, now_ms: f64) -> u32 {
		let Some(last) = self.last.replace(now_ms) else {
			return 1;
		};
		self.carry += (now_ms - last).max(0.0);
		let steps = (self.carry / self.step_ms).floor();
		if steps >= self.max_steps as f64 {
			self.carry = 0.0;
			return self.max_steps;
		}
		self.carry -= steps * self.step_ms;
		steps as u32
	}

	/// Forgets the previous timestamp, e.g. after the loop was paused.
	pub fn reset(&mut self) {
		self.last = None;
		self.carry = 0.0;
	}
}

/// A cancellable frame loop.
///
/// Clones share state. The handle only holds atomics so it can be captured by
/// Leptos cleanup hooks; the JS closure lives in the loop itself and is
/// dropped when the loop ends.
#[derive(Clone, Default)]
pub struct AnimationLoop {
	cancelled: Arc<AtomicBool>,
	running: Arc<AtomicBool>,
	frame_id: Arc<AtomicI32>,
}

impl AnimationLoop {
	/// An idle loop.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether a frame is scheduled.
	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::Relaxed)
	}

	/// Starts calling `frame` once per display frame until it returns
	/// `false` or the loop is cancelled. No-op if already running.
	pub fn start(&self, mut frame: impl FnMut(f64) -> bool + 'static) {
		if self.cancelled.load(Ordering::Relaxed) || self.running.swap(true, Ordering::Relaxed) {
			return;
		}
		let Some(window) = web_sys::window() else {
			self.running.store(false, Ordering::Relaxed);
			return;
		};

		let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
		let (slot_inner, this) = (slot.clone(), self.clone());
		*slot.borrow_mut() = Some(Closure::new(move |now: f64| {
			if this.cancelled.load(Ordering::Relaxed) || !frame(now) {
				this.running.store(false, Ordering::Relaxed);
				// drop our own closure to break the Rc cycle
				let _ = slot_inner.borrow_mut().take();
				return;
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), slot_inner.borrow().as_ref()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					this.frame_id.store(id, Ordering::Relaxed);
				}
			}
		}));

		if let Some(cb) = slot.borrow().as_ref() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.frame_id.store(id, Ordering::Relaxed),
				Err(_) => self.running.store(false, Ordering::Relaxed),
			}
		}
	}

	/// Stops the loop for good and cancels the pending frame.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Relaxed);
		if self.running.swap(false, Ordering::Relaxed) {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(self.frame_id.load(Ordering::Relaxed));
			}
		}
	}
}
