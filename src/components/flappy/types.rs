use thiserror::Error;

/// Lowest allowed gap top.
pub const GAP_TOP_MARGIN: f64 = 20.0;
/// Room kept free under the lowest possible gap.
pub const GAP_BOTTOM_MARGIN: f64 = 80.0;

/// The player's bird. Its horizontal position is the fixed
/// [`GameConfig::slot_x`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
	/// Vertical center.
	pub y: f64,
	/// Vertical velocity; negative is up.
	pub velocity: f64,
	/// Bounding box width.
	pub width: f64,
	/// Bounding box height.
	pub height: f64,
}

impl Body {
	/// Top edge of the bounding box.
	pub fn top(&self) -> f64 {
		self.y - self.height / 2.0
	}

	/// Bottom edge of the bounding box.
	pub fn bottom(&self) -> f64 {
		self.y + self.height / 2.0
	}
}

/// A pipe pair with a passable gap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
	/// Left edge.
	pub x: f64,
	/// Height of the upper pipe.
	pub gap_top: f64,
	/// Height of the lower pipe.
	pub gap_bottom: f64,
	/// Pipe width.
	pub width: f64,
	/// Vertical size of the gap.
	pub gap_size: f64,
	/// Set once the trailing edge has passed the bird.
	pub scored: bool,
}

impl Obstacle {
	/// Right edge.
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	/// Bottom edge of the gap.
	pub fn gap_end(&self) -> f64 {
		self.gap_top + self.gap_size
	}

	/// Whether the vertical span `[top, bottom]` lies inside the gap.
	/// Touching a gap edge is not a collision.
	pub fn gap_contains(&self, top: f64, bottom: f64) -> bool {
		top >= self.gap_top && bottom <= self.gap_end()
	}
}

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	/// Waiting for the first tap.
	#[default]
	NotStarted,
	/// Ticking.
	Running,
	/// Crashed; the next tap restarts.
	GameOver,
}

/// What a tick decided about scheduling the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Keep ticking.
	Continue,
	/// The bird crashed this tick; stop the loop.
	GameOver,
	/// Not running; nothing happened.
	Idle,
}

/// Physics constants and canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
	/// Canvas width.
	pub canvas_width: f64,
	/// Canvas height.
	pub canvas_height: f64,
	/// Added to the velocity every tick.
	pub gravity: f64,
	/// Velocity set by a flap; negative is up.
	pub jump_impulse: f64,
	/// Leftward obstacle speed per tick.
	pub obstacle_speed: f64,
	/// Ticks between spawns.
	pub spawn_interval: u32,
	/// Obstacle width.
	pub obstacle_width: f64,
	/// Vertical gap size.
	pub gap_size: f64,
	/// Fixed horizontal center of the bird.
	pub slot_x: f64,
	/// Bird bounding box width.
	pub body_width: f64,
	/// Bird bounding box height.
	pub body_height: f64,
}

impl Default for GameConfig {
	fn default() -> Self {
		Self {
			canvas_width: 350.0,
			canvas_height: 600.0,
			gravity: 0.5,
			jump_impulse: -8.0,
			obstacle_speed: 2.0,
			spawn_interval: 120,
			obstacle_width: 50.0,
			gap_size: 150.0,
			slot_x: 50.0,
			body_width: 30.0,
			body_height: 24.0,
		}
	}
}

impl GameConfig {
	/// Vertical position the bird starts a run at.
	pub fn start_y(&self) -> f64 {
		self.canvas_height / 2.5
	}

	/// Inclusive range the gap top is drawn from.
	pub fn gap_top_range(&self) -> (f64, f64) {
		(
			GAP_TOP_MARGIN,
			self.canvas_height - self.gap_size - GAP_BOTTOM_MARGIN,
		)
	}

	/// Rejects constants the simulation cannot run with.
	pub fn validate(&self) -> Result<(), GameError> {
		for (field, value) in [
			("canvas_width", self.canvas_width),
			("canvas_height", self.canvas_height),
			("obstacle_speed", self.obstacle_speed),
			("obstacle_width", self.obstacle_width),
			("gap_size", self.gap_size),
			("body_width", self.body_width),
			("body_height", self.body_height),
		] {
			if !value.is_finite() || value <= 0.0 {
				return Err(GameError::NotPositive { field, value });
			}
		}
		for (field, value) in [
			("gravity", self.gravity),
			("jump_impulse", self.jump_impulse),
			("slot_x", self.slot_x),
		] {
			if !value.is_finite() {
				return Err(GameError::NotFinite { field });
			}
		}
		if self.spawn_interval == 0 {
			return Err(GameError::ZeroSpawnInterval);
		}
		let (min, max) = self.gap_top_range();
		if max < min {
			return Err(GameError::GapDoesNotFit {
				canvas_height: self.canvas_height,
				gap_size: self.gap_size,
			});
		}
		Ok(())
	}
}

/// Game configuration rejected before the first tick.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
	/// A size or speed must be strictly positive.
	#[error("{field} must be positive, got {value}")]
	NotPositive {
		/// Offending field.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},
	/// A constant must be a finite number.
	#[error("{field} must be finite")]
	NotFinite {
		/// Offending field.
		field: &'static str,
	},
	/// Obstacles would never spawn.
	#[error("spawn interval must be at least one tick")]
	ZeroSpawnInterval,
	/// No gap position satisfies both margins.
	#[error("a {gap_size}px gap does not fit a {canvas_height}px canvas")]
	GapDoesNotFit {
		/// Canvas height.
		canvas_height: f64,
		/// Gap size.
		gap_size: f64,
	},
}

/// Read-only view of a session for rendering.
#[derive(Clone, Copy, Debug)]
pub struct GameSnapshot<'a> {
	/// Lifecycle phase.
	pub phase: Phase,
	/// The bird.
	pub body: &'a Body,
	/// Obstacles, left to right.
	pub obstacles: &'a [Obstacle],
	/// Current run's score.
	pub score: u32,
	/// Best score this session.
	pub high_score: u32,
	/// Canvas width.
	pub canvas_width: f64,
	/// Canvas height.
	pub canvas_height: f64,
	/// Bird's horizontal center.
	pub slot_x: f64,
}
