use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::types::{Body, GameConfig, GameError, GameSnapshot, Obstacle, Phase, TickOutcome};

/// One play session: the bird, the pipes, and the scores.
///
/// Everything but `high_score` is reset when a run starts. Randomness only
/// enters through `rng` (gap placement), so a seeded session replays exactly.
pub struct GameSimulation<R = ChaCha8Rng> {
	config: GameConfig,
	pending_size: Option<(f64, f64)>,
	phase: Phase,
	body: Body,
	obstacles: Vec<Obstacle>,
	score: u32,
	high_score: u32,
	frame_counter: u32,
	ticks: u64,
	rng: R,
}

impl GameSimulation<ChaCha8Rng> {
	/// A session whose gap placement is fully determined by `seed`.
	pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
		Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
	}
}

impl<R: Rng> GameSimulation<R> {
	/// A session drawing gap positions from `rng`.
	pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
		config.validate()?;
		let body = Body {
			y: config.start_y(),
			velocity: 0.0,
			width: config.body_width,
			height: config.body_height,
		};
		Ok(Self {
			config,
			pending_size: None,
			phase: Phase::NotStarted,
			body,
			obstacles: Vec::new(),
			score: 0,
			high_score: 0,
			frame_counter: 0,
			ticks: 0,
			rng,
		})
	}

	/// The single player action: starts, flaps, or restarts depending on the
	/// phase.
	pub fn apply_input(&mut self) {
		match self.phase {
			Phase::NotStarted | Phase::GameOver => self.reset(),
			Phase::Running => self.body.velocity = self.config.jump_impulse,
		}
	}

	fn reset(&mut self) {
		if let Some((w, h)) = self.pending_size.take() {
			self.config.canvas_width = w;
			self.config.canvas_height = h;
		}
		self.body = Body {
			y: self.config.start_y(),
			velocity: 0.0,
			width: self.config.body_width,
			height: self.config.body_height,
		};
		self.obstacles.clear();
		self.score = 0;
		self.frame_counter = 0;
		self.ticks = 0;
		self.phase = Phase::Running;
		info!("run started (high score {})", self.high_score);
	}

	/// One fixed step: integrate, spawn, scroll, collide, score.
	pub fn advance(&mut self) -> TickOutcome {
		if self.phase != Phase::Running {
			return TickOutcome::Idle;
		}
		self.ticks += 1;

		self.body.velocity += self.config.gravity;
		self.body.y += self.body.velocity;

		self.frame_counter += 1;
		if self.frame_counter >= self.config.spawn_interval {
			self.frame_counter = 0;
			self.spawn();
		}

		let (slot, speed) = (self.config.slot_x, self.config.obstacle_speed);
		let mut passed = 0;
		for obstacle in &mut self.obstacles {
			obstacle.x -= speed;
			if !obstacle.scored && obstacle.right() < slot {
				obstacle.scored = true;
				passed += 1;
			}
		}
		self.obstacles.retain(|o| o.right() >= 0.0);

		let crashed = self.collides();
		self.score += passed;

		if crashed {
			self.phase = Phase::GameOver;
			self.high_score = self.high_score.max(self.score);
			info!(
				"game over after {} ticks: score {}, high score {}",
				self.ticks, self.score, self.high_score
			);
			return TickOutcome::GameOver;
		}
		TickOutcome::Continue
	}

	fn spawn(&mut self) {
		let (min, max) = self.config.gap_top_range();
		let gap_top = self.rng.gen_range(min..=max);
		let c = &self.config;
		debug!("spawning obstacle, gap top {gap_top:.1}");
		self.obstacles.push(Obstacle {
			x: c.canvas_width,
			gap_top,
			gap_bottom: c.canvas_height - gap_top - c.gap_size,
			width: c.obstacle_width,
			gap_size: c.gap_size,
			scored: false,
		});
	}

	/// Canvas bounds first, then every obstacle the bird overlaps
	/// horizontally.
	fn collides(&self) -> bool {
		let (top, bottom) = (self.body.top(), self.body.bottom());
		if top < 0.0 || bottom > self.config.canvas_height {
			return true;
		}
		let half = self.body.width / 2.0;
		let (left, right) = (self.config.slot_x - half, self.config.slot_x + half);
		self.obstacles
			.iter()
			.any(|o| right > o.x && left < o.right() && !o.gap_contains(top, bottom))
	}

	/// Applies a new canvas size. Mid-run the change waits for the next
	/// start so existing obstacles keep spanning the canvas they spawned on.
	pub fn resize(&mut self, width: f64, height: f64) -> Result<(), GameError> {
		GameConfig {
			canvas_width: width,
			canvas_height: height,
			..self.config.clone()
		}
		.validate()?;
		if self.phase == Phase::Running {
			self.pending_size = Some((width, height));
		} else {
			self.config.canvas_width = width;
			self.config.canvas_height = height;
			self.body.y = self.config.start_y();
		}
		Ok(())
	}

	/// Read-only view for the renderer.
	pub fn snapshot(&self) -> GameSnapshot<'_> {
		GameSnapshot {
			phase: self.phase,
			body: &self.body,
			obstacles: &self.obstacles,
			score: self.score,
			high_score: self.high_score,
			canvas_width: self.config.canvas_width,
			canvas_height: self.config.canvas_height,
			slot_x: self.config.slot_x,
		}
	}

	/// Lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Score of the current (or last) run.
	pub fn score(&self) -> u32 {
		self.score
	}

	/// Best score this session.
	pub fn high_score(&self) -> u32 {
		self.high_score
	}

	/// Ticks since the current run started.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Active configuration.
	pub fn config(&self) -> &GameConfig {
		&self.config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sim() -> GameSimulation {
		GameSimulation::with_seed(GameConfig::default(), 7).unwrap()
	}

	fn obstacle(x: f64, gap_top: f64, cfg: &GameConfig) -> Obstacle {
		Obstacle {
			x,
			gap_top,
			gap_bottom: cfg.canvas_height - gap_top - cfg.gap_size,
			width: cfg.obstacle_width,
			gap_size: cfg.gap_size,
			scored: false,
		}
	}

	#[test]
	fn idle_until_first_input() {
		let mut s = sim();
		assert_eq!(s.phase(), Phase::NotStarted);
		assert_eq!(s.advance(), TickOutcome::Idle);
		assert_eq!(s.ticks(), 0);
		s.apply_input();
		assert_eq!(s.phase(), Phase::Running);
		assert_eq!(s.snapshot().body.y, 240.0);
	}

	#[test]
	fn gravity_applies_before_position() {
		let mut s = sim();
		s.apply_input();
		s.advance();
		assert_eq!(s.snapshot().body.velocity, 0.5);
		assert_eq!(s.snapshot().body.y, 240.5);
	}

	#[test]
	fn flap_overrides_velocity() {
		let mut s = sim();
		s.apply_input();
		for _ in 0..5 {
			s.advance();
		}
		s.apply_input();
		assert_eq!(s.snapshot().body.velocity, -8.0);
		s.apply_input();
		assert_eq!(s.snapshot().body.velocity, -8.0);
	}

	#[test]
	fn spawns_on_cadence_with_consistent_gap() {
		let mut s = sim();
		s.apply_input();
		for _ in 0..119 {
			s.body.velocity = 0.0;
			s.advance();
		}
		assert!(s.obstacles.is_empty());
		s.body.velocity = 0.0;
		s.advance();
		assert_eq!(s.obstacles.len(), 1);
		let o = s.obstacles[0];
		assert_eq!(o.x, 350.0 - 2.0);
		assert!((20.0..=370.0).contains(&o.gap_top));
		assert!((o.gap_top + o.gap_size + o.gap_bottom - 600.0).abs() < 1e-9);
	}

	#[test]
	fn gap_interior_is_safe_and_edges_are_not_breached() {
		let cfg = GameConfig::default();
		let mut s = GameSimulation::with_seed(cfg.clone(), 1).unwrap();
		s.apply_input();
		s.obstacles.push(obstacle(40.0, 20.0, &cfg));

		s.body = Body {
			y: 35.0,
			velocity: 0.0,
			width: 30.0,
			height: 20.0,
		};
		assert_eq!((s.body.top(), s.body.bottom()), (25.0, 45.0));
		assert!(!s.collides());

		s.body = Body {
			y: 27.5,
			velocity: 0.0,
			width: 30.0,
			height: 35.0,
		};
		assert_eq!((s.body.top(), s.body.bottom()), (10.0, 45.0));
		assert!(s.collides());

		// touching the edge exactly is allowed
		s.body = Body {
			y: 30.0,
			velocity: 0.0,
			width: 30.0,
			height: 20.0,
		};
		assert!(!s.collides());
	}

	#[test]
	fn no_collision_without_horizontal_overlap() {
		let cfg = GameConfig::default();
		let mut s = GameSimulation::with_seed(cfg.clone(), 1).unwrap();
		s.apply_input();
		// bird spans x in [35, 65]
		s.obstacles.push(obstacle(65.0, 400.0, &cfg));
		s.obstacles.push(obstacle(-15.0, 400.0, &cfg));
		assert!(!s.collides());
		s.obstacles.push(obstacle(64.0, 400.0, &cfg));
		assert!(s.collides());
	}

	#[test]
	fn falls_to_the_ground_on_the_predicted_tick() {
		let mut s = sim();
		s.apply_input();
		let mut tick = 0;
		loop {
			tick += 1;
			let outcome = s.advance();
			let bottom = s.snapshot().body.bottom();
			if bottom > 600.0 {
				assert_eq!(outcome, TickOutcome::GameOver);
				break;
			}
			assert_eq!(outcome, TickOutcome::Continue);
		}
		assert_eq!(tick, 37);
		assert_eq!(s.advance(), TickOutcome::Idle);
	}

	#[test]
	fn climbing_forever_hits_the_ceiling() {
		let mut s = sim();
		s.apply_input();
		let mut tick = 0;
		while s.phase() == Phase::Running {
			s.apply_input();
			s.advance();
			tick += 1;
		}
		assert_eq!(tick, 31);
		assert!(s.snapshot().body.top() < 0.0);
	}

	#[test]
	fn resize_is_deferred_while_running() {
		let mut s = sim();
		s.resize(400.0, 800.0).unwrap();
		assert_eq!(s.snapshot().canvas_height, 800.0);
		assert_eq!(s.snapshot().body.y, 320.0);

		s.apply_input();
		s.resize(300.0, 500.0).unwrap();
		assert_eq!(s.snapshot().canvas_height, 800.0);
		while s.advance() == TickOutcome::Continue {}
		s.apply_input();
		assert_eq!(s.snapshot().canvas_height, 500.0);
		assert_eq!(s.snapshot().canvas_width, 300.0);
	}

	#[test]
	fn resize_rejects_canvas_too_small_for_the_gap() {
		let mut s = sim();
		assert!(matches!(
			s.resize(350.0, 200.0),
			Err(GameError::GapDoesNotFit { .. })
		));
		assert_eq!(s.snapshot().canvas_height, 600.0);
	}

	#[test]
	fn rejects_invalid_config() {
		let cfg = GameConfig {
			spawn_interval: 0,
			..GameConfig::default()
		};
		assert_eq!(cfg.validate(), Err(GameError::ZeroSpawnInterval));
		let cfg = GameConfig {
			gap_size: -10.0,
			..GameConfig::default()
		};
		assert!(GameSimulation::with_seed(cfg, 0).is_err());
		let cfg = GameConfig {
			gravity: f64::NAN,
			..GameConfig::default()
		};
		assert_eq!(cfg.validate(), Err(GameError::NotFinite { field: "gravity" }));
	}
}
