use icebreaker_frame::{GAP_BOTTOM_MARGIN, GAP_TOP_MARGIN, GameConfig, GameSimulation, Phase, TickOutcome};

/// No gravity and a gap wide enough that the bird never leaves it.
fn hover_config() -> GameConfig {
	GameConfig {
		gravity: 0.0,
		gap_size: 480.0,
		..GameConfig::default()
	}
}

fn started(config: GameConfig, seed: u64) -> GameSimulation {
	let mut sim = GameSimulation::with_seed(config, seed).expect("valid config");
	sim.apply_input();
	sim
}

#[test]
fn new_session_waits_for_input() {
	let mut sim = GameSimulation::with_seed(GameConfig::default(), 1).expect("valid config");
	assert_eq!(sim.phase(), Phase::NotStarted);
	assert_eq!(sim.advance(), TickOutcome::Idle);
	assert_eq!(sim.ticks(), 0);
	assert_eq!(sim.snapshot().body.y, 240.0);
}

#[test]
fn same_seed_same_session() {
	let run = |seed| {
		let mut sim = started(GameConfig::default(), seed);
		for tick in 0..3000u32 {
			if tick % 22 == 0 {
				sim.apply_input();
			}
			sim.advance();
		}
		let snap = sim.snapshot();
		(snap.obstacles.to_vec(), *snap.body, sim.score(), sim.high_score())
	};
	assert_eq!(run(7), run(7));
}

#[test]
fn obstacles_spawn_inside_the_canvas() {
	let config = hover_config();
	let (min, max) = config.gap_top_range();
	assert_eq!(min, GAP_TOP_MARGIN);
	assert_eq!(max, config.canvas_height - config.gap_size - GAP_BOTTOM_MARGIN);

	let mut sim = started(config.clone(), 99);
	for _ in 0..400 {
		assert_eq!(sim.advance(), TickOutcome::Continue);
		for o in sim.snapshot().obstacles {
			assert!(o.gap_top >= min && o.gap_top <= max);
			assert_eq!(o.gap_bottom, config.canvas_height - o.gap_top - config.gap_size);
		}
	}
}

#[test]
fn each_obstacle_scores_once() {
	let mut sim = started(hover_config(), 3);
	for _ in 0..1000 {
		assert_eq!(sim.advance(), TickOutcome::Continue);
	}
	// Spawns at ticks 120, 240, ..; each clears the bird 175 ticks later.
	assert_eq!(sim.score(), 6);
	let scored = sim.snapshot().obstacles.iter().filter(|o| o.scored).count();
	assert!(scored <= 6);
}

#[test]
fn falling_bird_hits_the_ground() {
	let mut sim = started(GameConfig::default(), 5);
	let mut ticks = 0;
	while sim.advance() == TickOutcome::Continue {
		ticks += 1;
		assert!(ticks < 100, "bird never landed");
	}
	assert_eq!(sim.ticks(), 37);
	assert_eq!(sim.phase(), Phase::GameOver);
	assert_eq!(sim.advance(), TickOutcome::Idle);
}

#[test]
fn restart_keeps_high_score() {
	let mut sim = started(hover_config(), 11);
	while sim.score() < 1 {
		assert_eq!(sim.advance(), TickOutcome::Continue);
	}
	// A single flap without gravity climbs until the ceiling.
	sim.apply_input();
	while sim.advance() == TickOutcome::Continue {}
	assert_eq!(sim.phase(), Phase::GameOver);
	let best = sim.high_score();
	assert!(best >= 1);
	assert_eq!(best, sim.score());

	sim.apply_input();
	assert_eq!(sim.phase(), Phase::Running);
	assert_eq!(sim.score(), 0);
	assert_eq!(sim.high_score(), best);
	assert!(sim.snapshot().obstacles.is_empty());
}

#[test]
fn resize_mid_run_applies_on_restart() {
	let mut sim = started(GameConfig::default(), 2);
	sim.resize(400.0, 800.0).expect("valid size");
	assert_eq!(sim.config().canvas_height, 600.0);
	while sim.advance() == TickOutcome::Continue {}
	sim.apply_input();
	assert_eq!(sim.config().canvas_height, 800.0);
	assert_eq!(sim.snapshot().canvas_width, 400.0);
	assert_eq!(sim.snapshot().body.y, 320.0);
}
