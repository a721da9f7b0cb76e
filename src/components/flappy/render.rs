use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::types::{Body, GameSnapshot, Obstacle, Phase};

const SKY: &str = "#87CEEB";
const DIRT: &str = "#8B4513";
const GRASS: &str = "#228B22";
const PIPE: &str = "#4dabf7";
const BIRD: &str = "#FFDE59";
const BEAK: &str = "#FF6B6B";
const GROUND_HEIGHT: f64 = 20.0;

pub fn render(snap: &GameSnapshot<'_>, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (snap.canvas_width, snap.canvas_height);
	ctx.clear_rect(0.0, 0.0, w, h);
	ctx.set_fill_style_str(SKY);
	ctx.fill_rect(0.0, 0.0, w, h);
	ctx.set_fill_style_str(DIRT);
	ctx.fill_rect(0.0, h - GROUND_HEIGHT, w, GROUND_HEIGHT);
	ctx.set_fill_style_str(GRASS);
	ctx.fill_rect(0.0, h - GROUND_HEIGHT, w, GROUND_HEIGHT / 2.0);

	draw_obstacles(snap.obstacles, ctx);
	draw_body(snap.body, snap.slot_x, ctx);

	ctx.set_fill_style_str("black");
	ctx.set_font("bold 24px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&format!("Score: {}", snap.score), w / 2.0, 30.0);

	if snap.phase != Phase::Running {
		draw_overlay(snap, ctx);
	}
}

fn draw_obstacles(obstacles: &[Obstacle], ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(PIPE);
	for o in obstacles {
		ctx.fill_rect(o.x, 0.0, o.width, o.gap_top);
		ctx.fill_rect(o.x, o.gap_end(), o.width, o.gap_bottom);
	}
}

fn draw_body(body: &Body, x: f64, ctx: &CanvasRenderingContext2d) {
	let y = body.y;
	ctx.set_fill_style_str(BIRD);
	ctx.begin_path();
	let _ = ctx.ellipse(x, y, body.width / 2.0, body.height / 2.0, 0.0, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.set_fill_style_str("white");
	ctx.begin_path();
	let _ = ctx.arc(x + 10.0, y - 5.0, 6.0, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.set_fill_style_str("black");
	ctx.begin_path();
	let _ = ctx.arc(x + 12.0, y - 5.0, 3.0, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.set_fill_style_str(BEAK);
	ctx.begin_path();
	ctx.move_to(x + 15.0, y);
	ctx.line_to(x + 25.0, y - 5.0);
	ctx.line_to(x + 25.0, y + 5.0);
	ctx.close_path();
	ctx.fill();
}

fn draw_overlay(snap: &GameSnapshot<'_>, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (snap.canvas_width, snap.canvas_height);
	let game_over = snap.phase == Phase::GameOver;
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
	ctx.fill_rect(0.0, 0.0, w, h);

	ctx.set_fill_style_str("white");
	ctx.set_font("bold 24px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text("Flappy Bird", w / 2.0, h / 2.0 - 50.0);

	ctx.set_font("16px sans-serif");
	let prompt = if game_over {
		"Game Over! Tap to restart"
	} else {
		"Tap to start"
	};
	let _ = ctx.fill_text(prompt, w / 2.0, h / 2.0);
	if game_over {
		let _ = ctx.fill_text(&format!("Score: {}", snap.score), w / 2.0, h / 2.0 + 30.0);
		let _ = ctx.fill_text(
			&format!("High Score: {}", snap.high_score),
			w / 2.0,
			h / 2.0 + 60.0,
		);
	}
}
