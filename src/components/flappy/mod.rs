mod component;
mod render;
mod state;
mod types;

pub use component::FlappyCanvas;
pub use state::GameSimulation;
pub use types::{
	Body, GAP_BOTTOM_MARGIN, GAP_TOP_MARGIN, GameConfig, GameError, GameSnapshot, Obstacle, Phase,
	TickOutcome,
};
