mod component;
pub mod forces;
pub mod label;
mod render;
mod state;
mod types;

pub use component::SocialGraphCanvas;
pub use state::{LayoutEngine, distinct_related};
pub use types::{Entity, LayoutConfig, LayoutError, Link, Point, Role, SimNode};
