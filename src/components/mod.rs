pub mod animation;
pub mod flappy;
pub mod social_graph;
