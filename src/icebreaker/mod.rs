//! Icebreaker profile lookups and their conversion into graph entities.

mod client;
mod types;

pub use client::{FetchError, IcebreakerClient};
pub use types::{
	Channel, ChannelMetadata, Credential, Profile, ProfilesResponse, direct_image_url,
};
