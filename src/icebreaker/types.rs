use std::collections::HashSet;

use serde::Deserialize;

use crate::components::social_graph::{Entity, Role};

const CLOUDINARY_FETCH: &str = "cloudinary.com/merkle-manufactory/image/fetch";

/// Envelope of every Icebreaker profile endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfilesResponse {
	/// Matching profiles.
	#[serde(default)]
	pub profiles: Vec<Profile>,
}

/// The subset of an Icebreaker profile this app reads. Unknown fields are
/// ignored and everything is optional, so partial records still decode.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
	/// Stable profile identifier.
	#[serde(rename = "profileID")]
	pub profile_id: Option<String>,
	/// Primary wallet.
	pub wallet_address: Option<String>,
	/// Name shown to users.
	pub display_name: Option<String>,
	/// Avatar image, possibly behind an image proxy.
	pub avatar_url: Option<String>,
	/// Free-form bio.
	pub bio: Option<String>,
	/// Self-reported job title.
	pub job_title: Option<String>,
	/// Self-reported main skill.
	pub primary_skill: Option<String>,
	/// What the person is open to.
	pub networking_status: Option<String>,
	/// Self-reported location.
	pub location: Option<String>,
	/// Linked accounts.
	pub channels: Vec<Channel>,
	/// Attestations held, possibly repeated.
	pub credentials: Vec<Credential>,
}

/// An account linked to a profile.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Channel {
	/// Network, e.g. `farcaster`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Ownership was proven.
	pub is_verified: bool,
	/// Handle or value.
	pub value: String,
	/// Profile link on the network.
	pub url: Option<String>,
	/// Extra name/value pairs, such as the FID.
	pub metadata: Vec<ChannelMetadata>,
}

/// One name/value pair attached to a channel.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelMetadata {
	/// Key or credential name.
	pub name: String,
	/// Handle or value.
	pub value: String,
}

/// An attestation held by a profile.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Credential {
	/// Key or credential name.
	pub name: String,
	/// Chain the attestation lives on.
	pub chain: Option<String>,
	/// Issuer.
	pub source: Option<String>,
	/// Issuer-side reference.
	pub reference: Option<String>,
}

impl Credential {
	/// Name with the chain appended, as shown in the selector.
	pub fn label(&self) -> String {
		match self.chain.as_deref() {
			Some(chain) if !chain.is_empty() => format!("{} ({chain})", self.name),
			_ => self.name.clone(),
		}
	}
}

impl Profile {
	/// Converts into a graph entity; `None` when the profile has no id.
	pub fn to_entity(&self, role: Role) -> Option<Entity> {
		let id = self.profile_id.as_deref().filter(|id| !id.trim().is_empty())?;
		Some(Entity {
			id: id.to_owned(),
			display_name: self.display_name.clone(),
			avatar_url: self.avatar_url.as_deref().map(direct_image_url),
			role,
		})
	}

	/// First credential of each name, in the order they appear.
	pub fn unique_credentials(&self) -> Vec<&Credential> {
		let mut seen = HashSet::new();
		self.credentials
			.iter()
			.filter(|c| seen.insert(c.name.as_str()))
			.collect()
	}

	fn farcaster(&self) -> Option<&Channel> {
		self.channels.iter().find(|c| c.kind == "farcaster")
	}

	/// Farcaster username, from the channels list.
	pub fn farcaster_handle(&self) -> Option<&str> {
		self.farcaster().map(|c| c.value.as_str())
	}

	/// Farcaster id, from the Farcaster channel's metadata.
	pub fn farcaster_fid(&self) -> Option<&str> {
		self.farcaster()?
			.metadata
			.iter()
			.find(|m| m.name == "fid")
			.map(|m| m.value.as_str())
	}
}

/// Unwraps avatars proxied through Cloudinary's fetch endpoint to the
/// original image URL. Other URLs pass through.
pub fn direct_image_url(url: &str) -> String {
	if !url.contains(CLOUDINARY_FETCH) {
		return url.to_owned();
	}
	["/https://", "/http://"]
		.iter()
		.filter_map(|scheme| url.find(scheme))
		.min()
		.map(|i| url[i + 1..].to_owned())
		.unwrap_or_else(|| url.to_owned())
}
