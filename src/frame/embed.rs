//! `fc:frame` embed metadata advertised in the page head.

use serde::Serialize;

/// Name shown on the launch splash.
pub const FRAME_NAME: &str = "Flappy Man";
/// Launch button text.
pub const BUTTON_TITLE: &str = "Play Now!";
/// Splash background color.
pub const SPLASH_BACKGROUND: &str = "#f7f7f7";
/// Route the launch button opens.
pub const GAME_PATH: &str = "/flappy";

/// Content of the `fc:frame` meta tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEmbed {
	/// Embed format version.
	pub version: &'static str,
	/// Preview image.
	pub image_url: String,
	/// The launch button.
	pub button: EmbedButton,
}

/// Button under the preview image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedButton {
	/// Button text.
	pub title: &'static str,
	/// What pressing it does.
	pub action: LaunchAction,
}

/// Opens the app inside the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchAction {
	/// Action type.
	#[serde(rename = "type")]
	pub kind: &'static str,
	/// App name.
	pub name: &'static str,
	/// Page opened on launch.
	pub url: String,
	/// Icon shown while loading.
	pub splash_image_url: String,
	/// Splash background.
	pub splash_background_color: &'static str,
}

impl FrameEmbed {
	/// Embed for the app served at `app_url`.
	pub fn for_app(app_url: &str) -> Self {
		Self {
			version: "next",
			image_url: format!("{app_url}/flappy_image.png"),
			button: EmbedButton {
				title: BUTTON_TITLE,
				action: LaunchAction {
					kind: "launch_frame",
					name: FRAME_NAME,
					url: app_url.to_owned(),
					splash_image_url: format!("{app_url}/flappy_icon.png"),
					splash_background_color: SPLASH_BACKGROUND,
				},
			},
		}
	}

	/// JSON for the meta tag `content` attribute.
	pub fn to_meta_content(&self) -> String {
		serde_json::to_string(self).unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embed_serializes_with_host_field_names() {
		let json: serde_json::Value =
			serde_json::from_str(&FrameEmbed::for_app("https://frame.app").to_meta_content()).unwrap();
		assert_eq!(json["version"], "next");
		assert_eq!(json["imageUrl"], "https://frame.app/flappy_image.png");
		assert_eq!(json["button"]["action"]["type"], "launch_frame");
		assert_eq!(json["button"]["action"]["url"], "https://frame.app/flappy");
		assert_eq!(
			json["button"]["action"]["splashImageUrl"],
			"https://frame.app/flappy_icon.png"
		);
		assert_eq!(json["button"]["action"]["splashBackgroundColor"], "#f7f7f7");
	}
}
