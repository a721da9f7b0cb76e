//! Frame host lifecycle: ready signal, context object, close.
//!
//! Every call degrades to a logged no-op when the page is opened outside a
//! frame host.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/frame_sdk.js")]
extern "C" {
	#[wasm_bindgen(catch, js_name = frameContext)]
	async fn frame_context() -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_name = frameReady)]
	async fn frame_ready() -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_name = frameClose)]
	fn frame_close() -> Result<JsValue, JsValue>;
}

/// What the host tells the frame about the session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameContext {
	/// Viewer, when the host shares it.
	pub user: Option<FrameUser>,
	/// Host app details.
	pub client: Option<ClientContext>,
}

/// The Farcaster account viewing the frame.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameUser {
	/// Farcaster id.
	pub fid: u64,
	/// Handle without the `@`.
	pub username: Option<String>,
	/// Display name.
	pub display_name: Option<String>,
	/// Profile picture.
	pub pfp_url: Option<String>,
}

/// The host app embedding the frame.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContext {
	/// Farcaster id of the host app.
	pub client_fid: Option<u64>,
	/// Whether the user added the frame.
	pub added: bool,
	/// Space taken by host chrome.
	pub safe_area_insets: Option<SafeAreaInsets>,
}

/// Pixels at each edge covered by host chrome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SafeAreaInsets {
	/// Top inset.
	pub top: f64,
	/// Bottom inset.
	pub bottom: f64,
	/// Left inset.
	pub left: f64,
	/// Right inset.
	pub right: f64,
}

impl FrameContext {
	/// Safe-area insets, zero when the host sends none.
	pub fn insets(&self) -> SafeAreaInsets {
		self.client
			.as_ref()
			.and_then(|c| c.safe_area_insets)
			.unwrap_or_default()
	}
}

impl SafeAreaInsets {
	/// Inline CSS padding keeping content clear of host chrome.
	pub fn padding_style(&self) -> String {
		format!(
			"padding: {}px {}px {}px {}px;",
			self.top, self.right, self.bottom, self.left
		)
	}
}

/// Session context, `None` outside a frame host.
pub async fn context() -> Option<FrameContext> {
	let value = match frame_context().await {
		Ok(v) if !v.is_undefined() && !v.is_null() => v,
		Ok(_) => return None,
		Err(e) => {
			warn!("error loading frame context: {e:?}");
			return None;
		}
	};
	serde_wasm_bindgen::from_value(value)
		.map_err(|e| warn!("unexpected frame context shape: {e}"))
		.ok()
}

/// Tells the host the frame has rendered and the splash can be hidden.
pub async fn ready() {
	info!("calling ready");
	if let Err(e) = frame_ready().await {
		warn!("frame ready failed: {e:?}");
	}
}

/// Asks the host to close the frame.
pub fn close() {
	if let Err(e) = frame_close() {
		warn!("frame close failed: {e:?}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insets_default_to_zero() {
		let ctx = FrameContext::default();
		assert_eq!(ctx.insets(), SafeAreaInsets::default());
		assert_eq!(ctx.insets().padding_style(), "padding: 0px 0px 0px 0px;");
	}

	#[test]
	fn context_decodes_from_host_json() {
		let ctx: FrameContext = serde_json::from_str(
			r#"{"user": {"fid": 42, "username": "alice", "pfpUrl": "https://p/a.png"},
			    "client": {"clientFid": 9152, "added": true,
			               "safeAreaInsets": {"top": 10, "bottom": 20, "left": 0, "right": 0}}}"#,
		)
		.unwrap();
		assert_eq!(ctx.user.as_ref().map(|u| u.fid), Some(42));
		assert!(ctx.client.as_ref().is_some_and(|c| c.added));
		assert_eq!(ctx.insets().padding_style(), "padding: 10px 0px 20px 0px;");
	}
}
