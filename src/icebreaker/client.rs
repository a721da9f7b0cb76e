use log::{debug, error};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::types::{Profile, ProfilesResponse};

/// Why an Icebreaker request produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
	/// Not running in a browser.
	#[error("no browser window")]
	NoWindow,
	/// The browser rejected the request.
	#[error("request failed: {0}")]
	Js(String),
	/// Non-2xx HTTP status.
	#[error("API responded with status: {0}")]
	Status(u16),
	/// Body was not a profiles envelope.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<JsValue> for FetchError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Read-only client for the Icebreaker profile API.
#[derive(Clone, Debug, PartialEq)]
pub struct IcebreakerClient {
	base_url: String,
}

impl IcebreakerClient {
	/// Client for the API rooted at `base_url`.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_owned(),
		}
	}

	/// Lookup URL for a Farcaster name.
	pub fn fname_url(&self, fname: &str) -> String {
		format!(
			"{}/fname/{}/",
			self.base_url,
			String::from(js_sys::encode_uri_component(fname.trim()))
		)
	}

	/// Lookup URL for the holders of a credential.
	pub fn credential_url(&self, credential: &str) -> String {
		format!(
			"{}/credentials?credentialName={}",
			self.base_url,
			String::from(js_sys::encode_uri_component(credential))
		)
	}

	/// Profile registered under a Farcaster name, if any.
	pub async fn profile_by_fname(&self, fname: &str) -> Result<Option<Profile>, FetchError> {
		let resp = self.get(&self.fname_url(fname)).await?;
		Ok(resp.profiles.into_iter().next())
	}

	/// Every profile holding a credential with this name.
	pub async fn profiles_with_credential(&self, credential: &str) -> Result<Vec<Profile>, FetchError> {
		Ok(self.get(&self.credential_url(credential)).await?.profiles)
	}

	async fn get(&self, url: &str) -> Result<ProfilesResponse, FetchError> {
		debug!("fetching {url}");
		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);
		let request = Request::new_with_str_and_init(url, &opts)?;
		request.headers().set("accept", "application/json")?;

		let window = web_sys::window().ok_or(FetchError::NoWindow)?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await?
			.dyn_into()?;
		if !resp.ok() {
			error!("Icebreaker API responded with status: {}", resp.status());
			return Err(FetchError::Status(resp.status()));
		}
		let body = JsFuture::from(resp.text()?).await?;
		let text = body.as_string().unwrap_or_default();
		Ok(serde_json::from_str(&text)?)
	}
}
