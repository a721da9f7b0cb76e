//! Build-time configuration.
//!
//! A client-side bundle has no process environment at runtime, so settings are
//! baked in at compile time (`ICEBREAKER_API_URL=... trunk build`).

/// Icebreaker API used when `ICEBREAKER_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://app.icebreaker.xyz/api/v1";
/// Public origin used when `APP_URL` is unset.
pub const DEFAULT_APP_URL: &str = "http://localhost:8080";
/// Name prefilled in the profile viewer.
pub const DEFAULT_FNAME: &str = "web3pm";

/// Settings fixed at build time.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Icebreaker API root, no trailing slash.
	pub api_base_url: String,
	/// Origin the app is served from, no trailing slash.
	pub app_url: String,
	/// Farcaster name looked up on first load.
	pub default_fname: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_URL.to_owned(),
			app_url: DEFAULT_APP_URL.to_owned(),
			default_fname: DEFAULT_FNAME.to_owned(),
		}
	}
}

impl AppConfig {
	/// Reads the compile-time environment, falling back to the defaults.
	pub fn from_build_env() -> Self {
		Self::from_values(
			option_env!("ICEBREAKER_API_URL"),
			option_env!("APP_URL"),
			option_env!("DEFAULT_FNAME"),
		)
	}

	fn from_values(api: Option<&str>, app: Option<&str>, fname: Option<&str>) -> Self {
		Self {
			api_base_url: pick(api, DEFAULT_API_URL),
			app_url: pick(app, DEFAULT_APP_URL),
			default_fname: pick(fname, DEFAULT_FNAME),
		}
	}
}

fn pick<'a>(value: Option<&'a str>, default: &'a str) -> String {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.unwrap_or(default)
		.trim_end_matches('/')
		.to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_values_fall_back_to_defaults() {
		assert_eq!(AppConfig::from_values(None, Some("  "), None), AppConfig::default());
	}

	#[test]
	fn trailing_slashes_are_trimmed() {
		let cfg = AppConfig::from_values(Some("http://proxy.local/api/"), Some("https://frame.app/"), None);
		assert_eq!(cfg.api_base_url, "http://proxy.local/api");
		assert_eq!(cfg.app_url, "https://frame.app");
	}
}
