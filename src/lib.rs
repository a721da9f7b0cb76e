//! Leptos client-side frame app: Icebreaker credential graph and Flappy Bird.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod config;
mod frame;
mod icebreaker;
mod pages;

pub use components::animation::{AnimationLoop, FixedTimestep, TICK_MS};
pub use components::flappy::{
	Body, GAP_BOTTOM_MARGIN, GAP_TOP_MARGIN, GameConfig, GameError, GameSimulation, GameSnapshot,
	Obstacle, Phase, TickOutcome,
};
pub use components::social_graph::{
	Entity, LayoutConfig, LayoutEngine, LayoutError, Link, Point, Role, SimNode, distinct_related,
	forces, label,
};
pub use config::AppConfig;
pub use frame::embed::FrameEmbed;
pub use frame::sdk::{FrameContext, SafeAreaInsets};
pub use icebreaker::{Credential, FetchError, IcebreakerClient, Profile, direct_image_url};

// Top-Level pages
use crate::frame::sdk;
use crate::pages::game::Game;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router for the profile viewer and the game, handling 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let embed = FrameEmbed::for_app(&AppConfig::from_build_env().app_url).to_meta_content();
	let frame_context = RwSignal::new(None::<FrameContext>);
	provide_context(frame_context.read_only());

	// Hide the host splash once mounted; resolves to nothing outside a frame host.
	spawn_local(async move {
		frame_context.set(sdk::context().await);
		sdk::ready().await;
	});

	let padding = move || {
		frame_context
			.get()
			.map(|ctx| ctx.insets().padding_style())
			.unwrap_or_default()
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Icebreaker Frame" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="fc:frame" content=embed />

		<main style=padding>
			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/flappy") view=Game />
				</Routes>
			</Router>
		</main>
	}
}
