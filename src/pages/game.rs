use leptos::prelude::*;

use crate::components::flappy::FlappyCanvas;

/// Full-screen game page launched from the frame embed.
#[component]
pub fn Game() -> impl IntoView {
	view! {
		<div class="fullscreen-game">
			<FlappyCanvas />
		</div>
	}
}
