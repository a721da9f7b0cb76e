use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::{error, info};

use crate::components::social_graph::{Role, SocialGraphCanvas, distinct_related};
use crate::config::AppConfig;
use crate::frame::embed::GAME_PATH;
use crate::frame::sdk::{self, FrameContext};
use crate::icebreaker::{IcebreakerClient, Profile};

/// Profile viewer: look up a Farcaster name, pick one of its credentials and
/// graph the profiles sharing it.
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::from_build_env();
	let client = StoredValue::new(IcebreakerClient::new(config.api_base_url.clone()));

	let fname = RwSignal::new(config.default_fname);
	let profile = RwSignal::new(None::<Profile>);
	let loading = RwSignal::new(false);
	let error = RwSignal::new(None::<String>);
	let connections = RwSignal::new(Vec::<Profile>::new());
	let network = RwSignal::new(None::<String>);
	let host = use_context::<ReadSignal<Option<FrameContext>>>();
	let viewer = move || {
		host.and_then(|ctx| ctx.get())
			.and_then(|ctx| ctx.user)
			.and_then(|user| user.username)
			.map(|name| view! { <p class="notice">"Signed in as @"{name}</p> })
	};

	let load = move || {
		let name = fname.get_untracked();
		let client = client.get_value();
		loading.set(true);
		error.set(None);
		spawn_local(async move {
			match client.profile_by_fname(&name).await {
				Ok(found) => {
					info!("loaded profile for {name}: {}", found.is_some());
					profile.set(found);
				}
				Err(e) => {
					error!("Error fetching icebreaker data: {e}");
					error.set(Some("Failed to fetch data".to_owned()));
					profile.set(None);
				}
			}
			connections.set(Vec::new());
			network.set(None);
			loading.set(false);
		});
	};
	load();

	let on_network = move |profiles: Vec<Profile>, credential: String| {
		connections.set(profiles);
		network.set(Some(credential));
	};

	view! {
		<div class="frame-page">
			<h1 class="title">"Icebreaker Profile Viewer"</h1>
			{viewer}
			<h2>"Enter Farcaster Name:"</h2>
			<input
				id="view-icebreaker-profile"
				type="text"
				prop:value=move || fname.get()
				on:input=move |ev| fname.set(event_target_value(&ev))
			/>
			<button on:click=move |_| load() disabled=move || loading.get()>
				{move || if loading.get() { "Loading..." } else { "View Icebreaker Profile" }}
			</button>
			{move || error.get().map(|e| view! { <div class="error">{e}</div> })}
			{move || {
				profile
					.get()
					.map(|p| {
						view! {
							<ProfileCard profile=p.clone() />
							<CredentialNetworkSelector profile=p.clone() on_fetched=on_network />
							<CredentialGraph profile=p connections=connections network=network />
						}
					})
			}}
			<nav class="play-link">
				<A href=GAME_PATH>"Play Flappy Bird"</A>
			</nav>
			<button class="close" on:click=move |_| sdk::close()>
				"Close Frame"
			</button>
		</div>
	}
}

#[component]
fn ProfileCard(profile: Profile) -> impl IntoView {
	let avatar = profile.avatar_url.as_deref().map(crate::icebreaker::direct_image_url);
	let raw = format!("{profile:#?}");
	let credential_count = profile.credentials.len();
	view! {
		<div class="profile-card">
			{profile.display_name.clone().map(|n| view! { <div><b>"Name: "</b>{n}</div> })}
			{profile
				.farcaster_handle()
				.map(|h| view! { <div><b>"Farcaster: "</b>"@"{h.to_owned()}</div> })}
			{profile.farcaster_fid().map(|f| view! { <div><b>"FID: "</b>{f.to_owned()}</div> })}
			{avatar.map(|src| view! { <img class="avatar" src=src alt="profile" /> })}
			{profile.bio.clone().map(|b| view! { <div><b>"Bio: "</b>{b}</div> })}
			{profile.job_title.clone().map(|j| view! { <div><b>"Job: "</b>{j}</div> })}
			{profile.primary_skill.clone().map(|s| view! { <div><b>"Skill: "</b>{s}</div> })}
			{(credential_count > 0)
				.then(|| view! { <div><b>"Credentials: "</b>{credential_count}</div> })}
			<details>
				<summary>"View raw data"</summary>
				<pre>{raw}</pre>
			</details>
		</div>
	}
}

#[component]
fn CredentialNetworkSelector(
	profile: Profile,
	on_fetched: impl Fn(Vec<Profile>, String) + Copy + 'static,
) -> impl IntoView {
	let options: Vec<(String, String)> = profile
		.unique_credentials()
		.into_iter()
		.map(|c| (c.name.clone(), c.label()))
		.collect();
	if options.is_empty() {
		return view! { <div class="notice">"No credentials available for this profile."</div> }
			.into_any();
	}

	let client = StoredValue::new(IcebreakerClient::new(
		AppConfig::from_build_env().api_base_url,
	));
	let selected = RwSignal::new(options[0].0.clone());
	let fetching = RwSignal::new(false);
	let fetch_error = RwSignal::new(None::<String>);

	let fetch = move |_| {
		let credential = selected.get_untracked();
		if credential.is_empty() {
			fetch_error.set(Some("Please select a credential first".to_owned()));
			return;
		}
		let client = client.get_value();
		fetching.set(true);
		fetch_error.set(None);
		spawn_local(async move {
			match client.profiles_with_credential(&credential).await {
				Ok(profiles) => on_fetched(profiles, credential),
				Err(e) => {
					error!("Error fetching credential network: {e}");
					fetch_error.set(Some("Error fetching credential network".to_owned()));
				}
			}
			fetching.set(false);
		});
	};

	view! {
		<div class="credential-networks">
			<h3>"Credential Networks"</h3>
			<select
				prop:value=move || selected.get()
				on:change=move |ev| {
					selected.set(event_target_value(&ev));
					fetch_error.set(None);
				}
				disabled=move || fetching.get()
			>
				<option value="">"-- Select a credential --"</option>
				{options
					.into_iter()
					.map(|(name, label)| view! { <option value=name>{label}</option> })
					.collect_view()}
			</select>
			<button
				on:click=fetch
				disabled=move || fetching.get() || selected.get().is_empty()
			>
				{move || if fetching.get() { "Loading..." } else { "Get Credential Network" }}
			</button>
			{move || fetch_error.get().map(|e| view! { <div class="error">{e}</div> })}
		</div>
	}
	.into_any()
}

#[component]
fn CredentialGraph(
	profile: Profile,
	connections: RwSignal<Vec<Profile>>,
	network: RwSignal<Option<String>>,
) -> impl IntoView {
	let Some(focal) = profile.to_entity(Role::Focal) else {
		return ().into_any();
	};
	// The credential's holders include the viewed profile itself.
	let related = Signal::derive({
		let focal = focal.clone();
		move || {
			let holders = connections
				.get()
				.iter()
				.filter_map(|p| p.to_entity(Role::Related))
				.collect();
			distinct_related(&focal, holders)
		}
	});
	let focal = Signal::derive(move || focal.clone());
	let heading = move || match network.get() {
		Some(name) => format!("Network of Profiles Sharing the Credential \"{name}\""),
		None => "Credential Network".to_owned(),
	};

	view! {
		<Show when=move || network.get().is_some()>
			<div class="graph-section">
				<h3>{heading}</h3>
				<Show
					when=move || !related.get().is_empty()
					fallback=|| view! { <div class="notice">"No connections found for this credential"</div> }
				>
					<div class="social-graph-container">
						<SocialGraphCanvas focal=focal related=related />
					</div>
				</Show>
			</div>
		</Show>
	}
	.into_any()
}
