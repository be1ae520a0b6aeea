use std::sync::Arc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::components::force_graph::{ForceGraphCanvas, Scene, SceneConfig};
use crate::graph::{GraphData, GraphError, Result};

/// The artifact written by the `transform` job, served next to the bundle.
const DATA_URL: &str = "data/transformed.json";

fn fetch_error(url: &str, err: JsValue) -> GraphError {
	GraphError::Fetch {
		url: url.into(),
		message: format!("{err:?}"),
	}
}

async fn fetch_text(url: &str) -> Result<String> {
	let window = web_sys::window().ok_or_else(|| fetch_error(url, JsValue::NULL))?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.and_then(|value| value.dyn_into())
		.map_err(|e| fetch_error(url, e))?;
	if !response.ok() {
		return Err(GraphError::Status {
			url: url.into(),
			status: response.status(),
		});
	}
	let text = response.text().map_err(|e| fetch_error(url, e))?;
	JsFuture::from(text)
		.await
		.map_err(|e| fetch_error(url, e))?
		.as_string()
		.ok_or_else(|| fetch_error(url, JsValue::from_str("body is not text")))
}

/// Fetch the artifact and bind it. Any failure aborts the whole scene.
async fn load_scene(config: &SceneConfig) -> Result<Scene> {
	let text = fetch_text(DATA_URL).await?;
	let data = GraphData::from_json(&text)?;
	Scene::build(&data, config)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let scene = LocalResource::new(|| async {
		load_scene(&SceneConfig::default()).await.map_err(|e| {
			error!("Failed to load data: {e}");
			Arc::new(e)
		})
	});

	view! {
		<Suspense fallback=|| view! { <p class="loading">"Loading graph..."</p> }>
			<ErrorBoundary fallback=|errors| {
				view! {
					<h1>"Uh oh! Something went wrong!"</h1>

					<p>"Errors: "</p>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				}
			}>
				<div class="fullscreen-graph">
					{move || Suspend::new(async move {
						scene.await.map(|scene| view! { <ForceGraphCanvas scene=scene fullscreen=true /> })
					})}
					<div class="graph-overlay">
						<h1>"Entity Relationships"</h1>
						<p class="subtitle">"Drag nodes to reposition. Hover a node to highlight its neighbors."</p>
					</div>
				</div>
			</ErrorBoundary>
		</Suspense>
	}
}
