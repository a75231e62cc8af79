use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;

use super::host::{self, HostSession};
use super::state::LayoutState;
use crate::config::CONTAINER_ID;

const LOADING_TIP: &str = "Main thread is idle, waiting for the worker to return the layout";
const G6_EXAMPLE_URL: &str =
	"https://g6.antv.vision/en/examples/net/furchtermanLayout#fruchtermanWebWorker";

/// Spinner, elapsed-time readout and the container the finished layout is
/// drawn into. The worker is started once, after mount.
#[component]
pub fn OffscreenLayout() -> impl IntoView {
	let state = RwSignal::new(LayoutState::default());
	let session: Rc<RefCell<Option<HostSession>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		if session.borrow().is_some() {
			return;
		}
		match host::initialize(state) {
			Ok(started) => *session.borrow_mut() = started,
			Err(err) => {
				error!("failed to start layout worker: {err}");
				state.update(|s| {
					s.fail(err.to_string());
				});
			}
		}
	});

	let loading = move || state.with(LayoutState::is_loading);

	view! {
		<div class="spin-container" class:spinning=loading>
			<Show when=loading>
				<div class="spin-overlay">
					<span class="spin-dot"></span>
					<div class="spin-tip">{LOADING_TIP}</div>
				</div>
			</Show>
			<div>"Elapsed time: " {move || state.with(LayoutState::elapsed_secs)} "s"</div>
			<div>
				"Ported from the same " <a href=G6_EXAMPLE_URL>"example"</a> " in G6"
			</div>
			{move || {
				state
					.with(LayoutState::status_message)
					.map(|message| view! { <div class="layout-status">{message}</div> })
			}}
			<div id=CONTAINER_ID></div>
		</div>
	}
}
