//! Page entry point.

use offscreen_layout::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
