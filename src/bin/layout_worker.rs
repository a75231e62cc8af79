//! Entry point of the dedicated worker that computes the graph layout.

fn main() {
	offscreen_layout::init_logging();
	offscreen_layout::worker::run();
}
