pub mod offscreen_layout;
