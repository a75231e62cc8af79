mod capability;
mod component;
mod host;
mod render;
mod state;

pub use component::OffscreenLayout;
