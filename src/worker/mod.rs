//! The layout worker: builds the embedded graph, runs the force solver and
//! answers the page with normalized vertex positions.

mod entry;
pub mod layout;
pub mod sample;

pub use entry::run;
