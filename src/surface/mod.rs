//! Terminal control surface: event loop, key handling, and rendering.

pub mod app;
pub mod ui;

pub use app::{SurfaceOptions, run};
