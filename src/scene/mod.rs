//! Scene module: phase state, transition requests, and timeline primitives.
pub mod flow;
pub mod plugin;
pub mod systems;
pub mod timeline;

pub use plugin::ScenePlugin;
