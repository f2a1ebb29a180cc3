//! Core module exposes the simulation clock and its plugin.
pub mod plugin;

pub use plugin::CorePlugin;
