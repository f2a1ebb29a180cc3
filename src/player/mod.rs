//! Player module: the walking camera and remedy interaction shell.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
