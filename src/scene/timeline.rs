//! Timeline primitives for pre-authored cutscene sequences.
//!
//! The engine only sequences `play`/`stop`/`set_time` calls; the authored
//! content behind a timeline lives outside this crate.
use std::collections::HashMap;

use bevy::prelude::*;

/// Playback state of a single timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Stopped,
    Playing,
}

/// A named cutscene timeline with minimal transport controls.
#[derive(Debug, Clone)]
pub struct Timeline {
    name: String,
    state: TimelineState,
    time: f32,
    times_started: u32,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: TimelineState::Stopped,
            time: 0.0,
            times_started: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn state(&self) -> TimelineState {
        self.state
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// How many times playback has been started since creation.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn times_started(&self) -> u32 {
        self.times_started
    }

    pub fn play(&mut self) {
        self.state = TimelineState::Playing;
        self.times_started = self.times_started.saturating_add(1);
    }

    pub fn stop(&mut self) {
        self.state = TimelineState::Stopped;
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time.max(0.0);
    }
}

/// Stable reference to a registry timeline, valid for the registry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineHandle(usize);

/// Scene-level collection of named timelines.
///
/// Handles are allocated once at registration and never invalidated;
/// registration order is the handle index.
#[derive(Resource, Debug, Default)]
pub struct TimelineRegistry {
    timelines: Vec<Timeline>,
    by_name: HashMap<String, TimelineHandle>,
}

impl TimelineRegistry {
    /// Registers a timeline under its name, returning a stable handle.
    /// Re-registering a name returns the existing handle unchanged.
    pub fn register(&mut self, name: impl Into<String>) -> TimelineHandle {
        let name = name.into();
        if let Some(handle) = self.by_name.get(&name) {
            return *handle;
        }
        let handle = TimelineHandle(self.timelines.len());
        self.timelines.push(Timeline::new(name.clone()));
        self.by_name.insert(name, handle);
        handle
    }

    pub fn lookup(&self, name: &str) -> Option<TimelineHandle> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, handle: TimelineHandle) -> Option<&Timeline> {
        self.timelines.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: TimelineHandle) -> Option<&mut Timeline> {
        self.timelines.get_mut(handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_returns_stable_handles() {
        let mut registry = TimelineRegistry::default();
        let first = registry.register("intro");
        let again = registry.register("intro");
        assert_eq!(first, again);

        let other = registry.register("anomaly");
        assert_ne!(first, other);
        assert_eq!(registry.lookup("anomaly"), Some(other));
        assert_eq!(registry.lookup("missing"), None);
    }

    #[test]
    fn timeline_transport_tracks_starts() {
        let mut timeline = Timeline::new("cinematic");
        assert_eq!(timeline.state(), TimelineState::Stopped);

        timeline.play();
        timeline.stop();
        timeline.set_time(0.0);
        timeline.play();

        assert_eq!(timeline.times_started(), 2);
        assert_eq!(timeline.state(), TimelineState::Playing);
        assert_eq!(timeline.time(), 0.0);
    }

    #[test]
    fn set_time_clamps_negative_values() {
        let mut timeline = Timeline::new("cinematic");
        timeline.set_time(-3.0);
        assert_eq!(timeline.time(), 0.0);
    }
}
