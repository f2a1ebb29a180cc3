//! Scene-flow requests: reload, scene change, and simulation freeze.
use bevy::prelude::*;

use crate::core::plugin::SimulationClock;

/// Coarse session phase. GameOver is terminal until the process restarts.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    GameOver,
}

/// Marker for entities that belong to the current scene pass and are
/// despawned on reload (monsters, remedies, feedback props).
#[derive(Component, Debug, Default)]
pub struct SceneScoped;

/// A single transition request issued by the turn controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// Tear down scene-scoped entities and restart the current room.
    ReloadCurrent,
    /// Leave the room for a named scene (the game-over scene).
    Load(String),
    /// Halt the simulation clock in place.
    Freeze,
}

/// Message emitted once a reload request has torn the room down; spawners
/// listen for this to rebuild the encounter.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct SceneReloadedEvent;

/// Request inbox for scene transitions. The turn controller writes into
/// this; `apply_scene_requests` drains it once per frame.
#[derive(Resource, Debug, Default)]
pub struct SceneFlow {
    requests: Vec<SceneRequest>,
}

impl SceneFlow {
    pub fn request_reload(&mut self) {
        self.requests.push(SceneRequest::ReloadCurrent);
    }

    pub fn request_load(&mut self, scene: impl Into<String>) {
        self.requests.push(SceneRequest::Load(scene.into()));
    }

    pub fn request_freeze(&mut self) {
        self.requests.push(SceneRequest::Freeze);
    }

    pub fn drain(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.requests)
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[SceneRequest] {
        &self.requests
    }
}

/// Applies queued scene requests: despawns scene-scoped entities on reload
/// or scene change, freezes the clock on request, and flips the phase for
/// terminal transitions.
pub fn apply_scene_requests(
    mut commands: Commands,
    mut flow: ResMut<SceneFlow>,
    mut phase: ResMut<GamePhase>,
    mut clock: ResMut<SimulationClock>,
    mut reloaded: MessageWriter<SceneReloadedEvent>,
    scoped: Query<Entity, With<SceneScoped>>,
) {
    for request in flow.drain() {
        match request {
            SceneRequest::ReloadCurrent => {
                let mut count = 0;
                for entity in scoped.iter() {
                    commands.entity(entity).despawn();
                    count += 1;
                }
                info!("Scene reload: despawned {count} scene-scoped entities");
                reloaded.write(SceneReloadedEvent);
            }
            SceneRequest::Load(scene) => {
                for entity in scoped.iter() {
                    commands.entity(entity).despawn();
                }
                *phase = GamePhase::GameOver;
                info!("Leaving room for scene '{scene}'");
            }
            SceneRequest::Freeze => {
                clock.freeze();
                *phase = GamePhase::GameOver;
                info!("Simulation frozen. Restart the program to play again.");
            }
        }
    }
}
