//! ScenePlugin registers scene-flow state and the transition applier.
use bevy::prelude::*;

use crate::scene::{
    flow::{apply_scene_requests, GamePhase, SceneFlow, SceneReloadedEvent},
    systems::{register_scene_timelines, spawn_room},
    timeline::TimelineRegistry,
};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GamePhase>()
            .init_resource::<SceneFlow>()
            .init_resource::<TimelineRegistry>()
            .add_event::<SceneReloadedEvent>()
            .add_systems(Startup, (register_scene_timelines, spawn_room))
            .add_systems(Update, apply_scene_requests);
    }
}
