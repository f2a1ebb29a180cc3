//! Player plugin wiring movement and remedy interaction.
use bevy::prelude::*;

use crate::player::{
    components::PlayerInteractionState,
    systems::{detect_nearby_remedies, handle_interact_input, spawn_player, walk_player},
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInteractionState>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    walk_player,
                    detect_nearby_remedies.after(walk_player),
                    handle_interact_input.after(detect_nearby_remedies),
                ),
            );
    }
}
