//! Components and resources for player interaction with remedies.
use bevy::prelude::*;

/// Marker component identifying the player entity (carries the camera).
#[derive(Component, Debug)]
pub struct Player;

/// Resource tracking which remedy the player could consume right now.
#[derive(Resource, Default, Debug)]
pub struct PlayerInteractionState {
    pub nearby_remedy: Option<NearbyRemedy>,
}

/// A remedy within interaction range of the player.
#[derive(Debug, Clone)]
pub struct NearbyRemedy {
    pub entity: Entity,
    pub id: String,
    pub distance: f32,
}
