//! Systems for player movement and remedy interaction.
use bevy::prelude::*;

use crate::{
    encounter::{events::RemedyConsumedEvent, pill::Remedy},
    monster::components::ChaseTarget,
    player::components::{NearbyRemedy, Player, PlayerInteractionState},
    scene::flow::GamePhase,
};

/// Maximum distance (in world units) for consuming a remedy.
const INTERACTION_RANGE: f32 = 4.0;
/// Where the player wakes up, facing the dark end of the room.
const PLAYER_START: Vec3 = Vec3::new(0.0, 1.6, 4.5);
const WALK_SPEED: f32 = 3.0;

/// Spawns the player: a camera the monsters home in on.
pub fn spawn_player(mut commands: Commands) {
    let mut transform = Transform::from_translation(PLAYER_START);
    transform.look_at(Vec3::new(0.0, 1.0, -6.0), Vec3::Y);

    commands.spawn((
        Camera3d::default(),
        transform,
        Player,
        ChaseTarget,
        Name::new("Player"),
    ));
}

/// Moves the player on the room plane with WASD.
pub fn walk_player(
    phase: Res<GamePhase>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    if *phase != GamePhase::Playing {
        return;
    }
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let forward = {
        let f = transform.forward().as_vec3();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    };
    let right = {
        let r = transform.right().as_vec3();
        Vec3::new(r.x, 0.0, r.z).normalize_or_zero()
    };

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction += -forward;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction += -right;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }

    if direction.length_squared() > 0.0 {
        transform.translation += direction.normalize() * WALK_SPEED * time.delta_secs();
    }
}

/// Finds the closest unconsumed remedy within interaction range.
pub fn detect_nearby_remedies(
    player_query: Query<&Transform, With<Player>>,
    remedy_query: Query<(Entity, &Transform, &Remedy)>,
    mut interaction_state: ResMut<PlayerInteractionState>,
) {
    let Ok(player_transform) = player_query.single() else {
        interaction_state.nearby_remedy = None;
        return;
    };
    let player_pos = player_transform.translation;

    let mut nearest: Option<NearbyRemedy> = None;
    for (entity, transform, remedy) in remedy_query.iter() {
        if remedy.is_consumed() {
            continue;
        }
        let distance = player_pos.distance(transform.translation);
        if distance > INTERACTION_RANGE {
            continue;
        }
        let closer = nearest
            .as_ref()
            .map(|candidate| distance < candidate.distance)
            .unwrap_or(true);
        if closer {
            nearest = Some(NearbyRemedy {
                entity,
                id: remedy.id().to_string(),
                distance,
            });
        }
    }

    interaction_state.nearby_remedy = nearest;
}

/// Consumes the nearby remedy on E and reports it to the turn controller.
pub fn handle_interact_input(
    mut commands: Commands,
    phase: Res<GamePhase>,
    keyboard: Res<ButtonInput<KeyCode>>,
    interaction_state: Res<PlayerInteractionState>,
    mut remedies: Query<&mut Remedy>,
    mut consumed: MessageWriter<RemedyConsumedEvent>,
) {
    if *phase != GamePhase::Playing {
        return;
    }
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }

    let Some(nearby) = interaction_state.nearby_remedy.clone() else {
        debug!("Player pressed E with no remedy in reach");
        return;
    };
    let Ok(mut remedy) = remedies.get_mut(nearby.entity) else {
        return;
    };
    let Some(remedy_id) = remedy.consume() else {
        debug!("Remedy '{}' already consumed", nearby.id);
        return;
    };

    info!(
        "Player swallows '{}' (distance {:.1})",
        remedy_id, nearby.distance
    );
    consumed.write(RemedyConsumedEvent { remedy_id });
    commands.entity(nearby.entity).despawn();
}
