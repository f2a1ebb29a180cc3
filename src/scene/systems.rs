//! Scene setup: the room itself and its pre-authored timelines.
use bevy::{math::primitives::Plane3d, prelude::*};

use crate::scene::timeline::TimelineRegistry;

const ROOM_SCALE: f32 = 30.0;

/// Timelines authored into the room, registered before anything can bind
/// to them.
const SCENE_TIMELINES: [&str; 1] = ["anomaly-cinematic"];

/// Spawns the single room: floor and one dim lamp. Deliberately sparse;
/// everything else arrives with the encounter.
pub fn spawn_room(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(40, 38, 36),
            perceptual_roughness: 0.95,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(ROOM_SCALE)),
        Name::new("Room floor"),
    ));

    commands.spawn((
        PointLight {
            intensity: 60_000.0,
            color: Color::srgb_u8(255, 220, 170),
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 3.5, 1.0),
        Name::new("Room lamp"),
    ));
}

/// Registers the room's named timelines.
pub fn register_scene_timelines(mut registry: ResMut<TimelineRegistry>) {
    for name in SCENE_TIMELINES {
        registry.register(name);
        debug!("Registered scene timeline '{name}'");
    }
}
