//! Encounter plugin: the turn controller owning the daily monster cycle.
use bevy::prelude::*;

use crate::{
    encounter::{
        config,
        events::{EncounterResolvedEvent, RemedyConsumedEvent},
        resources::{EncounterRng, EncounterState, PendingReload},
        systems::{
            handle_remedy_consumed, log_encounter_outcomes, process_pending_reload,
            respawn_after_reload, spawn_initial_encounter,
        },
    },
    player::systems::handle_interact_input,
    scene::{flow::apply_scene_requests, systems::register_scene_timelines},
};

pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        let (settings, pool) = config::load_or_default();
        info!(
            "Encounter loop configured: {} monsters, day-advance delay {:.2}s, game-over {}",
            pool.len(),
            settings.day_advance_delay,
            settings
                .game_over_scene
                .as_deref()
                .unwrap_or("freezes the simulation"),
        );

        let rng = EncounterRng::new(settings.rng_seed);

        app.insert_resource(settings)
            .insert_resource(pool)
            .insert_resource(rng)
            .init_resource::<EncounterState>()
            .init_resource::<PendingReload>()
            .add_event::<RemedyConsumedEvent>()
            .add_event::<EncounterResolvedEvent>()
            .add_systems(
                Startup,
                spawn_initial_encounter.after(register_scene_timelines),
            )
            .add_systems(
                Update,
                (
                    handle_remedy_consumed
                        .after(handle_interact_input)
                        .before(apply_scene_requests),
                    process_pending_reload
                        .after(handle_remedy_consumed)
                        .before(apply_scene_requests),
                    respawn_after_reload.after(apply_scene_requests),
                    log_encounter_outcomes.after(handle_remedy_consumed),
                ),
            );
    }
}
