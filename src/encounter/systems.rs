//! Turn-controller systems: spawning, remedy resolution, day transitions.
use bevy::{math::primitives::Capsule3d, prelude::*};

use crate::{
    core::plugin::SimulationClock,
    encounter::{
        config::{EncounterSettings, MonsterPool},
        errors::EncounterError,
        events::{EncounterOutcome, EncounterResolvedEvent, RemedyConsumedEvent},
        pill::{remedy_matches, Remedy},
        resources::{EncounterPhase, EncounterRng, EncounterState, PendingReload, ReloadPoll},
    },
    monster::{
        anomaly::AnomalyRig,
        audio::{LoopedCue, MonsterAudio},
        components::{AnimatorRig, Monster, MonsterKind, MonsterState},
        systems::on_turn_start,
    },
    scene::{
        flow::{SceneFlow, SceneReloadedEvent, SceneScoped},
        timeline::{Timeline, TimelineRegistry},
    },
};

const REMEDY_ROW_CENTER: Vec3 = Vec3::new(0.0, 0.9, 2.5);
const REMEDY_SPACING: f32 = 0.7;

/// Spawns the first day's encounter once the scene exists.
#[allow(clippy::too_many_arguments)]
pub fn spawn_initial_encounter(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<EncounterSettings>,
    pool: Res<MonsterPool>,
    mut state: ResMut<EncounterState>,
    mut rng: ResMut<EncounterRng>,
    mut registry: ResMut<TimelineRegistry>,
    clock: Res<SimulationClock>,
) {
    spawn_encounter(
        &mut commands,
        &mut meshes,
        &mut materials,
        &settings,
        &pool,
        &mut state,
        &mut rng,
        &mut registry,
        &clock,
    );
}

/// Rebuilds the encounter after a day-advance reload tore the room down.
#[allow(clippy::too_many_arguments)]
pub fn respawn_after_reload(
    mut reloaded: MessageReader<SceneReloadedEvent>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<EncounterSettings>,
    pool: Res<MonsterPool>,
    mut state: ResMut<EncounterState>,
    mut rng: ResMut<EncounterRng>,
    mut registry: ResMut<TimelineRegistry>,
    clock: Res<SimulationClock>,
) {
    let mut reload_seen = false;
    for _ in reloaded.read() {
        reload_seen = true;
    }
    if !reload_seen || state.phase != EncounterPhase::Idle {
        return;
    }

    spawn_encounter(
        &mut commands,
        &mut meshes,
        &mut materials,
        &settings,
        &pool,
        &mut state,
        &mut rng,
        &mut registry,
        &clock,
    );
}

/// Draws one monster from the pool and stands the day up: replaces any
/// previous monster, invalidates its deferred actions, lays the remedy
/// table out, and runs the turn-start hook. Configuration problems abort
/// loudly and leave the controller idle.
#[allow(clippy::too_many_arguments)]
fn spawn_encounter(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &EncounterSettings,
    pool: &MonsterPool,
    state: &mut EncounterState,
    rng: &mut EncounterRng,
    registry: &mut TimelineRegistry,
    clock: &SimulationClock,
) {
    let Some(index) = rng.pick_index(pool.len()) else {
        error!("Spawn aborted: {}", EncounterError::EmptyMonsterPool);
        return;
    };
    let spec = match pool.validated_entry(index) {
        Ok(spec) => spec.clone(),
        Err(error) => {
            error!("Spawn aborted: {error}");
            return;
        }
    };

    if let Some(previous) = state.take_active() {
        warn!("Active monster replaced before its encounter resolved");
        commands.entity(previous).despawn();
    }
    // New generation: deferred actions of the old encounter can never fire.
    state.bump_epoch();

    let now = clock.elapsed_seconds();
    let mut rig = AnimatorRig::from_descriptors(spec.declared_params().iter());
    let audio = MonsterAudio::new(
        spec.ambient_cue.as_deref().map(LoopedCue::new),
        spec.running_cue.as_deref().map(LoopedCue::new),
    );
    let mut anomaly_rig = (spec.kind == MonsterKind::Anomaly).then(|| {
        let bound = spec
            .anomaly_timeline
            .as_deref()
            .and_then(|name| registry.lookup(name));
        AnomalyRig::new(
            spec.anomaly_replayable,
            bound,
            spec.anomaly_timeline.clone(),
            Some(Timeline::new(format!("{}-local-cutscene", spec.name))),
        )
    });

    on_turn_start(&spec, &mut rig, anomaly_rig.as_mut(), registry, rng.rng_mut());

    let body_color = match spec.kind {
        MonsterKind::Generic => Color::srgb_u8(150, 60, 60),
        MonsterKind::Anomaly => Color::srgb_u8(200, 190, 230),
        MonsterKind::Haunt => Color::srgb_u8(70, 90, 120),
    };

    let monster = {
        let mut spawned = commands.spawn((
            Mesh3d(meshes.add(Mesh::from(Capsule3d::new(0.45, 1.4)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: body_color,
                ..default()
            })),
            Transform::from_translation(settings.spawn_point),
            MonsterState::at_spawn(&spec, now),
            rig,
            audio,
            SceneScoped,
            Name::new(format!("Monster {}", spec.name)),
        ));
        if let Some(anomaly_rig) = anomaly_rig {
            spawned.insert(anomaly_rig);
        }
        spawned.insert(Monster { spec: spec.clone() });
        spawned.id()
    };

    state.begin_encounter(monster);
    info!(
        "Day {}: {} appears ({} kind)",
        state.day_index(),
        spec.name,
        spec.kind
    );

    spawn_remedy_table(commands, meshes, materials, pool);
}

/// Lays out one remedy per distinct identifier in the pool, so each day
/// presents the correct remedy among its decoys.
fn spawn_remedy_table(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pool: &MonsterPool,
) {
    let ids = pool.remedy_ids();
    if ids.is_empty() {
        warn!("No remedies configured; the table stays empty");
        return;
    }

    let row_offset = (ids.len() as f32 - 1.0) * REMEDY_SPACING / 2.0;
    for (slot, id) in ids.into_iter().enumerate() {
        let position =
            REMEDY_ROW_CENTER + Vec3::new(slot as f32 * REMEDY_SPACING - row_offset, 0.0, 0.0);
        commands.spawn((
            Mesh3d(meshes.add(Mesh::from(Capsule3d::new(0.07, 0.1)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb_u8(230, 228, 210),
                ..default()
            })),
            Transform::from_translation(position),
            Remedy::new(id.clone()),
            SceneScoped,
            Name::new(format!("Remedy {id}")),
        ));
    }
}

/// Maps a consumed remedy to the encounter outcome it produces.
fn resolve_outcome(presented: &str, required: &str) -> EncounterOutcome {
    if remedy_matches(presented, required) {
        EncounterOutcome::DayAdvance
    } else {
        EncounterOutcome::GameOver
    }
}

/// Validates consumed remedies against the active monster and schedules
/// the resulting transition.
pub fn handle_remedy_consumed(
    mut events: MessageReader<RemedyConsumedEvent>,
    mut state: ResMut<EncounterState>,
    monsters: Query<&Monster>,
    settings: Res<EncounterSettings>,
    clock: Res<SimulationClock>,
    mut pending: ResMut<PendingReload>,
    mut flow: ResMut<SceneFlow>,
    mut resolved: MessageWriter<EncounterResolvedEvent>,
) {
    for event in events.read() {
        if state.phase != EncounterPhase::AwaitingRemedy {
            warn!(
                "{} (controller is {})",
                EncounterError::NoActiveEncounter,
                state.phase.label()
            );
            continue;
        }
        let Some(active) = state.active() else {
            warn!("{}", EncounterError::NoActiveEncounter);
            continue;
        };
        let Ok(monster) = monsters.get(active) else {
            warn!("Active monster entity vanished; dropping consumed remedy");
            continue;
        };

        if event.remedy_id.trim().is_empty() {
            // Counts as an incorrect answer while a monster is active.
            warn!("{}", EncounterError::InvalidRemedyInput);
        }

        let day = state.day_index();
        let outcome = resolve_outcome(&event.remedy_id, &monster.spec.required_remedy);
        match outcome {
            EncounterOutcome::DayAdvance => {
                state.phase = EncounterPhase::DayAdvancePending;
                pending.schedule(
                    clock.elapsed_seconds() + settings.day_advance_delay,
                    state.epoch(),
                );
                info!(
                    "Correct remedy '{}' for {}; the night passes",
                    event.remedy_id.trim(),
                    monster.spec.name
                );
            }
            EncounterOutcome::GameOver => {
                state.phase = EncounterPhase::GameOver;
                state.bump_epoch();
                info!(
                    "Remedy '{}' was wrong for {}. Game over on day {day}.",
                    event.remedy_id.trim(),
                    monster.spec.name
                );
                match settings.game_over_scene.as_deref() {
                    Some(scene) => flow.request_load(scene),
                    None => flow.request_freeze(),
                }
            }
        }
        resolved.write(EncounterResolvedEvent {
            day,
            monster: monster.spec.name.clone(),
            outcome,
        });
    }
}

/// Developer-facing trace of resolved encounters.
pub fn log_encounter_outcomes(mut resolved: MessageReader<EncounterResolvedEvent>) {
    for event in resolved.read() {
        debug!(
            target: "encounter",
            "Day {}: {} resolved with {:?}",
            event.day, event.monster, event.outcome
        );
    }
}

/// Polls the deferred day-advance and executes it when due.
pub fn process_pending_reload(
    clock: Res<SimulationClock>,
    mut state: ResMut<EncounterState>,
    mut pending: ResMut<PendingReload>,
    mut flow: ResMut<SceneFlow>,
) {
    match pending.poll(clock.elapsed_seconds(), state.epoch()) {
        ReloadPoll::Due => {
            state.advance_day();
            info!("Day {} begins", state.day_index());
            flow.request_reload();
        }
        ReloadPoll::Stale => {
            debug!("Dropped a day-advance scheduled for a replaced encounter");
        }
        ReloadPoll::Empty | ReloadPoll::Pending => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_case_folded_remedy_advances_the_day() {
        assert_eq!(
            resolve_outcome("  calmante ", "Calmante"),
            EncounterOutcome::DayAdvance
        );
    }

    #[test]
    fn wrong_remedy_ends_the_game() {
        assert_eq!(
            resolve_outcome("Estimulante", "Calmante"),
            EncounterOutcome::GameOver
        );
    }

    #[test]
    fn blank_remedy_counts_as_wrong() {
        assert_eq!(
            resolve_outcome("   ", "Calmante"),
            EncounterOutcome::GameOver
        );
    }
}
