//! Per-frame monster behavior: movement, blend values, audio transitions.
use bevy::prelude::*;
use rand::rngs::StdRng;

use crate::{
    core::plugin::SimulationClock,
    monster::{
        anomaly::{self, AnomalyActivation, AnomalyRig},
        audio::{desired_cues, MonsterAudio},
        blend::{self, BlendMode},
        components::{AnimatorRig, ChaseTarget, Monster, MonsterKind, MonsterSpec, MonsterState, ParamKind},
    },
    scene::timeline::TimelineRegistry,
};

/// Distance under which a monster counts as having reached its target.
const ARRIVAL_EPSILON: f32 = 0.05;

/// Advances every live monster one simulation step toward the chase target.
pub fn tick_monsters(
    clock: Res<SimulationClock>,
    target_query: Query<&Transform, (With<ChaseTarget>, Without<Monster>)>,
    mut monsters: Query<(
        &Monster,
        &mut MonsterState,
        &mut AnimatorRig,
        &mut MonsterAudio,
        &mut Transform,
    )>,
) {
    if clock.is_frozen() {
        return;
    }

    let Ok(target_transform) = target_query.single() else {
        return;
    };
    let target = target_transform.translation;
    let now = clock.elapsed_seconds();
    let delta = clock.last_scaled_delta().as_secs_f32();

    for (monster, mut state, mut rig, mut audio, mut transform) in monsters.iter_mut() {
        tick_monster(
            &monster.spec,
            &mut state,
            &mut rig,
            &mut audio,
            &mut transform.translation,
            target,
            now,
            delta,
        );
        // Face along the horizontal travel direction.
        let yaw = if state.facing_sign < 0.0 {
            std::f32::consts::PI
        } else {
            0.0
        };
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}

/// One simulation step for a single monster. Split from the system so the
/// state machine can be driven directly in tests.
#[allow(clippy::too_many_arguments)]
pub fn tick_monster(
    spec: &MonsterSpec,
    state: &mut MonsterState,
    rig: &mut AnimatorRig,
    audio: &mut MonsterAudio,
    position: &mut Vec3,
    target: Vec3,
    now: f32,
    delta: f32,
) {
    // Anomalies are timeline-driven: no movement, no audio.
    if spec.kind == MonsterKind::Anomaly {
        return;
    }

    if !state.movement_enabled {
        if now >= state.movement_enable_at {
            state.movement_enabled = true;
            debug!("{}: movement enabled", spec.name);
        } else {
            return;
        }
    }

    let planar = Vec2::new(target.x - position.x, target.z - position.z);
    let distance = planar.length();
    let active = distance > ARRIVAL_EPSILON;

    if active {
        let step = (spec.move_speed * delta).min(distance);
        let direction = planar / distance;
        position.x += direction.x * step;
        position.z += direction.y * step;
        if direction.x.abs() > f32::EPSILON {
            state.facing_sign = direction.x.signum();
        }
    }

    let sample = blend::sample(spec.blend_mode, spec.move_speed, planar, active);
    match spec.blend_mode {
        BlendMode::OneD => rig.set_scalar(&spec.state_param, sample.primary),
        BlendMode::TwoD => {
            if let (Some((x_param, y_param)), Some(axes)) = (&spec.axis_params, sample.axes) {
                rig.set_float(&x_param.name, axes.x);
                rig.set_float(&y_param.name, axes.y);
            } else if spec.axis_params.is_none() {
                warn!("{}: 2-D blend mode without axis parameters; blend skipped", spec.name);
            }
        }
    }
    state.blend_value = sample.scalar;

    let was_running = state.is_running;
    state.is_running = blend::is_running(state.blend_value, spec.run_threshold);
    if state.is_running != was_running {
        debug!(
            "{}: running = {} (blend {:.2} vs threshold {:.2})",
            spec.name, state.is_running, state.blend_value, spec.run_threshold
        );
    }

    audio.apply(desired_cues(spec.kind, state.is_running), &spec.name);
}

/// Turn-start hook, invoked once by the turn controller right after spawn:
/// anomalies start their cutscene, everything else strikes a random pose.
pub fn on_turn_start(
    spec: &MonsterSpec,
    rig: &mut AnimatorRig,
    anomaly_rig: Option<&mut AnomalyRig>,
    registry: &mut TimelineRegistry,
    rng: &mut StdRng,
) {
    if spec.kind == MonsterKind::Anomaly {
        match anomaly_rig {
            Some(anomaly_rig) => match anomaly::activate(anomaly_rig, registry) {
                AnomalyActivation::Fired { target } => {
                    debug!("{}: turn opened by cutscene '{target}'", spec.name);
                }
                AnomalyActivation::AlreadyPlayed | AnomalyActivation::NoTarget => {}
            },
            None => warn!("{}: anomaly monster without a cutscene rig", spec.name),
        }
        return;
    }

    activate_random_blend_state(spec, rig, rng);
}

/// Strikes a uniformly random blend-tree state through the state parameter,
/// independent of movement. No-op (with a warning) on an empty tree.
pub fn activate_random_blend_state(
    spec: &MonsterSpec,
    rig: &mut AnimatorRig,
    rng: &mut StdRng,
) {
    match spec.state_param.kind {
        ParamKind::Int => match blend::random_state_index(spec.blend_state_count, rng) {
            Some(index) => {
                rig.set_int(&spec.state_param.name, index);
                debug!("{}: blend state {index} activated", spec.name);
            }
            None => warn!("{}: blend tree has no states to activate", spec.name),
        },
        ParamKind::Float => match blend::random_state_value(spec.blend_state_count, rng) {
            Some(value) => {
                rig.set_float(&spec.state_param.name, value);
                debug!("{}: blend value {value:.2} activated", spec.name);
            }
            None => warn!("{}: blend tree has no states to activate", spec.name),
        },
    }
}
