//! Monster configuration, runtime state, and the animator parameter rig.
use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;

use crate::monster::blend::BlendMode;

/// Behavioural family of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterKind {
    /// Physically simulated hunter; silent except while running.
    Generic,
    /// Timeline-driven apparition; never physically simulated.
    Anomaly,
    /// Physically simulated; keeps an ambient loop up for its whole life.
    Haunt,
}

impl MonsterKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Anomaly => "anomaly",
            Self::Haunt => "haunt",
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Value type of an animator parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Int,
}

/// Statically declared animator parameter: name plus value type. Declared
/// up front in the monster spec so the rig never infers types at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamDescriptor {
    pub fn float(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Float,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Int,
        }
    }
}

/// Immutable per-monster configuration, cloned from the pool at spawn.
#[derive(Debug, Clone)]
pub struct MonsterSpec {
    pub name: String,
    pub kind: MonsterKind,
    pub required_remedy: String,
    pub move_speed: f32,
    pub run_threshold: f32,
    /// Seconds after spawn before movement unlocks; zero or less unlocks
    /// immediately.
    pub move_delay: f32,
    pub blend_mode: BlendMode,
    pub blend_state_count: u32,
    /// Parameter driving the 1-D blend value and random state activation.
    pub state_param: ParamDescriptor,
    /// The two float axes written in 2-D mode.
    pub axis_params: Option<(ParamDescriptor, ParamDescriptor)>,
    pub ambient_cue: Option<String>,
    pub running_cue: Option<String>,
    /// Registry name of the cutscene to look up for anomaly activation.
    pub anomaly_timeline: Option<String>,
    /// Whether the anomaly cutscene may fire more than once.
    pub anomaly_replayable: bool,
}

impl MonsterSpec {
    /// All animator parameters this spec declares.
    pub fn declared_params(&self) -> Vec<ParamDescriptor> {
        let mut params = vec![self.state_param.clone()];
        if let Some((x, y)) = &self.axis_params {
            params.push(x.clone());
            params.push(y.clone());
        }
        params
    }
}

/// The behavior component of one live monster entity.
#[derive(Component, Debug)]
pub struct Monster {
    pub spec: MonsterSpec,
}

/// Mutable per-frame state of a monster. Created at spawn, dies with the
/// entity. Position lives in the entity `Transform`.
#[derive(Component, Debug)]
pub struct MonsterState {
    pub facing_sign: f32,
    pub movement_enabled: bool,
    /// Simulation-clock timestamp when movement unlocks; 0 when already
    /// enabled.
    pub movement_enable_at: f32,
    pub blend_value: f32,
    pub is_running: bool,
}

impl MonsterState {
    /// Initialises runtime state for a spec spawned at clock time `now`.
    pub fn at_spawn(spec: &MonsterSpec, now: f32) -> Self {
        let movement_enabled = spec.move_delay <= 0.0;
        Self {
            facing_sign: 1.0,
            movement_enabled,
            movement_enable_at: if movement_enabled {
                0.0
            } else {
                now + spec.move_delay
            },
            blend_value: 0.0,
            is_running: false,
        }
    }
}

/// Marker for the entity monsters move toward (the player).
#[derive(Component, Debug, Default)]
pub struct ChaseTarget;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamValue {
    Float(f32),
    Int(i32),
}

/// Current values of the declared animator parameters of one monster.
///
/// Writes against undeclared names or mismatched kinds are skipped with a
/// warning; the tick itself never fails over a missing binding.
#[derive(Component, Debug, Default)]
pub struct AnimatorRig {
    params: HashMap<String, ParamValue>,
}

impl AnimatorRig {
    pub fn from_descriptors<'a>(descriptors: impl IntoIterator<Item = &'a ParamDescriptor>) -> Self {
        let mut params = HashMap::new();
        for descriptor in descriptors {
            let initial = match descriptor.kind {
                ParamKind::Float => ParamValue::Float(0.0),
                ParamKind::Int => ParamValue::Int(0),
            };
            params.insert(descriptor.name.clone(), initial);
        }
        Self { params }
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        match self.params.get_mut(name) {
            Some(ParamValue::Float(slot)) => *slot = value,
            Some(ParamValue::Int(_)) => {
                warn!("Animator parameter '{name}' is an int; float write skipped");
            }
            None => warn!("Animator parameter '{name}' not declared; float write skipped"),
        }
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        match self.params.get_mut(name) {
            Some(ParamValue::Int(slot)) => *slot = value,
            Some(ParamValue::Float(_)) => {
                warn!("Animator parameter '{name}' is a float; int write skipped");
            }
            None => warn!("Animator parameter '{name}' not declared; int write skipped"),
        }
    }

    /// Writes a value through a descriptor, coercing to the declared kind.
    pub fn set_scalar(&mut self, descriptor: &ParamDescriptor, value: f32) {
        match descriptor.kind {
            ParamKind::Float => self.set_float(&descriptor.name, value),
            ParamKind::Int => self.set_int(&descriptor.name, value.round() as i32),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.params.get(name) {
            Some(ParamValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.params.get(name) {
            Some(ParamValue::Int(value)) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(move_delay: f32) -> MonsterSpec {
        MonsterSpec {
            name: "Zombi".to_string(),
            kind: MonsterKind::Generic,
            required_remedy: "Calmante".to_string(),
            move_speed: 2.0,
            run_threshold: 1.5,
            move_delay,
            blend_mode: BlendMode::OneD,
            blend_state_count: 3,
            state_param: ParamDescriptor::int("State"),
            axis_params: None,
            ambient_cue: None,
            running_cue: Some("ZombiRun".to_string()),
            anomaly_timeline: None,
            anomaly_replayable: false,
        }
    }

    #[test]
    fn zero_delay_enables_movement_at_spawn() {
        let state = MonsterState::at_spawn(&spec(0.0), 10.0);
        assert!(state.movement_enabled);
        assert_eq!(state.movement_enable_at, 0.0);
    }

    #[test]
    fn positive_delay_schedules_enable_time() {
        let state = MonsterState::at_spawn(&spec(1.5), 10.0);
        assert!(!state.movement_enabled);
        assert_eq!(state.movement_enable_at, 11.5);
    }

    #[test]
    fn rig_rejects_undeclared_and_mismatched_writes() {
        let mut rig = AnimatorRig::from_descriptors(
            [ParamDescriptor::int("State"), ParamDescriptor::float("BlendX")].iter(),
        );

        rig.set_int("State", 2);
        assert_eq!(rig.int("State"), Some(2));

        // Kind mismatch: skipped, old value preserved.
        rig.set_float("State", 7.0);
        assert_eq!(rig.int("State"), Some(2));

        // Undeclared: skipped entirely.
        rig.set_float("Missing", 1.0);
        assert_eq!(rig.float("Missing"), None);

        rig.set_float("BlendX", 0.5);
        assert_eq!(rig.float("BlendX"), Some(0.5));
    }

    #[test]
    fn scalar_write_coerces_to_declared_kind() {
        let mut rig = AnimatorRig::from_descriptors(
            [ParamDescriptor::int("State"), ParamDescriptor::float("Speed")].iter(),
        );

        rig.set_scalar(&ParamDescriptor::int("State"), 1.6);
        assert_eq!(rig.int("State"), Some(2));

        rig.set_scalar(&ParamDescriptor::float("Speed"), 1.6);
        assert_eq!(rig.float("Speed"), Some(1.6));
    }

    #[test]
    fn declared_params_cover_axes() {
        let mut two_d = spec(0.0);
        two_d.blend_mode = BlendMode::TwoD;
        two_d.axis_params = Some((ParamDescriptor::float("BlendX"), ParamDescriptor::float("BlendY")));

        let names: Vec<String> = two_d
            .declared_params()
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect();
        assert_eq!(names, vec!["State", "BlendX", "BlendY"]);
    }
}
