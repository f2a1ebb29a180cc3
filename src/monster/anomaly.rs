//! Anomaly cutscene trigger: a latched, deterministic timeline restart.
use bevy::prelude::*;

use crate::scene::timeline::{Timeline, TimelineHandle, TimelineRegistry};

/// Firing state of the anomaly trigger.
///
/// `NotTriggered` fires once and becomes `Triggered`; `Replayable` fires on
/// every activation; `Triggered` never fires again. The latch never moves
/// backwards within a monster's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyLatch {
    NotTriggered,
    Triggered,
    Replayable,
}

impl AnomalyLatch {
    pub fn new(allow_repeat: bool) -> Self {
        if allow_repeat {
            Self::Replayable
        } else {
            Self::NotTriggered
        }
    }

    pub fn can_fire(self) -> bool {
        matches!(self, Self::NotTriggered | Self::Replayable)
    }

    fn note_fired(&mut self) {
        if *self == Self::NotTriggered {
            *self = Self::Triggered;
        }
    }
}

/// Timeline bindings of one anomaly monster. Resolution order at
/// activation: the injected handle, then a registry lookup by name, then
/// the locally owned fallback. Exactly one path runs per activation.
#[derive(Component, Debug)]
pub struct AnomalyRig {
    pub latch: AnomalyLatch,
    pub bound: Option<TimelineHandle>,
    pub lookup_name: Option<String>,
    pub fallback: Option<Timeline>,
}

impl AnomalyRig {
    pub fn new(
        allow_repeat: bool,
        bound: Option<TimelineHandle>,
        lookup_name: Option<String>,
        fallback: Option<Timeline>,
    ) -> Self {
        Self {
            latch: AnomalyLatch::new(allow_repeat),
            bound,
            lookup_name,
            fallback,
        }
    }
}

/// What an activation attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyActivation {
    /// A timeline was restarted from time zero.
    Fired { target: String },
    /// The latch had already fired; nothing happened.
    AlreadyPlayed,
    /// No resolution path yielded a playable target; nothing happened.
    NoTarget,
}

/// Activates the anomaly cutscene: resolves a timeline, restarts it from
/// time zero (stop, rewind, play) so replay is deterministic even if it was
/// partially played before, and advances the latch.
pub fn activate(rig: &mut AnomalyRig, registry: &mut TimelineRegistry) -> AnomalyActivation {
    if !rig.latch.can_fire() {
        debug!("Anomaly cutscene already played; activation ignored");
        return AnomalyActivation::AlreadyPlayed;
    }

    let timeline = resolve_target(rig, registry);
    let Some(timeline) = timeline else {
        warn!("Anomaly activation found no playable timeline; skipping");
        return AnomalyActivation::NoTarget;
    };

    timeline.stop();
    timeline.set_time(0.0);
    timeline.play();
    let target = timeline.name().to_string();
    info!("Anomaly cutscene '{target}' started");

    rig.latch.note_fired();
    AnomalyActivation::Fired { target }
}

fn resolve_target<'a>(
    rig: &'a mut AnomalyRig,
    registry: &'a mut TimelineRegistry,
) -> Option<&'a mut Timeline> {
    if let Some(handle) = rig.bound {
        if registry.get(handle).is_some() {
            return registry.get_mut(handle);
        }
        warn!("Bound anomaly timeline handle is stale; trying name lookup");
    }

    if let Some(name) = rig.lookup_name.as_deref() {
        if let Some(handle) = registry.lookup(name) {
            return registry.get_mut(handle);
        }
        warn!("No scene timeline named '{name}'; trying local fallback");
    }

    rig.fallback.as_mut()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(name: &str) -> (TimelineRegistry, TimelineHandle) {
        let mut registry = TimelineRegistry::default();
        let handle = registry.register(name);
        (registry, handle)
    }

    #[test]
    fn one_shot_latch_fires_exactly_once() {
        let (mut registry, handle) = registry_with("anomaly-cinematic");
        let mut rig = AnomalyRig::new(false, Some(handle), None, None);

        let first = activate(&mut rig, &mut registry);
        assert!(matches!(first, AnomalyActivation::Fired { .. }));

        let second = activate(&mut rig, &mut registry);
        assert_eq!(second, AnomalyActivation::AlreadyPlayed);

        let timeline = registry.get(handle).expect("registered timeline");
        assert_eq!(timeline.times_started(), 1);
    }

    #[test]
    fn replayable_latch_fires_every_time() {
        let (mut registry, handle) = registry_with("anomaly-cinematic");
        let mut rig = AnomalyRig::new(true, Some(handle), None, None);

        for _ in 0..3 {
            let outcome = activate(&mut rig, &mut registry);
            assert!(matches!(outcome, AnomalyActivation::Fired { .. }));
        }
        assert_eq!(rig.latch, AnomalyLatch::Replayable);

        let timeline = registry.get(handle).expect("registered timeline");
        assert_eq!(timeline.times_started(), 3);
    }

    #[test]
    fn restart_rewinds_partially_played_timeline() {
        let (mut registry, handle) = registry_with("anomaly-cinematic");
        registry
            .get_mut(handle)
            .expect("registered timeline")
            .set_time(4.2);

        let mut rig = AnomalyRig::new(false, Some(handle), None, None);
        activate(&mut rig, &mut registry);

        let timeline = registry.get(handle).expect("registered timeline");
        assert_eq!(timeline.time(), 0.0);
    }

    #[test]
    fn name_lookup_used_when_no_bound_handle() {
        let (mut registry, handle) = registry_with("hallway-horror");
        let mut rig = AnomalyRig::new(false, None, Some("hallway-horror".to_string()), None);

        let outcome = activate(&mut rig, &mut registry);
        assert_eq!(
            outcome,
            AnomalyActivation::Fired {
                target: "hallway-horror".to_string()
            }
        );
        assert_eq!(
            registry.get(handle).expect("registered timeline").times_started(),
            1
        );
    }

    #[test]
    fn fallback_used_when_lookup_fails() {
        let mut registry = TimelineRegistry::default();
        let mut rig = AnomalyRig::new(
            false,
            None,
            Some("missing".to_string()),
            Some(Timeline::new("local-fallback")),
        );

        let outcome = activate(&mut rig, &mut registry);
        assert_eq!(
            outcome,
            AnomalyActivation::Fired {
                target: "local-fallback".to_string()
            }
        );
        assert_eq!(
            rig.fallback.as_ref().expect("fallback kept").times_started(),
            1
        );
    }

    #[test]
    fn no_target_leaves_latch_armed() {
        let mut registry = TimelineRegistry::default();
        let mut rig = AnomalyRig::new(false, None, None, None);

        assert_eq!(activate(&mut rig, &mut registry), AnomalyActivation::NoTarget);
        // A later activation with a target bound can still fire.
        assert!(rig.latch.can_fire());

        rig.fallback = Some(Timeline::new("late-bound"));
        assert!(matches!(
            activate(&mut rig, &mut registry),
            AnomalyActivation::Fired { .. }
        ));
        assert_eq!(rig.latch, AnomalyLatch::Triggered);
    }
}
