//! Looped audio cues and the per-kind cue selection rule.
use bevy::prelude::*;

use crate::monster::components::MonsterKind;

/// Which cues should be audible for a monster this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuePlan {
    pub ambient: bool,
    pub running: bool,
}

/// Selects the desired cue set for a monster kind.
///
/// Generic monsters stay silent except while running. Haunts keep their
/// ambient loop up whenever they exist and layer the run loop on top.
/// Anomalies are timeline-driven and never play simulation audio.
pub fn desired_cues(kind: MonsterKind, is_running: bool) -> CuePlan {
    match kind {
        MonsterKind::Generic => CuePlan {
            ambient: false,
            running: is_running,
        },
        MonsterKind::Haunt => CuePlan {
            ambient: true,
            running: is_running,
        },
        MonsterKind::Anomaly => CuePlan {
            ambient: false,
            running: false,
        },
    }
}

/// A looped audio source for one cue. Play and stop are idempotent; the
/// actual device playback lives outside this crate.
#[derive(Debug, Clone)]
pub struct LoopedCue {
    name: String,
    playing: bool,
}

impl LoopedCue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Moves the cue toward the desired state. Returns true when a
    /// transition actually happened (used for logging; no restarts while
    /// already in the desired state).
    pub fn set_playing(&mut self, desired: bool) -> bool {
        if self.playing == desired {
            return false;
        }
        self.playing = desired;
        true
    }
}

/// The audio bindings of one monster instance. A missing cue binding is an
/// accepted degraded state: the transition is skipped with a one-time
/// warning.
#[derive(Component, Debug, Default)]
pub struct MonsterAudio {
    pub ambient: Option<LoopedCue>,
    pub running: Option<LoopedCue>,
    warned_ambient_missing: bool,
    warned_running_missing: bool,
}

impl MonsterAudio {
    pub fn new(ambient: Option<LoopedCue>, running: Option<LoopedCue>) -> Self {
        Self {
            ambient,
            running,
            warned_ambient_missing: false,
            warned_running_missing: false,
        }
    }

    /// Applies a cue plan with idempotent play/stop semantics.
    pub fn apply(&mut self, plan: CuePlan, monster_name: &str) {
        apply_slot(
            &mut self.ambient,
            plan.ambient,
            &mut self.warned_ambient_missing,
            "ambient",
            monster_name,
        );
        apply_slot(
            &mut self.running,
            plan.running,
            &mut self.warned_running_missing,
            "running",
            monster_name,
        );
    }
}

fn apply_slot(
    slot: &mut Option<LoopedCue>,
    desired: bool,
    warned_missing: &mut bool,
    label: &str,
    monster_name: &str,
) {
    match slot {
        Some(cue) => {
            if cue.set_playing(desired) {
                let verb = if desired { "playing" } else { "stopped" };
                debug!(
                    target: "monster_audio",
                    "{monster_name}: {verb} {label} cue '{}'",
                    cue.name()
                );
            }
        }
        None => {
            if desired && !*warned_missing {
                warn!("{monster_name}: no {label} audio cue bound; skipping playback");
                *warned_missing = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_monsters_suppress_ambient() {
        let idle = desired_cues(MonsterKind::Generic, false);
        assert!(!idle.ambient);
        assert!(!idle.running);

        let running = desired_cues(MonsterKind::Generic, true);
        assert!(!running.ambient);
        assert!(running.running);
    }

    #[test]
    fn haunts_keep_ambient_across_run_transitions() {
        let idle = desired_cues(MonsterKind::Haunt, false);
        assert!(idle.ambient);
        assert!(!idle.running);

        let running = desired_cues(MonsterKind::Haunt, true);
        assert!(running.ambient);
        assert!(running.running);
    }

    #[test]
    fn anomalies_request_no_cues() {
        let plan = desired_cues(MonsterKind::Anomaly, true);
        assert!(!plan.ambient);
        assert!(!plan.running);
    }

    #[test]
    fn cue_transitions_are_idempotent() {
        let mut cue = LoopedCue::new("run-loop");
        assert!(cue.set_playing(true));
        assert!(!cue.set_playing(true));
        assert!(cue.is_playing());

        assert!(cue.set_playing(false));
        assert!(!cue.set_playing(false));
        assert!(!cue.is_playing());
    }

    #[test]
    fn apply_tracks_both_slots() {
        let mut audio = MonsterAudio::new(
            Some(LoopedCue::new("breathing")),
            Some(LoopedCue::new("sprint")),
        );

        audio.apply(desired_cues(MonsterKind::Haunt, true), "Lobo");
        assert!(audio.ambient.as_ref().is_some_and(LoopedCue::is_playing));
        assert!(audio.running.as_ref().is_some_and(LoopedCue::is_playing));

        audio.apply(desired_cues(MonsterKind::Haunt, false), "Lobo");
        assert!(audio.ambient.as_ref().is_some_and(LoopedCue::is_playing));
        assert!(!audio.running.as_ref().is_some_and(LoopedCue::is_playing));
    }

    #[test]
    fn missing_binding_degrades_to_noop() {
        let mut audio = MonsterAudio::new(None, None);
        // Must not panic or create cues out of thin air.
        audio.apply(desired_cues(MonsterKind::Haunt, true), "Lobo");
        assert!(audio.ambient.is_none());
        assert!(audio.running.is_none());
    }
}
