//! Turn-controller state: phase machine, RNG, and the deferred reload.
use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Phase of the encounter loop.
///
/// `Idle` holds no monster. A spawn enters `AwaitingRemedy`; a correct
/// remedy enters `DayAdvancePending` until the scheduled reload fires and
/// returns to `Idle`; a wrong remedy enters the terminal `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncounterPhase {
    #[default]
    Idle,
    AwaitingRemedy,
    DayAdvancePending,
    GameOver,
}

impl EncounterPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingRemedy => "awaiting remedy",
            Self::DayAdvancePending => "day advance pending",
            Self::GameOver => "game over",
        }
    }
}

/// The turn controller's own state. Owns the single active monster entity;
/// nothing else spawns or despawns monsters.
#[derive(Resource, Debug)]
pub struct EncounterState {
    pub phase: EncounterPhase,
    day_index: u64,
    epoch: u64,
    active: Option<Entity>,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self {
            phase: EncounterPhase::Idle,
            day_index: 1,
            epoch: 0,
            active: None,
        }
    }
}

impl EncounterState {
    pub fn day_index(&self) -> u64 {
        self.day_index
    }

    /// Generation counter; deferred actions carry the epoch they were
    /// scheduled under and are dropped when it no longer matches.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn active(&self) -> Option<Entity> {
        self.active
    }

    /// Invalidates every deferred action scheduled so far.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Installs a freshly spawned monster as the single active encounter.
    pub fn begin_encounter(&mut self, monster: Entity) {
        self.active = Some(monster);
        self.phase = EncounterPhase::AwaitingRemedy;
    }

    /// Removes the active monster (if any), returning it for teardown.
    pub fn take_active(&mut self) -> Option<Entity> {
        self.active.take()
    }

    /// Starts the next day: one more on the counter, back to idle.
    pub fn advance_day(&mut self) {
        self.day_index += 1;
        self.phase = EncounterPhase::Idle;
        self.active = None;
    }
}

/// Seedable randomness for spawn selection and blend-state activation.
#[derive(Resource)]
pub struct EncounterRng(StdRng);

impl EncounterRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self(rng)
    }

    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.0.gen_range(0..len))
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.0
    }
}

/// Result of polling the deferred reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPoll {
    /// Nothing scheduled.
    Empty,
    /// Scheduled but not yet due.
    Pending,
    /// Scheduled under an epoch that has since been invalidated; dropped.
    Stale,
    /// Due now; cleared and ready to execute.
    Due,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledReload {
    fire_at: f32,
    epoch: u64,
}

/// The day-advance delay: a deferred scene reload keyed to the monotonic
/// simulation clock and guarded by the encounter epoch, polled each frame
/// rather than slept on.
#[derive(Resource, Debug, Default)]
pub struct PendingReload(Option<ScheduledReload>);

impl PendingReload {
    pub fn schedule(&mut self, fire_at: f32, epoch: u64) {
        self.0 = Some(ScheduledReload { fire_at, epoch });
    }

    /// Polls the deferred reload against the clock and current epoch.
    /// Stale and due entries are consumed; pending ones stay.
    pub fn poll(&mut self, now: f32, current_epoch: u64) -> ReloadPoll {
        let Some(scheduled) = self.0 else {
            return ReloadPoll::Empty;
        };

        if scheduled.epoch != current_epoch {
            self.0 = None;
            return ReloadPoll::Stale;
        }
        if now >= scheduled.fire_at {
            self.0 = None;
            return ReloadPoll::Due;
        }
        ReloadPoll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_starts_idle_on_day_one() {
        let state = EncounterState::default();
        assert_eq!(state.phase, EncounterPhase::Idle);
        assert_eq!(state.day_index(), 1);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn begin_and_advance_cycle_phases() {
        let mut world = World::new();
        let monster = world.spawn_empty().id();

        let mut state = EncounterState::default();
        state.begin_encounter(monster);
        assert_eq!(state.phase, EncounterPhase::AwaitingRemedy);
        assert!(state.active().is_some());

        state.phase = EncounterPhase::DayAdvancePending;
        state.advance_day();
        assert_eq!(state.phase, EncounterPhase::Idle);
        assert_eq!(state.day_index(), 2);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn second_spawn_replaces_the_first_monster() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut state = EncounterState::default();
        let mut pending = PendingReload::default();

        state.begin_encounter(first);
        pending.schedule(1.0, state.epoch());

        // The controller tears the previous monster down and bumps the
        // epoch before installing the next one.
        assert_eq!(state.take_active(), Some(first));
        state.bump_epoch();
        state.begin_encounter(second);

        assert_eq!(state.active(), Some(second));
        // The first encounter's deferred action can no longer fire.
        assert_eq!(pending.poll(5.0, state.epoch()), ReloadPoll::Stale);
    }

    #[test]
    fn reload_fires_only_when_due() {
        let mut pending = PendingReload::default();
        assert_eq!(pending.poll(0.0, 0), ReloadPoll::Empty);

        pending.schedule(1.0, 0);
        assert_eq!(pending.poll(0.5, 0), ReloadPoll::Pending);
        assert_eq!(pending.poll(1.0, 0), ReloadPoll::Due);
        assert_eq!(pending.poll(2.0, 0), ReloadPoll::Empty);
    }

    #[test]
    fn stale_epoch_cancels_scheduled_reload() {
        let mut pending = PendingReload::default();
        pending.schedule(1.0, 0);

        // A new encounter bumped the epoch before the reload fired.
        assert_eq!(pending.poll(5.0, 1), ReloadPoll::Stale);
        // The stale entry is gone; it can never fire later.
        assert_eq!(pending.poll(5.0, 0), ReloadPoll::Empty);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut first = EncounterRng::new(Some(42));
        let mut second = EncounterRng::new(Some(42));
        for _ in 0..16 {
            assert_eq!(first.pick_index(5), second.pick_index(5));
        }
        assert_eq!(first.pick_index(0), None);
    }
}
