//! Events flowing through the turn controller.
use bevy::prelude::{Event, Message};

/// Reported by the interaction layer when the player swallows a remedy.
/// The sole external entry point into the turn controller.
#[derive(Event, Message, Debug, Clone)]
pub struct RemedyConsumedEvent {
    pub remedy_id: String,
}

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    DayAdvance,
    GameOver,
}

/// Emitted once per resolved encounter, for feedback hooks (UI, audio
/// stingers). The controller has already scheduled the transition.
#[derive(Event, Message, Debug, Clone)]
pub struct EncounterResolvedEvent {
    pub day: u64,
    pub monster: String,
    pub outcome: EncounterOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_event_exposes_fields() {
        let event = EncounterResolvedEvent {
            day: 3,
            monster: "Zombi".to_string(),
            outcome: EncounterOutcome::DayAdvance,
        };

        assert_eq!(event.day, 3);
        assert_eq!(event.monster, "Zombi");
        assert!(matches!(event.outcome, EncounterOutcome::DayAdvance));
    }
}
