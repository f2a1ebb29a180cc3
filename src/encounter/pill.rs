//! Consumable remedies and the identifier match rule.
use bevy::prelude::*;

/// Checks a presented remedy identifier against the required one.
///
/// Blank input never matches. Both sides are trimmed and compared
/// case-insensitively without locale-dependent folding, so "  calmante "
/// matches "Calmante" everywhere.
pub fn remedy_matches(presented: &str, required: &str) -> bool {
    let presented = presented.trim();
    if presented.is_empty() {
        return false;
    }
    presented.to_lowercase() == required.trim().to_lowercase()
}

/// A consumable remedy placed on the table. Consuming is one-shot: the
/// entity reports its identifier exactly once.
#[derive(Component, Debug)]
pub struct Remedy {
    id: String,
    consumed: bool,
}

impl Remedy {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            consumed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Consumes the remedy, returning its identifier the first time and
    /// None on any repeat attempt.
    pub fn consume(&mut self) -> Option<String> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        Some(self.id.clone())
    }
}
