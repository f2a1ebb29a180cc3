//! Monster plugin wiring the per-frame behavior tick.
use bevy::prelude::*;

use crate::{core::plugin::update_simulation_clock, monster::systems::tick_monsters};

pub struct MonsterPlugin;

impl Plugin for MonsterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, tick_monsters.after(update_simulation_clock));
    }
}
