use bevy::prelude::*;

mod core;
mod encounter;
mod monster;
mod player;
mod scene;

use crate::{
    core::CorePlugin, encounter::EncounterPlugin, monster::MonsterPlugin, player::PlayerPlugin,
    scene::ScenePlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            ScenePlugin,
            MonsterPlugin,
            PlayerPlugin,
            EncounterPlugin, // After ScenePlugin and PlayerPlugin, whose systems it orders against
        ))
        .run();
}
