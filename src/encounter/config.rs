//! Encounter configuration: flow tuning and the monster pool.
use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::monster::{
    blend::BlendMode,
    components::{MonsterKind, MonsterSpec, ParamDescriptor, ParamKind},
};

use super::errors::EncounterError;

const CONFIG_PATH: &str = "config/encounter.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawEncounterConfig {
    #[serde(default)]
    flow: RawFlowSection,
    #[serde(default)]
    spawn: RawSpawnSection,
    #[serde(default)]
    rng: RawRngSection,
    #[serde(default, rename = "monster")]
    monsters: Vec<RawMonsterEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawFlowSection {
    day_advance_delay_seconds: f32,
    game_over_scene: String,
}

impl Default for RawFlowSection {
    fn default() -> Self {
        Self {
            day_advance_delay_seconds: 0.5,
            game_over_scene: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSpawnSection {
    point: [f32; 3],
}

impl Default for RawSpawnSection {
    fn default() -> Self {
        Self {
            point: [0.0, 0.0, -6.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawRngSection {
    /// 0 seeds from entropy; anything else is a fixed seed.
    seed: u64,
}

impl Default for RawRngSection {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawParam {
    name: String,
    kind: String,
}

impl Default for RawParam {
    fn default() -> Self {
        Self {
            name: "State".to_string(),
            kind: "int".to_string(),
        }
    }
}

impl RawParam {
    fn into_descriptor(self, monster: &str) -> ParamDescriptor {
        let kind = match self.kind.as_str() {
            "float" => ParamKind::Float,
            "int" => ParamKind::Int,
            other => {
                warn!("{monster}: unknown parameter kind '{other}', assuming int");
                ParamKind::Int
            }
        };
        ParamDescriptor {
            name: self.name,
            kind,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMonsterEntry {
    name: String,
    kind: String,
    required_remedy: String,
    move_speed: f32,
    run_threshold: f32,
    move_delay: f32,
    blend_mode: String,
    blend_state_count: u32,
    state_param: RawParam,
    axis_params: Option<[RawParam; 2]>,
    ambient_cue: String,
    running_cue: String,
    anomaly_timeline: String,
    anomaly_replayable: bool,
}

impl Default for RawMonsterEntry {
    fn default() -> Self {
        Self {
            name: "Monster".to_string(),
            kind: "generic".to_string(),
            required_remedy: "Pill".to_string(),
            move_speed: 2.0,
            run_threshold: 1.5,
            move_delay: 0.0,
            blend_mode: "one_d".to_string(),
            blend_state_count: 1,
            state_param: RawParam::default(),
            axis_params: None,
            ambient_cue: String::new(),
            running_cue: String::new(),
            anomaly_timeline: String::new(),
            anomaly_replayable: false,
        }
    }
}

impl From<RawMonsterEntry> for MonsterSpec {
    fn from(raw: RawMonsterEntry) -> Self {
        let kind = match raw.kind.as_str() {
            "generic" => MonsterKind::Generic,
            "anomaly" => MonsterKind::Anomaly,
            "haunt" => MonsterKind::Haunt,
            other => {
                warn!("{}: unknown monster kind '{other}', assuming generic", raw.name);
                MonsterKind::Generic
            }
        };
        let blend_mode = match raw.blend_mode.as_str() {
            "one_d" => BlendMode::OneD,
            "two_d" => BlendMode::TwoD,
            other => {
                warn!("{}: unknown blend mode '{other}', assuming one_d", raw.name);
                BlendMode::OneD
            }
        };
        let name = raw.name;
        let state_param = raw.state_param.into_descriptor(&name);
        let axis_params = raw.axis_params.map(|[x, y]| {
            (
                x.into_descriptor(&name),
                y.into_descriptor(&name),
            )
        });

        Self {
            kind,
            required_remedy: raw.required_remedy,
            move_speed: raw.move_speed,
            run_threshold: raw.run_threshold,
            move_delay: raw.move_delay,
            blend_mode,
            blend_state_count: raw.blend_state_count,
            state_param,
            axis_params,
            ambient_cue: non_blank(raw.ambient_cue),
            running_cue: non_blank(raw.running_cue),
            anomaly_timeline: non_blank(raw.anomaly_timeline),
            anomaly_replayable: raw.anomaly_replayable,
            name,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Tunable flow parameters of the encounter loop.
#[derive(Resource, Debug, Clone)]
pub struct EncounterSettings {
    pub day_advance_delay: f32,
    /// Scene to load on game over; None freezes the simulation instead.
    pub game_over_scene: Option<String>,
    pub spawn_point: Vec3,
    /// Fixed RNG seed, or None for entropy.
    pub rng_seed: Option<u64>,
}

/// The configured monster roster one entry of which is drawn each day.
#[derive(Resource, Debug, Clone, Default)]
pub struct MonsterPool {
    entries: Vec<MonsterSpec>,
}

impl MonsterPool {
    pub fn new(entries: Vec<MonsterSpec>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MonsterSpec] {
        &self.entries
    }

    /// Returns the entry at `index` after checking it can produce a
    /// playable monster.
    pub fn validated_entry(&self, index: usize) -> Result<&MonsterSpec, EncounterError> {
        let spec = self
            .entries
            .get(index)
            .ok_or(EncounterError::EmptyMonsterPool)?;

        if spec.name.trim().is_empty() {
            return Err(EncounterError::invalid_pool_entry(index, "blank name"));
        }
        if spec.required_remedy.trim().is_empty() {
            return Err(EncounterError::invalid_pool_entry(
                index,
                "blank required remedy",
            ));
        }
        if !spec.move_speed.is_finite() || spec.move_speed < 0.0 {
            return Err(EncounterError::invalid_pool_entry(
                index,
                "move speed must be finite and non-negative",
            ));
        }
        if spec.blend_mode == BlendMode::TwoD && spec.axis_params.is_none() {
            return Err(EncounterError::invalid_pool_entry(
                index,
                "2-D blend mode requires axis parameters",
            ));
        }
        Ok(spec)
    }

    /// Unique remedy identifiers across the pool, in first-seen order.
    /// This is the set laid out on the table each day.
    pub fn remedy_ids(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for spec in &self.entries {
            let id = spec.required_remedy.trim();
            if id.is_empty() {
                continue;
            }
            if !seen.iter().any(|known: &String| known == id) {
                seen.push(id.to_string());
            }
        }
        seen
    }
}

/// Loads settings and pool from `config/encounter.toml`, falling back to
/// the built-in roster when the file is missing or malformed.
pub fn load_or_default() -> (EncounterSettings, MonsterPool) {
    let raw = read_raw_config();
    let settings = EncounterSettings {
        day_advance_delay: raw.flow.day_advance_delay_seconds.max(0.0),
        game_over_scene: non_blank(raw.flow.game_over_scene),
        spawn_point: Vec3::from_array(raw.spawn.point),
        rng_seed: match raw.rng.seed {
            0 => None,
            seed => Some(seed),
        },
    };

    let entries: Vec<MonsterSpec> = if raw.monsters.is_empty() {
        default_roster()
    } else {
        raw.monsters.into_iter().map(MonsterSpec::from).collect()
    };

    (settings, MonsterPool::new(entries))
}

fn read_raw_config() -> RawEncounterConfig {
    let path = Path::new(CONFIG_PATH);
    match fs::read_to_string(path) {
        Ok(data) => match toml::from_str::<RawEncounterConfig>(&data) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawEncounterConfig::default()
            }
        },
        Err(err) => {
            warn!(
                "Failed to read {} ({}). Falling back to defaults.",
                CONFIG_PATH, err
            );
            RawEncounterConfig::default()
        }
    }
}

/// The built-in three-monster roster used when no config file is present.
fn default_roster() -> Vec<MonsterSpec> {
    vec![
        MonsterSpec {
            name: "Zombi".to_string(),
            kind: MonsterKind::Generic,
            required_remedy: "Calmante".to_string(),
            move_speed: 2.5,
            run_threshold: 2.0,
            move_delay: 1.5,
            blend_mode: BlendMode::OneD,
            blend_state_count: 3,
            state_param: ParamDescriptor::int("State"),
            axis_params: None,
            ambient_cue: None,
            running_cue: Some("zombi-run".to_string()),
            anomaly_timeline: None,
            anomaly_replayable: false,
        },
        MonsterSpec {
            name: "Lobo".to_string(),
            kind: MonsterKind::Haunt,
            required_remedy: "Estimulante".to_string(),
            move_speed: 3.5,
            run_threshold: 1.0,
            move_delay: 0.0,
            blend_mode: BlendMode::TwoD,
            blend_state_count: 4,
            state_param: ParamDescriptor::float("Pose"),
            axis_params: Some((
                ParamDescriptor::float("BlendX"),
                ParamDescriptor::float("BlendY"),
            )),
            ambient_cue: Some("lobo-breath".to_string()),
            running_cue: Some("lobo-run".to_string()),
            anomaly_timeline: None,
            anomaly_replayable: false,
        },
        MonsterSpec {
            name: "Anomalia".to_string(),
            kind: MonsterKind::Anomaly,
            required_remedy: "Antidoto".to_string(),
            move_speed: 0.0,
            run_threshold: 1.0,
            move_delay: 0.0,
            blend_mode: BlendMode::OneD,
            blend_state_count: 0,
            state_param: ParamDescriptor::int("State"),
            axis_params: None,
            ambient_cue: None,
            running_cue: None,
            anomaly_timeline: Some("anomaly-cinematic".to_string()),
            anomaly_replayable: false,
        },
    ]
}
