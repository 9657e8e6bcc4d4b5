use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use hs_entity_spawn::PlacementEnvelope;
use hs_persistence::spawner_path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "assets/hearthspawn.ron";

#[derive(Debug, Error)]
pub enum SimConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A spawner placed on a fresh world, optionally bound by clicking it with an egg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerSeed {
    pub position: [i32; 3],
    #[serde(default)]
    pub egg: Option<String>,
}

/// Headless simulation settings.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub tick_hz: f64,
    pub ticks: u64,
    pub save_file: PathBuf,
    /// Scale the spawn envelope with each spawner's `SpawnRange`.
    pub wide_placement: bool,
    pub creatures: Vec<String>,
    pub players: Vec<[f64; 3]>,
    /// Only used when the save file does not exist yet.
    pub spawners: Vec<SpawnerSeed>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 20.0,
            ticks: 2400,
            save_file: spawner_path("world"),
            wide_placement: false,
            creatures: vec![
                "minecraft:zombie".into(),
                "minecraft:skeleton".into(),
                "minecraft:spider".into(),
            ],
            players: vec![[4.5, 64.0, 4.5]],
            spawners: vec![
                SpawnerSeed {
                    position: [0, 64, 0],
                    egg: Some("minecraft:zombie".into()),
                },
                SpawnerSeed {
                    position: [40, 64, 0],
                    egg: Some("minecraft:skeleton".into()),
                },
            ],
        }
    }
}

impl SimConfig {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SimConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn placement(&self) -> PlacementEnvelope {
        if self.wide_placement {
            PlacementEnvelope::SpawnRange
        } else {
            PlacementEnvelope::Legacy
        }
    }

    /// Seconds between ticks; non-positive rates fall back to 20 Hz.
    pub fn tick_interval(&self) -> f64 {
        if self.tick_hz > 0.0 {
            1.0 / self.tick_hz
        } else {
            1.0 / 20.0
        }
    }
}
