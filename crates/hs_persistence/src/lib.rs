use std::path::PathBuf;

use bevy::prelude::*;
use hs_core::{BlockPos, Record};
use hs_entity_spawn::{decode_position, encode, CreatureRegistry, Spawner, SpawnerConfig};

pub mod spawner_io;

pub use spawner_io::{
    load_spawners, save_spawners, spawner_filename, spawner_path, SpawnerFile, SpawnerIoError,
    SPAWNERS_DIR,
};

/// File the world's spawners are loaded from and saved to.
#[derive(Resource, Clone, Debug)]
pub struct SpawnerSaveFile(pub PathBuf);

/// Request to write every spawner to the save file.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct SaveSpawners;

/// Persistence plugin for Hearthspawn.
/// Loads spawner blocks on startup and saves them on request, using RON files.
pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveSpawners>()
            .add_systems(Startup, load_spawner_file)
            .add_systems(PostUpdate, save_spawner_file);
    }
}

/// Spawns a block entity for every record in the save file.
pub fn load_spawner_file(
    mut commands: Commands,
    file: Option<Res<SpawnerSaveFile>>,
    registry: Res<CreatureRegistry>,
) {
    let Some(file) = file else {
        return;
    };
    if !file.0.exists() {
        info!("No spawner file at {}, starting empty", file.0.display());
        return;
    }

    let records = match load_spawners(&file.0) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load spawners from {}: {}", file.0.display(), e);
            return;
        }
    };

    let mut loaded = 0;
    for record in &records {
        let Some(pos) = decode_position(record) else {
            warn!("Skipping spawner record without coordinates");
            continue;
        };
        let config = SpawnerConfig::resolve(record, &*registry);
        commands.spawn((pos, Spawner::new(config)));
        loaded += 1;
    }
    info!("Loaded {} spawners from {}", loaded, file.0.display());
}

/// Writes all spawners once per frame in which a save was requested.
pub fn save_spawner_file(
    mut requests: EventReader<SaveSpawners>,
    file: Option<Res<SpawnerSaveFile>>,
    spawners: Query<(&BlockPos, &Spawner)>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let Some(file) = file else {
        warn!("Save requested but no spawner file is configured");
        return;
    };

    let mut placed: Vec<(BlockPos, &Spawner)> =
        spawners.iter().map(|(pos, spawner)| (*pos, spawner)).collect();
    placed.sort_by_key(|(pos, _)| (pos.x, pos.y, pos.z));
    let records: Vec<Record> = placed
        .iter()
        .map(|(pos, spawner)| encode(&spawner.config, *pos))
        .collect();

    match save_spawners(&file.0, &records) {
        Ok(()) => info!("Saved {} spawners to {}", records.len(), file.0.display()),
        Err(e) => error!("Failed to save spawners to {}: {}", file.0.display(), e),
    }
}
