//! Encoding of spawner configuration into block entity records.

use hs_core::{BlockPos, EntityKind, Record};

use crate::config::SpawnerConfig;

/// Field names of a spawner record.
pub mod keys {
    pub const ID: &str = "id";
    pub const ENTITY_IDENTIFIER: &str = "EntityIdentifier";
    pub const DELAY: &str = "Delay";
    pub const MIN_SPAWN_DELAY: &str = "MinSpawnDelay";
    pub const MAX_SPAWN_DELAY: &str = "MaxSpawnDelay";
    pub const SPAWN_COUNT: &str = "SpawnCount";
    pub const SPAWN_RANGE: &str = "SpawnRange";
    pub const MAX_NEARBY_ENTITIES: &str = "MaxNearbyEntities";
    pub const REQUIRED_PLAYER_RANGE: &str = "RequiredPlayerRange";
    pub const DISPLAY_ENTITY_HEIGHT: &str = "DisplayEntityHeight";
    pub const DISPLAY_ENTITY_WIDTH: &str = "DisplayEntityWidth";
    pub const IS_MOVABLE: &str = "isMovable";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const Z: &str = "z";
}

/// Block entity id written into every spawner record.
pub const BLOCK_ENTITY_ID: &str = "MobSpawner";

/// Size of the creature preview rendered inside the cage.
pub const DISPLAY_ENTITY_SIZE: f32 = 1.0;

/// Encodes a spawner at `pos` into its persisted record.
///
/// Integer tunables are stored as 16-bit shorts and clamped into that range.
/// A countdown that has drifted below zero is stored as zero, so a waiting
/// spawner reloads ready to evaluate.
pub fn encode(config: &SpawnerConfig, pos: BlockPos) -> Record {
    let identifier = config
        .entity_kind
        .as_ref()
        .map(EntityKind::identifier)
        .unwrap_or_default();

    Record::new()
        .with(keys::ID, BLOCK_ENTITY_ID)
        .with(keys::ENTITY_IDENTIFIER, identifier)
        .with(keys::DELAY, short(config.delay_ticks.max(0)))
        .with(keys::MIN_SPAWN_DELAY, short(config.min_spawn_delay))
        .with(keys::MAX_SPAWN_DELAY, short(config.max_spawn_delay))
        .with(keys::SPAWN_COUNT, short(config.spawn_count))
        .with(keys::SPAWN_RANGE, short(config.spawn_range))
        .with(keys::MAX_NEARBY_ENTITIES, short(config.max_nearby_entities))
        .with(keys::REQUIRED_PLAYER_RANGE, short(config.required_player_range))
        .with(keys::DISPLAY_ENTITY_HEIGHT, DISPLAY_ENTITY_SIZE)
        .with(keys::DISPLAY_ENTITY_WIDTH, DISPLAY_ENTITY_SIZE)
        .with(keys::IS_MOVABLE, u8::from(config.movable))
        .with(keys::X, pos.x)
        .with(keys::Y, pos.y)
        .with(keys::Z, pos.z)
}

/// Reads the block coordinates stored alongside a spawner's configuration.
pub fn decode_position(record: &Record) -> Option<BlockPos> {
    Some(BlockPos::new(
        record.i32(keys::X)?,
        record.i32(keys::Y)?,
        record.i32(keys::Z)?,
    ))
}

fn short(value: i32) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}
