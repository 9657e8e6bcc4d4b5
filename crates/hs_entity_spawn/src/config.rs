use bevy::prelude::*;
use hs_core::{EntityKind, Record};

use crate::codec::keys;
use crate::registry::EntityRegistry;

pub const DEFAULT_DELAY: i32 = 20;
pub const DEFAULT_REQUIRED_PLAYER_RANGE: i32 = 16;
pub const DEFAULT_MAX_NEARBY_ENTITIES: i32 = 6;
pub const DEFAULT_MAX_SPAWN_DELAY: i32 = 800;
pub const DEFAULT_MIN_SPAWN_DELAY: i32 = 200;
pub const DEFAULT_SPAWN_COUNT: i32 = 4;
pub const DEFAULT_SPAWN_RANGE: i32 = 4;

/// Tunables and countdown state of a single spawner block.
///
/// The block's position is not part of the configuration; the tick driver
/// supplies it on every evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnerConfig {
    /// Creature kind this spawner produces. `None` keeps the spawner inert.
    pub entity_kind: Option<EntityKind>,
    /// Ticks left before the next evaluation. Goes negative while waiting
    /// for a player or for the local population to drop.
    pub delay_ticks: i32,
    /// Whether pistons may move the block. Stored only.
    pub movable: bool,
    /// Half-width of the cube a player must stand in.
    pub required_player_range: i32,
    /// Same-kind population at which spawning pauses.
    pub max_nearby_entities: i32,
    /// Exclusive upper bound of the reschedule delay.
    pub max_spawn_delay: i32,
    /// Inclusive lower bound of the reschedule delay.
    pub min_spawn_delay: i32,
    /// Exclusive upper bound of the batch size.
    pub spawn_count: i32,
    /// Placement reach, only honoured by `PlacementEnvelope::SpawnRange`.
    pub spawn_range: i32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            entity_kind: None,
            delay_ticks: DEFAULT_DELAY,
            movable: true,
            required_player_range: DEFAULT_REQUIRED_PLAYER_RANGE,
            max_nearby_entities: DEFAULT_MAX_NEARBY_ENTITIES,
            max_spawn_delay: DEFAULT_MAX_SPAWN_DELAY,
            min_spawn_delay: DEFAULT_MIN_SPAWN_DELAY,
            spawn_count: DEFAULT_SPAWN_COUNT,
            spawn_range: DEFAULT_SPAWN_RANGE,
        }
    }
}

impl SpawnerConfig {
    /// Default configuration already bound to `kind`.
    pub fn bound(kind: EntityKind) -> Self {
        Self {
            entity_kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn is_bound(&self) -> bool {
        self.entity_kind.is_some()
    }

    /// Builds a configuration from a persisted record.
    ///
    /// Starts from the defaults and overlays every field the record carries
    /// in a usable form. Missing, non-numeric or non-positive values keep the
    /// default (`Delay` also accepts zero). Identifiers the registry does not
    /// know leave the spawner unbound. Never fails.
    pub fn resolve<R: EntityRegistry + ?Sized>(record: &Record, registry: &R) -> Self {
        let mut config = Self::default();

        if let Some(delay) = record.i32(keys::DELAY).filter(|v| *v >= 0) {
            config.delay_ticks = delay;
        }
        if let Some(flag) = record.byte(keys::IS_MOVABLE) {
            config.movable = flag == 1;
        }
        overlay_positive(record, keys::REQUIRED_PLAYER_RANGE, &mut config.required_player_range);
        overlay_positive(record, keys::MAX_NEARBY_ENTITIES, &mut config.max_nearby_entities);
        overlay_positive(record, keys::MAX_SPAWN_DELAY, &mut config.max_spawn_delay);
        overlay_positive(record, keys::MIN_SPAWN_DELAY, &mut config.min_spawn_delay);
        overlay_positive(record, keys::SPAWN_COUNT, &mut config.spawn_count);
        overlay_positive(record, keys::SPAWN_RANGE, &mut config.spawn_range);

        if let Some(identifier) = record.str(keys::ENTITY_IDENTIFIER).filter(|id| !id.is_empty()) {
            config.entity_kind = registry.lookup(identifier);
            if config.entity_kind.is_none() {
                debug!("Unknown entity identifier {:?}, spawner left unbound", identifier);
            }
        }

        config.repair();
        config
    }

    /// Raises `max_spawn_delay` to `min_spawn_delay` when they are inverted.
    pub fn repair(&mut self) {
        if self.max_spawn_delay < self.min_spawn_delay {
            debug!(
                "MaxSpawnDelay {} below MinSpawnDelay {}, raising",
                self.max_spawn_delay, self.min_spawn_delay
            );
            self.max_spawn_delay = self.min_spawn_delay;
        }
    }
}

fn overlay_positive(record: &Record, key: &str, field: &mut i32) {
    if let Some(value) = record.i32(key).filter(|v| *v > 0) {
        *field = value;
    }
}
