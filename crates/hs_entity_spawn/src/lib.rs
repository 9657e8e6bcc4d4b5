use bevy::prelude::*;

pub mod activation;
pub mod codec;
pub mod config;
pub mod cycle;
pub mod oracle;
pub mod placement;
pub mod registry;
pub mod systems;

pub use activation::{activate, ActivationRejected, HeldItem, HeldStack, Item, ItemStack};
pub use codec::{decode_position, encode};
pub use config::SpawnerConfig;
pub use cycle::{tick, TickOutcome, TickStep};
pub use oracle::{EntityView, NearbyEntity, NearbySnapshot, ProximityOracle};
pub use placement::PlacementEnvelope;
pub use registry::{CreatureFactory, CreatureRegistry, CreatureSpawn, EntityRegistry};
pub use systems::{
    ActivateSpawner, CreatureSpawned, SpawnTick, Spawner, SpawnerActivated, SpawnerRng,
    SpawnerSettings,
};

/// Entity spawn plugin for Hearthspawn.
/// Drives every spawner block once per `Update` and applies spawn egg clicks.
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnerSettings>()
            .init_resource::<CreatureRegistry>()
            .init_resource::<SpawnTick>()
            .add_event::<ActivateSpawner>()
            .add_event::<SpawnerActivated>()
            .add_event::<CreatureSpawned>()
            .add_systems(
                Update,
                (
                    systems::advance_spawn_tick,
                    systems::seed_spawner_rngs,
                    systems::handle_activations,
                    systems::tick_spawners,
                )
                    .chain(),
            );
    }
}
