use bevy::prelude::*;
use hs_core::{BlockPos, Creature, EntityKind, Player, WorldPos};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::activation::{activate, HeldItem};
use crate::config::SpawnerConfig;
use crate::cycle::{self, TickStep};
use crate::oracle::{NearbyEntity, NearbySnapshot};
use crate::placement::PlacementEnvelope;
use crate::registry::CreatureRegistry;

/// Spawner block entity. Its position comes from the entity's `BlockPos`.
#[derive(Component, Clone, Debug, Default)]
pub struct Spawner {
    pub config: SpawnerConfig,
}

impl Spawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self { config }
    }
}

/// Random source owned by a single spawner.
#[derive(Component, Clone, Debug)]
pub struct SpawnerRng(pub ChaCha8Rng);

impl SpawnerRng {
    /// Seeds from the world seed mixed with the spawner's position, so every
    /// location gets its own reproducible stream.
    pub fn seeded(world_seed: u64, pos: BlockPos) -> Self {
        Self(ChaCha8Rng::seed_from_u64(world_seed ^ position_hash(pos)))
    }
}

fn position_hash(pos: BlockPos) -> u64 {
    (pos.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (pos.y as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (pos.z as i64 as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
}

/// World-wide spawner behaviour.
#[derive(Resource, Clone, Debug)]
pub struct SpawnerSettings {
    pub seed: u64,
    pub placement: PlacementEnvelope,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            placement: PlacementEnvelope::Legacy,
        }
    }
}

/// Index of the current spawner tick.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnTick(pub u64);

/// A user clicked a spawner.
#[derive(Event, Clone, Debug)]
pub struct ActivateSpawner {
    pub spawner: Entity,
    pub user: Entity,
}

/// A spawner was bound to a creature kind.
#[derive(Event, Clone, Debug)]
pub struct SpawnerActivated {
    pub spawner: Entity,
    pub kind: EntityKind,
}

#[derive(Event, Clone, Debug)]
pub struct CreatureSpawned {
    pub spawner: Entity,
    pub creature: Entity,
    pub kind: EntityKind,
    pub position: WorldPos,
}

pub fn advance_spawn_tick(mut tick: ResMut<SpawnTick>) {
    tick.0 += 1;
}

/// Gives every new spawner its own random source.
pub fn seed_spawner_rngs(
    mut commands: Commands,
    settings: Res<SpawnerSettings>,
    unseeded: Query<(Entity, &BlockPos), (With<Spawner>, Without<SpawnerRng>)>,
) {
    for (entity, &pos) in &unseeded {
        commands
            .entity(entity)
            .insert(SpawnerRng::seeded(settings.seed, pos));
    }
}

/// Applies spawn egg clicks to spawners.
pub fn handle_activations(
    mut requests: EventReader<ActivateSpawner>,
    mut spawners: Query<(&BlockPos, &mut Spawner)>,
    mut holders: Query<&mut HeldItem>,
    mut activated: EventWriter<SpawnerActivated>,
) {
    for request in requests.read() {
        let Ok((pos, mut spawner)) = spawners.get_mut(request.spawner) else {
            warn!("Activation targeted {:?}, which is not a spawner", request.spawner);
            continue;
        };
        let Ok(mut held) = holders.get_mut(request.user) else {
            debug!("{:?} clicked a spawner holding nothing", request.user);
            continue;
        };

        match activate(&spawner.config, &mut held.0) {
            Ok(config) => {
                if let Some(kind) = &config.entity_kind {
                    info!("Spawner at {:?} bound to {}", pos, kind);
                    activated.send(SpawnerActivated {
                        spawner: request.spawner,
                        kind: kind.clone(),
                    });
                }
                spawner.config = config;
            }
            Err(reason) => debug!("Spawner at {:?} not activated: {}", pos, reason),
        }
    }
}

/// Runs one cycle for every spawner and inserts whatever they produce.
///
/// Entities are captured once up front, so every spawner in the tick sees the
/// same world and creatures spawned this tick are counted from the next one.
pub fn tick_spawners(
    mut commands: Commands,
    tick: Res<SpawnTick>,
    settings: Res<SpawnerSettings>,
    registry: Res<CreatureRegistry>,
    mut spawners: Query<(Entity, &BlockPos, &mut Spawner, &mut SpawnerRng)>,
    entities: Query<(&WorldPos, Option<&Creature>, Has<Player>)>,
    mut spawned_events: EventWriter<CreatureSpawned>,
) {
    let snapshot: NearbySnapshot = entities
        .iter()
        .map(|(pos, creature, is_player)| NearbyEntity {
            position: pos.as_dvec3(),
            kind: creature.map(|c| c.kind.clone()),
            observer: is_player,
        })
        .collect();

    for (spawner_entity, &pos, mut spawner, mut rng) in &mut spawners {
        let outcome = cycle::tick(
            &spawner.config,
            pos,
            &snapshot,
            &*registry,
            settings.placement,
            &mut rng.0,
        );

        match outcome.step {
            TickStep::Inactive => continue,
            TickStep::Crowded { nearby } => {
                debug!("Tick {}: spawner at {:?} crowded ({} nearby)", tick.0, pos, nearby);
            }
            TickStep::Spawned { requested, created } => {
                debug!(
                    "Tick {}: spawner at {:?} spawned {}/{}, next in {} ticks",
                    tick.0, pos, created, requested, outcome.config.delay_ticks
                );
            }
            TickStep::Counting | TickStep::NoObserver => {}
        }

        spawner.config = outcome.config;
        for spawn in outcome.spawned {
            let kind = spawn.creature.kind.clone();
            let creature = commands.spawn((spawn.creature, spawn.position)).id();
            spawned_events.send(CreatureSpawned {
                spawner: spawner_entity,
                creature,
                kind,
                position: spawn.position,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ItemStack;
    use crate::SpawnerPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(SpawnerPlugin);
        app.world_mut()
            .resource_mut::<CreatureRegistry>()
            .register("minecraft:zombie");
        app
    }

    fn zombie() -> EntityKind {
        EntityKind::from("minecraft:zombie")
    }

    fn creature_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&Creature>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn spawners_receive_their_own_rng() {
        let mut app = app();
        let spawner = app
            .world_mut()
            .spawn((BlockPos::new(3, 4, 5), Spawner::default()))
            .id();

        app.update();

        assert!(app.world().get::<SpawnerRng>(spawner).is_some());
    }

    #[test]
    fn activation_binds_spawner_and_consumes_egg() {
        let mut app = app();
        let spawner = app
            .world_mut()
            .spawn((BlockPos::new(0, 64, 0), Spawner::default()))
            .id();
        let user = app
            .world_mut()
            .spawn(HeldItem(ItemStack::spawn_egg(zombie(), 2)))
            .id();

        app.world_mut().send_event(ActivateSpawner { spawner, user });
        app.world_mut().send_event(ActivateSpawner { spawner, user });
        app.update();

        let config = &app.world().get::<Spawner>(spawner).unwrap().config;
        assert_eq!(config.entity_kind, Some(zombie()));
        assert_eq!(app.world().get::<HeldItem>(user).unwrap().0.count, 1);

        let activated = app.world().resource::<Events<SpawnerActivated>>();
        assert_eq!(activated.len(), 1);
    }

    #[test]
    fn bound_spawner_waits_for_a_player() {
        let mut app = app();
        let spawner = app
            .world_mut()
            .spawn((
                BlockPos::new(0, 64, 0),
                Spawner::new(SpawnerConfig {
                    delay_ticks: 1,
                    ..SpawnerConfig::bound(zombie())
                }),
            ))
            .id();

        for _ in 0..10 {
            app.update();
        }

        assert_eq!(creature_count(&mut app), 0);
        let config = &app.world().get::<Spawner>(spawner).unwrap().config;
        assert_eq!(config.delay_ticks, -9);
        assert_eq!(app.world().resource::<SpawnTick>().0, 10);
    }

    #[test]
    fn player_in_range_triggers_spawns() {
        let mut app = app();
        app.world_mut()
            .spawn((Player, WorldPos::new(2.0, 64.0, 2.0)));
        let spawner = app
            .world_mut()
            .spawn((
                BlockPos::new(0, 64, 0),
                Spawner::new(SpawnerConfig {
                    delay_ticks: 1,
                    spawn_count: 40,
                    min_spawn_delay: 1,
                    max_spawn_delay: 2,
                    max_nearby_entities: 100,
                    ..SpawnerConfig::bound(zombie())
                }),
            ))
            .id();

        for _ in 0..20 {
            app.update();
        }

        let count = creature_count(&mut app);
        assert!(count > 0, "twenty evaluations never produced a zombie");

        let mut creatures = app.world_mut().query::<(&Creature, &WorldPos)>();
        for (creature, pos) in creatures.iter(app.world()) {
            assert_eq!(creature.kind, zombie());
            assert_eq!(pos.y, 65.0);
        }
        let config = &app.world().get::<Spawner>(spawner).unwrap().config;
        assert!(config.delay_ticks <= 1);
    }

    #[test]
    fn population_cap_holds_across_ticks() {
        let mut app = app();
        app.world_mut()
            .spawn((Player, WorldPos::new(0.0, 64.0, 0.0)));
        app.world_mut().spawn((
            BlockPos::new(0, 64, 0),
            Spawner::new(SpawnerConfig {
                delay_ticks: 1,
                spawn_count: 3,
                min_spawn_delay: 1,
                max_spawn_delay: 2,
                max_nearby_entities: 5,
                ..SpawnerConfig::bound(zombie())
            }),
        ));

        for _ in 0..200 {
            app.update();
        }

        // A batch starting at four nearby can add at most two more.
        assert!(creature_count(&mut app) <= 6);
        assert!(creature_count(&mut app) >= 5);
    }
}
