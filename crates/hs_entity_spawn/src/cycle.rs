//! Per-tick evaluation of a spawner.
//!
//! `tick` is a pure transition: it takes the committed configuration and
//! returns the configuration to commit next plus any entities the caller must
//! insert into the world. A spawner moves through three states:
//!
//! - inactive: no creature kind bound, ticks are no-ops
//! - counting: `delay_ticks > 0` after the decrement
//! - evaluating: `delay_ticks <= 0`, gated on a nearby player and on the
//!   local population of the bound kind
//!
//! Gating failures leave the countdown where it is, so a waiting spawner
//! drifts further below zero every tick until it gets to spawn.

use bevy::prelude::*;
use hs_core::{BlockBox, BlockPos};
use rand::Rng;

use crate::config::SpawnerConfig;
use crate::oracle::ProximityOracle;
use crate::placement::{self, PlacementEnvelope};
use crate::registry::EntityRegistry;

/// Which transition a tick took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStep {
    Inactive,
    Counting,
    NoObserver,
    Crowded { nearby: usize },
    Spawned { requested: usize, created: usize },
}

/// New state plus effects of one tick.
#[derive(Clone, Debug)]
pub struct TickOutcome<E> {
    pub config: SpawnerConfig,
    pub step: TickStep,
    pub spawned: Vec<E>,
}

impl<E> TickOutcome<E> {
    fn without_spawns(config: SpawnerConfig, step: TickStep) -> Self {
        Self {
            config,
            step,
            spawned: Vec::new(),
        }
    }
}

/// Runs one tick of the spawner standing at `pos`.
pub fn tick<O, G, R>(
    config: &SpawnerConfig,
    pos: BlockPos,
    oracle: &O,
    registry: &G,
    envelope: PlacementEnvelope,
    rng: &mut R,
) -> TickOutcome<G::Entity>
where
    O: ProximityOracle + ?Sized,
    G: EntityRegistry + ?Sized,
    R: Rng + ?Sized,
{
    let Some(kind) = config.entity_kind.as_ref() else {
        return TickOutcome::without_spawns(config.clone(), TickStep::Inactive);
    };

    let mut next = config.clone();
    next.delay_ticks = next.delay_ticks.saturating_sub(1);
    if next.delay_ticks > 0 {
        return TickOutcome::without_spawns(next, TickStep::Counting);
    }

    let region = BlockBox::around(pos, next.required_player_range);
    if !oracle.observer_within(region) {
        return TickOutcome::without_spawns(next, TickStep::NoObserver);
    }

    let cap = usize::try_from(next.max_nearby_entities).unwrap_or(0);
    let nearby = oracle.count_kind_within(region, kind, cap);
    if nearby >= cap {
        return TickOutcome::without_spawns(next, TickStep::Crowded { nearby });
    }

    let requested = placement::batch_size(rng, next.spawn_count);
    let mut spawned = Vec::with_capacity(requested);
    for _ in 0..requested {
        let at = placement::spawn_position(rng, pos, envelope, next.spawn_range);
        match registry.create(kind, at) {
            Some(entity) => spawned.push(entity),
            None => {
                // Aborted batches keep the countdown, so the next tick retries.
                debug!("No factory for {}, batch at {:?} aborted", kind, pos);
                let step = TickStep::Spawned {
                    requested,
                    created: spawned.len(),
                };
                return TickOutcome {
                    config: next,
                    step,
                    spawned,
                };
            }
        }
    }

    next.delay_ticks = reschedule_delay(rng, &next);
    let step = TickStep::Spawned {
        requested,
        created: spawned.len(),
    };
    TickOutcome {
        config: next,
        step,
        spawned,
    }
}

/// Delay until the next evaluation, uniform in `[min_spawn_delay, max_spawn_delay)`.
/// Collapses to `min_spawn_delay` when the range is empty.
pub fn reschedule_delay<R: Rng + ?Sized>(rng: &mut R, config: &SpawnerConfig) -> i32 {
    if config.max_spawn_delay > config.min_spawn_delay {
        rng.gen_range(config.min_spawn_delay..config.max_spawn_delay)
    } else {
        config.min_spawn_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NearbySnapshot;
    use crate::registry::CreatureRegistry;
    use bevy::math::DVec3;
    use hs_core::EntityKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SPAWNER: BlockPos = BlockPos::new(0, 64, 0);

    fn zombie() -> EntityKind {
        EntityKind::from("minecraft:zombie")
    }

    fn registry() -> CreatureRegistry {
        CreatureRegistry::default().with("minecraft:zombie")
    }

    fn watched() -> NearbySnapshot {
        NearbySnapshot::new().with_observer(DVec3::new(4.5, 64.0, 4.5))
    }

    fn run(config: &SpawnerConfig, oracle: &NearbySnapshot, rng: &mut ChaCha8Rng) -> TickOutcome<crate::registry::CreatureSpawn> {
        tick(config, SPAWNER, oracle, &registry(), PlacementEnvelope::Legacy, rng)
    }

    #[test]
    fn unbound_spawner_never_changes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut config = SpawnerConfig::default();
        for _ in 0..100 {
            let outcome = run(&config, &watched(), &mut rng);
            assert_eq!(outcome.step, TickStep::Inactive);
            assert!(outcome.spawned.is_empty());
            assert_eq!(outcome.config, config);
            config = outcome.config;
        }
        assert_eq!(config.delay_ticks, 20);
    }

    #[test]
    fn countdown_reaches_zero_after_delay_ticks() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut config = SpawnerConfig {
            delay_ticks: 5,
            ..SpawnerConfig::bound(zombie())
        };
        let empty = NearbySnapshot::new();

        for _ in 0..4 {
            let outcome = run(&config, &empty, &mut rng);
            assert_eq!(outcome.step, TickStep::Counting);
            config = outcome.config;
        }
        let outcome = run(&config, &empty, &mut rng);
        assert_eq!(outcome.config.delay_ticks, 0);
        assert_eq!(outcome.step, TickStep::NoObserver);
    }

    #[test]
    fn waiting_for_observer_drifts_negative_without_spawning() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut config = SpawnerConfig {
            delay_ticks: 1,
            ..SpawnerConfig::bound(zombie())
        };
        let far_player = NearbySnapshot::new().with_observer(DVec3::new(500.0, 64.0, 0.0));

        for expected in (-999..=0).rev() {
            let outcome = run(&config, &far_player, &mut rng);
            assert_eq!(outcome.step, TickStep::NoObserver);
            assert!(outcome.spawned.is_empty());
            assert_eq!(outcome.config.delay_ticks, expected);
            config = outcome.config;
        }
    }

    #[test]
    fn crowded_region_blocks_spawning_and_keeps_delay() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = SpawnerConfig {
            delay_ticks: 0,
            max_nearby_entities: 2,
            ..SpawnerConfig::bound(zombie())
        };
        let oracle = watched()
            .with_creature(zombie(), DVec3::new(1.0, 64.0, 1.0))
            .with_creature(zombie(), DVec3::new(-3.0, 60.0, 2.0));

        let outcome = run(&config, &oracle, &mut rng);
        assert_eq!(outcome.step, TickStep::Crowded { nearby: 2 });
        assert!(outcome.spawned.is_empty());
        assert_eq!(outcome.config.delay_ticks, -1);
    }

    #[test]
    fn other_kinds_do_not_count_toward_the_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = SpawnerConfig {
            delay_ticks: 0,
            max_nearby_entities: 1,
            ..SpawnerConfig::bound(zombie())
        };
        let oracle = watched().with_creature(EntityKind::from("minecraft:pig"), DVec3::new(1.0, 64.0, 1.0));

        let outcome = run(&config, &oracle, &mut rng);
        assert!(matches!(outcome.step, TickStep::Spawned { .. }));
    }

    #[test]
    fn evaluation_spawns_within_bounds_and_reschedules() {
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let config = SpawnerConfig {
                delay_ticks: 1,
                ..SpawnerConfig::bound(zombie())
            };

            let outcome = run(&config, &watched(), &mut rng);
            let TickStep::Spawned { requested, created } = outcome.step else {
                panic!("expected a spawn, got {:?}", outcome.step);
            };
            assert_eq!(requested, created);
            assert!(created < config.spawn_count as usize);
            assert_eq!(outcome.spawned.len(), created);
            assert!(outcome.spawned.iter().all(|s| s.creature.kind == zombie()));
            assert!(outcome.config.delay_ticks >= config.min_spawn_delay);
            assert!(outcome.config.delay_ticks < config.max_spawn_delay);
        }
    }

    #[test]
    fn missing_factory_aborts_batch_without_rescheduling() {
        let mut registry = CreatureRegistry::default();
        let kind = registry.register_kind("minecraft:zombie");
        let config = SpawnerConfig {
            delay_ticks: 0,
            spawn_count: 50,
            ..SpawnerConfig::bound(kind)
        };

        let mut attempted = 0;
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = tick(&config, SPAWNER, &watched(), &registry, PlacementEnvelope::Legacy, &mut rng);
            let TickStep::Spawned { requested, created } = outcome.step else {
                panic!("expected a spawn attempt, got {:?}", outcome.step);
            };
            assert_eq!(created, 0);
            assert!(outcome.spawned.is_empty());
            if requested > 0 {
                attempted += 1;
                assert_eq!(outcome.config.delay_ticks, -1);
            }
        }
        assert!(attempted > 0);
    }

    #[test]
    fn equal_delay_bounds_reschedule_to_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = SpawnerConfig {
            min_spawn_delay: 300,
            max_spawn_delay: 300,
            ..SpawnerConfig::default()
        };
        assert_eq!(reschedule_delay(&mut rng, &config), 300);
    }

    #[test]
    fn same_seed_gives_same_outcome() {
        let config = SpawnerConfig {
            delay_ticks: 0,
            spawn_count: 10,
            ..SpawnerConfig::bound(zombie())
        };
        let a = run(&config, &watched(), &mut ChaCha8Rng::seed_from_u64(77));
        let b = run(&config, &watched(), &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a.step, b.step);
        assert_eq!(a.config, b.config);
        assert_eq!(a.spawned, b.spawned);
    }
}
