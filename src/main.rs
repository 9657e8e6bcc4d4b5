use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use hs_core::{BlockPos, Player, WorldPos};
use hs_entity_spawn::{
    ActivateSpawner, CreatureRegistry, CreatureSpawned, EntityRegistry, HeldItem, ItemStack,
    SpawnTick, Spawner, SpawnerActivated, SpawnerPlugin, SpawnerSettings,
};
use hs_persistence::{PersistencePlugin, SaveSpawners, SpawnerSaveFile};

mod sim_config;

use sim_config::{SimConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "hearthspawn", about = "Headless spawner block simulation")]
struct Args {
    /// RON file with simulation settings.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Stop after this many ticks, overriding the config.
    #[arg(short, long)]
    ticks: Option<u64>,
    /// World seed, overriding the config.
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Creatures produced so far, for the exit summary.
#[derive(Resource, Default)]
struct SpawnTally(u64);

fn main() {
    let args = Args::parse();
    let loaded = SimConfig::load(&args.config);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => SimConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            config.tick_interval(),
        ))),
        LogPlugin {
            filter: "bevy=warn,hearthspawn=info,hs_entity_spawn=info,hs_persistence=info"
                .to_owned(),
            ..default()
        },
    ));

    if let Err(e) = &loaded {
        warn!(
            "Could not read {}: {}, using defaults",
            args.config.display(),
            e
        );
    }
    info!(
        "Simulating {} ticks at {} Hz with seed {}",
        config.ticks, config.tick_hz, config.seed
    );

    let mut registry = CreatureRegistry::default();
    for identifier in &config.creatures {
        registry.register(identifier);
    }

    app.insert_resource(SpawnerSettings {
        seed: config.seed,
        placement: config.placement(),
    })
    .insert_resource(registry)
    .insert_resource(SpawnerSaveFile(config.save_file.clone()))
    .insert_resource(config)
    .init_resource::<SpawnTally>()
    .add_plugins((SpawnerPlugin, PersistencePlugin))
    .add_systems(Startup, setup_world)
    .add_systems(
        Update,
        (log_activations, log_spawns, stop_after_ticks)
            .chain()
            .after(hs_entity_spawn::systems::tick_spawners),
    );

    app.run();
}

/// Places the configured players, and the seed spawners when starting a new world.
fn setup_world(
    mut commands: Commands,
    config: Res<SimConfig>,
    registry: Res<CreatureRegistry>,
    mut activations: EventWriter<ActivateSpawner>,
) {
    for [x, y, z] in &config.players {
        commands.spawn((Player, WorldPos::new(*x, *y, *z)));
    }

    if config.save_file.exists() {
        return;
    }

    for seed in &config.spawners {
        let [x, y, z] = seed.position;
        let spawner = commands
            .spawn((BlockPos::new(x, y, z), Spawner::default()))
            .id();

        let Some(identifier) = &seed.egg else {
            continue;
        };
        let Some(kind) = registry.lookup(identifier) else {
            warn!("Spawner at ({}, {}, {}) asks for unknown creature {}", x, y, z, identifier);
            continue;
        };
        let user = commands
            .spawn(HeldItem(ItemStack::spawn_egg(kind, 1)))
            .id();
        activations.send(ActivateSpawner { spawner, user });
    }
}

fn log_activations(mut events: EventReader<SpawnerActivated>, tick: Res<SpawnTick>) {
    for event in events.read() {
        info!("Tick {}: {:?} now spawns {}", tick.0, event.spawner, event.kind);
    }
}

fn log_spawns(mut events: EventReader<CreatureSpawned>, mut tally: ResMut<SpawnTally>) {
    for event in events.read() {
        tally.0 += 1;
        debug!(
            "{} appeared at ({:.1}, {:.1}, {:.1})",
            event.kind, event.position.x, event.position.y, event.position.z
        );
    }
}

fn stop_after_ticks(
    tick: Res<SpawnTick>,
    config: Res<SimConfig>,
    tally: Res<SpawnTally>,
    mut save: EventWriter<SaveSpawners>,
    mut exit: EventWriter<AppExit>,
) {
    if tick.0 < config.ticks {
        return;
    }
    info!("Finished {} ticks, {} creatures spawned", tick.0, tally.0);
    save.send(SaveSpawners);
    exit.send(AppExit::Success);
}
