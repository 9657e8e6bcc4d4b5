use std::collections::HashMap;

use bevy::prelude::*;
use hs_core::{BlockPos, Creature, EntityKind, WorldPos};

/// Resolves creature identifiers and builds new creatures of a kind.
///
/// Spawners never construct entities themselves; everything they produce goes
/// through this interface so the world (or a test) decides what an entity is.
pub trait EntityRegistry {
    /// Whatever `create` hands back for the caller to insert into the world.
    type Entity;

    /// Looks up a persisted identifier.
    fn lookup(&self, identifier: &str) -> Option<EntityKind>;

    /// Builds a new entity of `kind` standing in block `at`.
    /// `None` means no factory is registered for the kind.
    fn create(&self, kind: &EntityKind, at: BlockPos) -> Option<Self::Entity>;
}

/// A creature ready to be inserted into the ECS world.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureSpawn {
    pub creature: Creature,
    pub position: WorldPos,
}

impl CreatureSpawn {
    /// Creature standing on the floor of block `at`, centred horizontally.
    pub fn standing_in(kind: &EntityKind, at: BlockPos) -> Self {
        let center = at.center();
        Self {
            creature: Creature::new(kind.clone()),
            position: WorldPos::new(center.x, at.y as f64, center.z),
        }
    }
}

/// Builds the spawn description for one creature.
pub type CreatureFactory = fn(&EntityKind, BlockPos) -> CreatureSpawn;

/// Registry of creature kinds known to the world.
///
/// A kind can be known without a factory; spawners bound to such a kind
/// resolve and count fine but produce nothing.
#[derive(Resource, Clone, Debug, Default)]
pub struct CreatureRegistry {
    kinds: HashMap<String, EntityKind>,
    factories: HashMap<EntityKind, CreatureFactory>,
}

impl CreatureRegistry {
    /// Registers a kind using `CreatureSpawn::standing_in` as its factory.
    pub fn register(&mut self, identifier: &str) -> &mut Self {
        self.register_with(identifier, CreatureSpawn::standing_in)
    }

    pub fn register_with(&mut self, identifier: &str, factory: CreatureFactory) -> &mut Self {
        let kind = self.register_kind(identifier);
        self.factories.insert(kind, factory);
        self
    }

    /// Makes a kind resolvable without giving it a factory.
    pub fn register_kind(&mut self, identifier: &str) -> EntityKind {
        self.kinds
            .entry(identifier.to_string())
            .or_insert_with(|| EntityKind::new(identifier))
            .clone()
    }

    /// Builder-style `register`.
    pub fn with(mut self, identifier: &str) -> Self {
        self.register(identifier);
        self
    }

    pub fn has_factory(&self, kind: &EntityKind) -> bool {
        self.factories.contains_key(kind)
    }
}

impl EntityRegistry for CreatureRegistry {
    type Entity = CreatureSpawn;

    fn lookup(&self, identifier: &str) -> Option<EntityKind> {
        self.kinds.get(identifier).cloned()
    }

    fn create(&self, kind: &EntityKind, at: BlockPos) -> Option<CreatureSpawn> {
        self.factories.get(kind).map(|factory| factory(kind, at))
    }
}
