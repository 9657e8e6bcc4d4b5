use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of a creature type, e.g. `minecraft:zombie`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKind(String);

impl EntityKind {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The string form written to spawner records.
    pub fn identifier(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKind {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

/// A living creature of a known kind.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Creature {
    pub kind: EntityKind,
}

impl Creature {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }
}

/// Player marker component.
/// Players are the observers whose presence wakes spawners up.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;
