//! Foundational types shared by the Hearthspawn crates.

pub mod coords;
pub mod entity;
pub mod record;

pub use coords::{BlockBox, BlockPos, WorldPos};
pub use entity::{Creature, EntityKind, Player};
pub use record::{Record, Value};
