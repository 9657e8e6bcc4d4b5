use bevy::prelude::*;
use hs_core::EntityKind;
use thiserror::Error;

use crate::config::SpawnerConfig;

/// Why a spawner refused to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationRejected {
    #[error("spawner is already bound to a creature kind")]
    AlreadyBound,
    #[error("nothing is held")]
    EmptyHand,
    #[error("held item does not carry a creature kind")]
    NotBindable,
}

/// The stack of items a user holds while clicking a spawner.
pub trait HeldStack {
    fn is_empty(&self) -> bool;

    /// Creature kind the held item can bind a spawner to, if any.
    fn bindable_kind(&self) -> Option<&EntityKind>;

    /// Removes `count` units from the stack.
    fn subtract(&mut self, count: u32);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    SpawnEgg(EntityKind),
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item: Item,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: Item, count: u32) -> Self {
        Self { item, count }
    }

    pub fn spawn_egg(kind: EntityKind, count: u32) -> Self {
        Self::new(Item::SpawnEgg(kind), count)
    }
}

impl HeldStack for ItemStack {
    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn bindable_kind(&self) -> Option<&EntityKind> {
        match &self.item {
            Item::SpawnEgg(kind) => Some(kind),
            Item::Other(_) => None,
        }
    }

    fn subtract(&mut self, count: u32) {
        self.count = self.count.saturating_sub(count);
    }
}

/// The stack in a user's main hand.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct HeldItem(pub ItemStack);

/// Binds an unbound spawner to the kind carried by the held item.
///
/// On success one unit is taken from `held` and the bound configuration is
/// returned for the caller to commit. On rejection nothing changes.
pub fn activate<H: HeldStack + ?Sized>(
    config: &SpawnerConfig,
    held: &mut H,
) -> Result<SpawnerConfig, ActivationRejected> {
    if config.is_bound() {
        return Err(ActivationRejected::AlreadyBound);
    }
    if held.is_empty() {
        return Err(ActivationRejected::EmptyHand);
    }
    let kind = held
        .bindable_kind()
        .cloned()
        .ok_or(ActivationRejected::NotBindable)?;

    held.subtract(1);
    Ok(SpawnerConfig {
        entity_kind: Some(kind),
        ..config.clone()
    })
}
