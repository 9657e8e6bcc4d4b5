use bevy::math::DVec3;
use hs_core::{BlockBox, EntityKind};

/// What a spawner can see of one entity near it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityView<'a> {
    pub kind: Option<&'a EntityKind>,
    /// Whether the entity counts as a player for activation purposes.
    pub observer: bool,
}

/// Spatial queries a spawner runs during evaluation.
///
/// Both queries of a single evaluation must see the same set of entities.
pub trait ProximityOracle {
    fn entities_within(&self, region: BlockBox) -> impl Iterator<Item = EntityView<'_>>;

    fn observer_within(&self, region: BlockBox) -> bool {
        self.entities_within(region).any(|e| e.observer)
    }

    /// Counts entities of `kind` in `region`, stopping at `limit`.
    fn count_kind_within(&self, region: BlockBox, kind: &EntityKind, limit: usize) -> usize {
        self.entities_within(region)
            .filter(|e| e.kind == Some(kind))
            .take(limit)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NearbyEntity {
    pub position: DVec3,
    pub kind: Option<EntityKind>,
    pub observer: bool,
}

/// Entities captured once per tick, shared by every spawner evaluated in it.
#[derive(Clone, Debug, Default)]
pub struct NearbySnapshot {
    entities: Vec<NearbyEntity>,
}

impl NearbySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: NearbyEntity) {
        self.entities.push(entity);
    }

    /// Adds a player-like observer.
    pub fn with_observer(mut self, position: DVec3) -> Self {
        self.push(NearbyEntity {
            position,
            kind: None,
            observer: true,
        });
        self
    }

    pub fn with_creature(mut self, kind: EntityKind, position: DVec3) -> Self {
        self.push(NearbyEntity {
            position,
            kind: Some(kind),
            observer: false,
        });
        self
    }
}

impl FromIterator<NearbyEntity> for NearbySnapshot {
    fn from_iter<I: IntoIterator<Item = NearbyEntity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl ProximityOracle for NearbySnapshot {
    fn entities_within(&self, region: BlockBox) -> impl Iterator<Item = EntityView<'_>> {
        self.entities
            .iter()
            .filter(move |e| region.contains_point(e.position))
            .map(|e| EntityView {
                kind: e.kind.as_ref(),
                observer: e.observer,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_core::BlockPos;

    #[test]
    fn observer_outside_region_is_ignored() {
        let region = BlockBox::around(BlockPos::new(0, 64, 0), 16);
        let snapshot = NearbySnapshot::new().with_observer(DVec3::new(17.5, 64.0, 0.0));
        assert!(!snapshot.observer_within(region));

        let snapshot = snapshot.with_observer(DVec3::new(16.5, 80.9, -16.0));
        assert!(snapshot.observer_within(region));
    }

    #[test]
    fn count_matches_kind_and_stops_at_limit() {
        let zombie = EntityKind::from("minecraft:zombie");
        let region = BlockBox::around(BlockPos::new(0, 0, 0), 4);
        let snapshot = (0..5)
            .map(|i| NearbyEntity {
                position: DVec3::new(i as f64, 0.0, 0.0),
                kind: Some(zombie.clone()),
                observer: false,
            })
            .collect::<NearbySnapshot>()
            .with_creature(EntityKind::from("minecraft:pig"), DVec3::ZERO)
            .with_creature(zombie.clone(), DVec3::new(40.0, 0.0, 0.0));

        assert_eq!(snapshot.count_kind_within(region, &zombie, 10), 5);
        assert_eq!(snapshot.count_kind_within(region, &zombie, 3), 3);
    }
}
