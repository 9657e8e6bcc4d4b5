use bevy::math::DVec3;
use hs_core::BlockPos;
use rand::Rng;

/// Horizontal reach of the classic spawner, in blocks from the block center.
pub const LEGACY_HORIZONTAL_REACH: f64 = 1.5;

/// Creatures appear this far above the spawner's center.
pub const VERTICAL_LIFT: f64 = 1.0;

/// How far from the spawner new creatures may appear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlacementEnvelope {
    /// Fixed reach of 1.5 blocks; the spawner's `spawn_range` is ignored.
    #[default]
    Legacy,
    /// Reach scales with the spawner's `spawn_range`.
    SpawnRange,
}

impl PlacementEnvelope {
    pub fn horizontal_reach(&self, spawn_range: i32) -> f64 {
        match self {
            Self::Legacy => LEGACY_HORIZONTAL_REACH,
            Self::SpawnRange => spawn_range.max(1) as f64,
        }
    }
}

/// Number of creatures to attempt this evaluation, uniform in `[0, spawn_count)`.
pub fn batch_size<R: Rng + ?Sized>(rng: &mut R, spawn_count: i32) -> usize {
    rng.gen_range(0..spawn_count.max(1)) as usize
}

/// Random offset from the spawner's center: one block up, and shifted into
/// either the positive or the negative horizontal quadrant by less than
/// `reach` on each axis.
pub fn spawn_offset<R: Rng + ?Sized>(rng: &mut R, reach: f64) -> DVec3 {
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let dx = rng.gen::<f64>() * reach;
    let dz = rng.gen::<f64>() * reach;
    DVec3::new(sign * dx, VERTICAL_LIFT, sign * dz)
}

/// Block a single creature of the batch should appear in.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    spawner: BlockPos,
    envelope: PlacementEnvelope,
    spawn_range: i32,
) -> BlockPos {
    let offset = spawn_offset(rng, envelope.horizontal_reach(spawn_range));
    BlockPos::containing(spawner.center() + offset)
}
