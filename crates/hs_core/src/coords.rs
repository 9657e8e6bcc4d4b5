use bevy::math::DVec3;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer position of a block in the world grid.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Default, Component, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position shifted by the given amount on each axis.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    /// World-space position of the block's minimum corner.
    pub fn corner(&self) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// World-space position of the block's center.
    pub fn center(&self) -> DVec3 {
        self.corner() + DVec3::splat(0.5)
    }

    /// Block containing a world-space point.
    pub fn containing(point: DVec3) -> Self {
        let floored = point.floor();
        Self::new(floored.x as i32, floored.y as i32, floored.z as i32)
    }
}

/// Continuous world-space position using f64 for precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Component, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// Axis-aligned region of whole blocks, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBox {
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Cube centered on `center` reaching `radius` blocks out along every axis.
    /// Each side spans `2 * radius + 1` blocks.
    pub fn around(center: BlockPos, radius: i32) -> Self {
        let r = radius.max(0);
        Self::new(center.offset(-r, -r, -r), center.offset(r, r, r))
    }

    /// Whether a world-space point lies inside one of the box's blocks.
    pub fn contains_point(&self, point: DVec3) -> bool {
        let lo = self.min.corner();
        let hi = self.max.corner() + DVec3::ONE;
        point.x >= lo.x
            && point.x < hi.x
            && point.y >= lo.y
            && point.y < hi.y
            && point.z >= lo.z
            && point.z < hi.z
    }
}
