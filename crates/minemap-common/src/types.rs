use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, crate::error::MapperError>;

/// Side length of a sector and of a map block, in nodes.
pub const SECTOR_SIZE: i32 = 16;

/// A 16x16 column of the world, identified by its horizontal position in sector units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorCoord {
    pub x: i16,
    pub z: i16,
}

impl SectorCoord {
    pub fn new(x: i16, z: i16) -> Self {
        Self { x, z }
    }

    /// World coordinates of the node at local (x, z) inside this sector.
    pub fn world_xz(&self, x: usize, z: usize) -> (i32, i32) {
        (
            self.x as i32 * SECTOR_SIZE + x as i32,
            self.z as i32 * SECTOR_SIZE + z as i32,
        )
    }
}

/// One persisted map block: a sector plus a vertical block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotCoord {
    pub sector: SectorCoord,
    pub y: i16,
}

impl SlotCoord {
    pub fn new(sector: SectorCoord, y: i16) -> Self {
        Self { sector, y }
    }
}

/// Inclusive bounding box in sector units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorBox {
    pub xmin: i16,
    pub xmax: i16,
    pub zmin: i16,
    pub zmax: i16,
}

impl SectorBox {
    pub fn contains(&self, sector: SectorCoord) -> bool {
        sector.x >= self.xmin && sector.x <= self.xmax && sector.z >= self.zmin && sector.z <= self.zmax
    }
}

impl Default for SectorBox {
    // 1500 nodes in every direction from the origin, rounded down to sectors
    fn default() -> Self {
        Self {
            xmin: (-1500i16).div_euclid(16),
            xmax: 1500i16.div_euclid(16),
            zmin: (-1500i16).div_euclid(16),
            zmax: 1500i16.div_euclid(16),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
