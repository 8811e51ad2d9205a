use crate::backend::StorageBackend;
use crate::dirs::{read_block_file, read_dir_names, read_slot_names};
use crate::position::{hex3_to_int, int_to_hex3, int_to_hex4};
use bytes::Bytes;
use minemap_common::{Result, SectorCoord, SlotCoord};
use std::path::{Path, PathBuf};

/// The nested directory layout: `sectors2/xxx/zzz/yyyy`.
pub struct SectorDirBackend {
    root: PathBuf,
}

impl SectorDirBackend {
    /// Opens `<world>/sectors2` if it exists.
    pub fn open(world: &Path) -> Option<Self> {
        let root = world.join("sectors2");
        root.is_dir().then_some(Self { root })
    }

    fn sector_dir(&self, sector: SectorCoord) -> PathBuf {
        self.root
            .join(int_to_hex3(sector.x))
            .join(int_to_hex3(sector.z))
    }
}

impl StorageBackend for SectorDirBackend {
    fn name(&self) -> &'static str {
        "sectors2"
    }

    fn list_sectors(&self) -> Result<Vec<SectorCoord>> {
        let mut sectors = Vec::new();
        for x_name in read_dir_names(&self.root)?.unwrap_or_default() {
            let Some(x) = hex3_to_int(&x_name) else {
                continue;
            };
            for z_name in read_dir_names(&self.root.join(&x_name))?.unwrap_or_default() {
                if let Some(z) = hex3_to_int(&z_name) {
                    sectors.push(SectorCoord::new(x, z));
                }
            }
        }
        Ok(sectors)
    }

    fn list_slots(&self, sector: SectorCoord) -> Result<Vec<i16>> {
        read_slot_names(&self.sector_dir(sector))
    }

    fn fetch(&self, slot: SlotCoord) -> Result<Option<Bytes>> {
        read_block_file(&self.sector_dir(slot.sector).join(int_to_hex4(slot.y)))
    }
}
