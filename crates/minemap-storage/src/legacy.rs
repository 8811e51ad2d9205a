use crate::backend::StorageBackend;
use crate::dirs::{read_block_file, read_dir_names, read_slot_names};
use crate::position::{hex4_to_int, int_to_hex4};
use bytes::Bytes;
use minemap_common::{Result, SectorCoord, SlotCoord};
use std::path::{Path, PathBuf};

/// The oldest directory layout: `sectors/xxxxzzzz/yyyy`.
pub struct LegacySectorBackend {
    root: PathBuf,
}

impl LegacySectorBackend {
    /// Opens `<world>/sectors` if it exists.
    pub fn open(world: &Path) -> Option<Self> {
        let root = world.join("sectors");
        root.is_dir().then_some(Self { root })
    }

    fn sector_dir(&self, sector: SectorCoord) -> PathBuf {
        self.root
            .join(format!("{}{}", int_to_hex4(sector.x), int_to_hex4(sector.z)))
    }
}

fn parse_sector_name(name: &str) -> Option<SectorCoord> {
    if name.len() != 8 || !name.is_ascii() {
        return None;
    }
    let x = hex4_to_int(&name[..4])?;
    let z = hex4_to_int(&name[4..])?;
    Some(SectorCoord::new(x, z))
}

impl StorageBackend for LegacySectorBackend {
    fn name(&self) -> &'static str {
        "sectors"
    }

    fn list_sectors(&self) -> Result<Vec<SectorCoord>> {
        let names = read_dir_names(&self.root)?.unwrap_or_default();
        Ok(names.iter().filter_map(|name| parse_sector_name(name)).collect())
    }

    fn list_slots(&self, sector: SectorCoord) -> Result<Vec<i16>> {
        read_slot_names(&self.sector_dir(sector))
    }

    fn fetch(&self, slot: SlotCoord) -> Result<Option<Bytes>> {
        read_block_file(&self.sector_dir(slot.sector).join(int_to_hex4(slot.y)))
    }
}
