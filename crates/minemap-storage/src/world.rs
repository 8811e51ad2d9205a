use crate::backend::{retry_transient, StorageBackend};
use crate::legacy::LegacySectorBackend;
use crate::sectors2::SectorDirBackend;
use crate::sqlite::SqliteBackend;
use bytes::Bytes;
use minemap_common::{Result, SectorCoord, SlotCoord};
use minemap_logger::log::log;
use minemap_logger::severity::LogSeverity::Debug;
use std::path::Path;

/// The map blocks of one sector as held by the backend that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorSlots {
    pub sector: SectorCoord,
    /// Index into [`WorldStorage::backends`].
    pub backend: usize,
    /// Vertical block indices, highest first.
    pub ys: Vec<i16>,
}

/// All storage layouts present in a world, in lookup priority order.
pub struct WorldStorage {
    backends: Vec<Box<dyn StorageBackend>>,
}

impl WorldStorage {
    /// Opens every layout present under `world`: `map.sqlite`, then `sectors`,
    /// then `sectors2`.
    pub fn open(world: &Path) -> Result<Self> {
        let mut backends: Vec<Box<dyn StorageBackend>> = Vec::new();
        if let Some(sqlite) = SqliteBackend::open(world)? {
            backends.push(Box::new(sqlite));
        }
        if let Some(legacy) = LegacySectorBackend::open(world) {
            backends.push(Box::new(legacy));
        }
        if let Some(sectors2) = SectorDirBackend::open(world) {
            backends.push(Box::new(sectors2));
        }
        for backend in &backends {
            log(format!("Found {} storage", backend.name()), Debug);
        }
        Ok(Self { backends })
    }

    pub fn from_backends(backends: Vec<Box<dyn StorageBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[Box<dyn StorageBackend>] {
        &self.backends
    }

    /// Finds the first backend holding blocks for `sector`. Backends are never
    /// merged: a lower-priority layout is ignored once one has data.
    pub fn probe(&self, sector: SectorCoord) -> Result<Option<SectorSlots>> {
        for (index, backend) in self.backends.iter().enumerate() {
            let mut ys = retry_transient(backend.name(), || backend.list_slots(sector))?;
            if ys.is_empty() {
                continue;
            }
            ys.sort_unstable_by(|a, b| b.cmp(a));
            ys.dedup();
            return Ok(Some(SectorSlots {
                sector,
                backend: index,
                ys,
            }));
        }
        Ok(None)
    }

    pub fn fetch(&self, slots: &SectorSlots, y: i16) -> Result<Option<Bytes>> {
        let backend = &self.backends[slots.backend];
        let slot = SlotCoord::new(slots.sector, y);
        retry_transient(backend.name(), || backend.fetch(slot))
    }
}
