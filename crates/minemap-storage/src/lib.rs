pub mod backend;
pub mod dirs;
pub mod enumerator;
pub mod legacy;
pub mod position;
pub mod sectors2;
pub mod sqlite;
pub mod world;

#[cfg(test)]
pub(crate) mod testutil;

pub use backend::StorageBackend;
pub use enumerator::enumerate_sectors;
pub use legacy::LegacySectorBackend;
pub use sectors2::SectorDirBackend;
pub use sqlite::SqliteBackend;
pub use world::{SectorSlots, WorldStorage};
