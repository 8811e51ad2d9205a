use crate::backend::retry_transient;
use crate::world::WorldStorage;
use minemap_common::{MapperError, Result, SectorBox, SectorCoord};
use minemap_logger::log::log;
use minemap_logger::severity::LogSeverity::{Info, Warning};
use std::collections::BTreeSet;

/// Sorted, duplicate-free sectors inside `bbox` held by any backend.
///
/// A backend whose listing fails is reported and left out. Finding nothing at
/// all is an error, since there is no picture to draw.
pub fn enumerate_sectors(storage: &WorldStorage, bbox: &SectorBox) -> Result<Vec<SectorCoord>> {
    let mut sectors = BTreeSet::new();
    for backend in storage.backends() {
        match retry_transient(backend.name(), || backend.list_sectors()) {
            Ok(listed) => {
                let before = sectors.len();
                sectors.extend(listed.into_iter().filter(|sector| bbox.contains(*sector)));
                log(
                    format!(
                        "{} storage: {} new sectors in range",
                        backend.name(),
                        sectors.len() - before
                    ),
                    Info,
                );
            }
            Err(err) => log(
                format!("Failed to list {} storage: {}", backend.name(), err),
                Warning,
            ),
        }
    }

    if sectors.is_empty() {
        return Err(MapperError::NoData);
    }
    Ok(sectors.into_iter().collect())
}
