use bytes::Bytes;
use minemap_common::{Result, SectorCoord, SlotCoord};
use minemap_logger::log::log;
use minemap_logger::severity::LogSeverity::Warning;
use std::thread;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;

/// Capability interface of one world storage layout.
///
/// Absence is never an error: a sector the backend does not hold lists no
/// slots, and a slot it does not hold fetches as `None`.
pub trait StorageBackend: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Every sector the backend holds, unfiltered and possibly repeated.
    fn list_sectors(&self) -> Result<Vec<SectorCoord>>;

    /// Vertical block indices stored for `sector`, in no particular order.
    fn list_slots(&self, sector: SectorCoord) -> Result<Vec<i16>>;

    /// Raw map block bytes for `slot`.
    fn fetch(&self, slot: SlotCoord) -> Result<Option<Bytes>>;
}

/// Runs a storage read, repeating it while it fails with a transient error.
pub fn retry_transient<T>(what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                log(
                    format!("{} failed (attempt {}): {}, retrying", what, attempt, err),
                    Warning,
                );
                thread::sleep(Duration::from_millis(50 * attempt as u64));
                attempt += 1;
            }
            result => return result,
        }
    }
}
