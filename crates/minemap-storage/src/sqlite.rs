use crate::backend::StorageBackend;
use crate::position::{pack_position, unpack_position};
use bytes::Bytes;
use minemap_common::{Result, SectorCoord, SlotCoord};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// The `map.sqlite` layout: one `blocks(pos, data)` row per map block.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens `<world>/map.sqlite` read-only if it exists.
    pub fn open(world: &Path) -> Result<Option<Self>> {
        let path = world.join("map.sqlite");
        if !path.is_file() {
            return Ok(None);
        }
        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        conn.busy_timeout(Duration::from_secs(1))?;
        Ok(Some(Self {
            conn: Mutex::new(conn),
        }))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        // A panic while holding the lock leaves the connection itself intact
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn list_sectors(&self) -> Result<Vec<SectorCoord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT `pos` FROM `blocks`")?;
            let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
            let mut sectors = Vec::new();
            for pos in rows {
                let (x, _, z) = unpack_position(pos?);
                sectors.push(SectorCoord::new(x, z));
            }
            Ok(sectors)
        })
    }

    fn list_slots(&self, sector: SectorCoord) -> Result<Vec<i16>> {
        let min = pack_position(sector.x, -2048, sector.z);
        let max = pack_position(sector.x, 2047, sector.z);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT `pos` FROM `blocks` WHERE `pos` >= ?1 AND `pos` <= ?2 AND (`pos` - ?1) % 4096 = 0",
            )?;
            let rows = stmt.query_map(params![min, max], |row| row.get::<_, i64>(0))?;
            let mut slots = Vec::new();
            for pos in rows {
                slots.push(unpack_position(pos?).1);
            }
            Ok(slots)
        })
    }

    fn fetch(&self, slot: SlotCoord) -> Result<Option<Bytes>> {
        let pos = pack_position(slot.sector.x, slot.y, slot.sector.z);
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached("SELECT `data` FROM `blocks` WHERE `pos` = ?1 LIMIT 1")?;
            let data = stmt
                .query_row(params![pos], |row| row.get::<_, Vec<u8>>(0))
                .optional()?;
            Ok(data.map(Bytes::from))
        })
    }
}
