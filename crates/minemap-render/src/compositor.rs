use crate::columns::ColumnRecord;
use crate::palette::Palette;
use minemap_common::content::{content_is_air, content_is_water};
use minemap_common::{MapperError, Result, SectorCoord};
use minemap_logger::log::log;
use minemap_logger::severity::LogSeverity::{Debug, Warning};
use minemap_mapblock::{decode, DecodedBlock, BLOCK_SIZE};
use minemap_storage::WorldStorage;

const COLUMNS: usize = BLOCK_SIZE * BLOCK_SIZE;

fn column_index(x: usize, z: usize) -> usize {
    x + z * BLOCK_SIZE
}

/// Reduces the map blocks of one sector, fed from the top down, to one
/// column record per horizontal position.
pub struct SectorCompositor {
    sector: SectorCoord,
    pending: [bool; COLUMNS],
    pending_count: usize,
    water_depth: [u32; COLUMNS],
    records: [Option<ColumnRecord>; COLUMNS],
}

impl SectorCompositor {
    pub fn new(sector: SectorCoord) -> Self {
        Self {
            sector,
            pending: [true; COLUMNS],
            pending_count: COLUMNS,
            water_depth: [0; COLUMNS],
            records: [None; COLUMNS],
        }
    }

    pub fn sector(&self) -> SectorCoord {
        self.sector
    }

    pub fn is_pending(&self, x: usize, z: usize) -> bool {
        self.pending[column_index(x, z)]
    }

    pub fn water_depth(&self, x: usize, z: usize) -> u32 {
        self.water_depth[column_index(x, z)]
    }

    pub fn record(&self, x: usize, z: usize) -> Option<&ColumnRecord> {
        self.records[column_index(x, z)].as_ref()
    }

    /// Every column has reached a drawable node; lower blocks cannot change anything.
    pub fn is_complete(&self) -> bool {
        self.pending_count == 0
    }

    /// Scans the still pending columns of the block at vertical index `block_y`.
    ///
    /// Air and unknown content are looked through. Water deepens the column and
    /// leaves a provisional record, so a sea without a visible bed is still
    /// drawn. The first node with a palette colour ends the column.
    pub fn feed(&mut self, block_y: i16, block: &DecodedBlock, palette: &Palette) {
        let base_y = block_y as i32 * BLOCK_SIZE as i32;
        let day_night_differs = block.header.day_night_differs;

        for z in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                let column = column_index(x, z);
                if !self.pending[column] {
                    continue;
                }
                for y in (0..BLOCK_SIZE).rev() {
                    let Some(content) = block.grid.get(x, y, z) else {
                        break;
                    };
                    if content_is_air(content) {
                        continue;
                    }

                    let water = content_is_water(content);
                    if water {
                        self.water_depth[column] += 1;
                    } else if !palette.contains(content) {
                        log(
                            format!(
                                "strange block: sector {},{} block {} x: {} y: {} z: {} block id: {:x}",
                                self.sector.x, self.sector.z, block_y, x, y, z, content
                            ),
                            Warning,
                        );
                        continue;
                    }

                    self.records[column] = Some(ColumnRecord {
                        height: base_y + y as i32,
                        content,
                        water_depth: self.water_depth[column],
                        day_night_differs,
                    });

                    if !water {
                        self.pending[column] = false;
                        self.pending_count -= 1;
                        break;
                    }
                }
            }
        }
    }

    /// Records keyed by world (x, z). Columns where nothing visible was found
    /// are left out.
    pub fn finish(self) -> Vec<((i32, i32), ColumnRecord)> {
        let mut out = Vec::new();
        for z in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                if let Some(record) = self.records[column_index(x, z)] {
                    out.push((self.sector.world_xz(x, z), record));
                }
            }
        }
        out
    }
}

/// Reads one sector from storage top to bottom and composites its columns.
///
/// Unreadable blocks are skipped with a diagnostic; the sector as a whole
/// only fails on a storage error. Returns `None` when no backend holds it.
pub fn composite_sector(
    storage: &WorldStorage,
    sector: SectorCoord,
    palette: &Palette,
) -> Result<Option<Vec<((i32, i32), ColumnRecord)>>> {
    let Some(slots) = storage.probe(sector)? else {
        return Ok(None);
    };

    let mut compositor = SectorCompositor::new(sector);
    for &y in &slots.ys {
        let Some(raw) = storage.fetch(&slots, y)? else {
            continue;
        };
        match decode(&raw) {
            Ok(block) => {
                if let Some(reason) = &block.malformed {
                    log(
                        format!("bad block: {},{} y {}: {}", sector.x, sector.z, y, reason),
                        Warning,
                    );
                }
                compositor.feed(y, &block, palette);
            }
            Err(err @ MapperError::UnsupportedFormatVersion(_))
            | Err(err @ MapperError::Truncated(_)) => {
                log(
                    format!("skipping block {},{} y {}: {}", sector.x, sector.z, y, err),
                    Warning,
                );
                continue;
            }
            Err(err) => return Err(err),
        }

        if compositor.is_complete() {
            log(
                format!("sector {},{} complete at block {}", sector.x, sector.z, y),
                Debug,
            );
            break;
        }
    }

    Ok(Some(compositor.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use minemap_common::{Rgb, SlotCoord};
    use minemap_mapblock::{ChunkHeader, ContentGrid};
    use minemap_storage::StorageBackend;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const AIR: u16 = 126;
    const WATER: u16 = 2;
    const STONE: u16 = 0x800;
    const SAND: u16 = 0x809;
    const UNKNOWN: u16 = 0x7ff;

    fn palette() -> Palette {
        let mut palette = Palette::new();
        palette.insert(WATER, Rgb::new(0, 0, 255));
        palette.insert(STONE, Rgb::new(100, 100, 100));
        palette.insert(SAND, Rgb::new(200, 200, 0));
        palette
    }

    fn block(grid: ContentGrid, day_night_differs: bool) -> DecodedBlock {
        DecodedBlock {
            header: ChunkHeader {
                version: 20,
                day_night_differs,
            },
            grid,
            malformed: None,
        }
    }

    /// A column at (x, z) with `top_down[0]` at y = 15, the rest of the block air.
    fn column_block(x: usize, z: usize, top_down: &[u16]) -> DecodedBlock {
        let mut grid = ContentGrid::filled(AIR);
        for (i, content) in top_down.iter().enumerate() {
            grid.set(x, 15 - i, z, *content);
        }
        block(grid, true)
    }

    #[test]
    fn test_water_then_solid() {
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        compositor.feed(0, &column_block(3, 4, &[AIR, AIR, WATER, WATER, STONE]), &palette());

        assert_eq!(compositor.water_depth(3, 4), 2);
        assert!(!compositor.is_pending(3, 4));
        assert_eq!(
            compositor.record(3, 4),
            Some(&ColumnRecord {
                height: 11,
                content: STONE,
                water_depth: 2,
                day_night_differs: true,
            })
        );
        // the rest of the block is air
        assert!(compositor.is_pending(0, 0));
        assert!(compositor.record(0, 0).is_none());
    }

    #[test]
    fn test_water_without_bed_leaves_provisional_record() {
        let mut compositor = SectorCompositor::new(SectorCoord::new(1, -1));
        compositor.feed(-1, &column_block(0, 0, &[WATER, WATER, WATER]), &palette());

        assert!(compositor.is_pending(0, 0));
        let record = compositor.record(0, 0).unwrap();
        assert_eq!(record.content, WATER);
        assert_eq!(record.water_depth, 3);
        // the lowest water node wins
        assert_eq!(record.height, -16 + 13);

        let records = compositor.finish();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, (16, -16));
    }

    #[test]
    fn test_water_depth_spans_blocks() {
        let palette = palette();
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        let mut upper = ContentGrid::filled(AIR);
        grid_fill_column(&mut upper, 5, 5, 0..4, WATER);
        compositor.feed(1, &block(upper, true), &palette);
        assert_eq!(compositor.water_depth(5, 5), 4);

        let mut lower = ContentGrid::filled(AIR);
        grid_fill_column(&mut lower, 5, 5, 14..16, WATER);
        lower.set(5, 13, 5, SAND);
        compositor.feed(0, &block(lower, false), &palette);

        let record = compositor.record(5, 5).unwrap();
        assert_eq!(record.water_depth, 6);
        assert_eq!(record.content, SAND);
        assert_eq!(record.height, 13);
        assert!(!record.day_night_differs);
    }

    fn grid_fill_column(grid: &mut ContentGrid, x: usize, z: usize, ys: std::ops::Range<usize>, content: u16) {
        for y in ys {
            grid.set(x, y, z, content);
        }
    }

    #[test]
    fn test_unrecognized_content_is_looked_through() {
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        compositor.feed(0, &column_block(1, 1, &[UNKNOWN, AIR, SAND]), &palette());
        let record = compositor.record(1, 1).unwrap();
        assert_eq!(record.content, SAND);
        assert_eq!(record.height, 13);
    }

    #[test]
    fn test_unrecognized_content_never_terminates() {
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        compositor.feed(0, &column_block(1, 1, &[UNKNOWN; 16]), &palette());
        assert!(compositor.is_pending(1, 1));
        assert!(compositor.record(1, 1).is_none());
    }

    #[test]
    fn test_finished_columns_ignore_lower_blocks() {
        let palette = palette();
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        compositor.feed(2, &column_block(0, 0, &[SAND]), &palette);
        compositor.feed(1, &block(ContentGrid::filled(STONE), true), &palette);

        assert_eq!(compositor.record(0, 0).unwrap().content, SAND);
        assert_eq!(compositor.record(0, 0).unwrap().height, 47);
        assert_eq!(compositor.record(1, 0).unwrap().content, STONE);
        assert_eq!(compositor.record(1, 0).unwrap().height, 31);
        assert!(compositor.is_complete());
    }

    #[test]
    fn test_empty_grid_changes_nothing() {
        let mut compositor = SectorCompositor::new(SectorCoord::new(0, 0));
        compositor.feed(0, &block(ContentGrid::empty(), true), &palette());
        assert!(!compositor.is_complete());
        assert!(compositor.finish().is_empty());
    }

    // Storage with an optional per-slot blob, counting fetches.
    struct MemoryBackend {
        blocks: Vec<(SlotCoord, Vec<u8>)>,
        fetches: Arc<AtomicUsize>,
    }

    impl StorageBackend for MemoryBackend {
        fn name(&self) -> &'static str {
            "memory"
        }

        fn list_sectors(&self) -> Result<Vec<SectorCoord>> {
            Ok(self.blocks.iter().map(|(slot, _)| slot.sector).collect())
        }

        fn list_slots(&self, sector: SectorCoord) -> Result<Vec<i16>> {
            Ok(self
                .blocks
                .iter()
                .filter(|(slot, _)| slot.sector == sector)
                .map(|(slot, _)| slot.y)
                .collect())
        }

        fn fetch(&self, slot: SlotCoord) -> Result<Option<Bytes>> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            Ok(self
                .blocks
                .iter()
                .find(|(s, _)| *s == slot)
                .map(|(_, data)| Bytes::from(data.clone())))
        }
    }

    fn raw_block(version: u8, contents: &[u8; 4096]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(contents).unwrap();
        let mut raw = vec![version, 0x02];
        raw.extend(encoder.finish().unwrap());
        raw
    }

    #[test]
    fn test_composite_skips_unsupported_version() {
        let sector = SectorCoord::new(0, 0);
        let mut top = [126u8; 4096];
        top[15 * 16] = 13; // sand at x=0 y=15 z=0
        let backend = MemoryBackend {
            blocks: vec![
                (SlotCoord::new(sector, 3), raw_block(5, &[13; 4096])),
                (SlotCoord::new(sector, 2), raw_block(18, &top)),
                (SlotCoord::new(sector, 1), raw_block(18, &[1; 4096])),
            ],
            fetches: Arc::new(AtomicUsize::new(0)),
        };
        let storage = WorldStorage::from_backends(vec![Box::new(backend)]);

        let records = composite_sector(&storage, sector, &palette()).unwrap().unwrap();
        assert_eq!(records.len(), 256);
        let corner = records.iter().find(|(key, _)| *key == (0, 0)).unwrap().1;
        assert_eq!(corner.content, SAND);
        assert_eq!(corner.height, 47);
        let other = records.iter().find(|(key, _)| *key == (1, 0)).unwrap().1;
        assert_eq!(other.content, STONE);
        assert_eq!(other.height, 31);
    }

    #[test]
    fn test_composite_stops_when_complete() {
        let sector = SectorCoord::new(2, 3);
        let fetches = Arc::new(AtomicUsize::new(0));
        let backend = MemoryBackend {
            blocks: vec![
                (SlotCoord::new(sector, 0), raw_block(18, &[1; 4096])),
                (SlotCoord::new(sector, -1), raw_block(18, &[1; 4096])),
                (SlotCoord::new(sector, -2), raw_block(18, &[1; 4096])),
            ],
            fetches: fetches.clone(),
        };
        let storage = WorldStorage::from_backends(vec![Box::new(backend)]);

        let records = composite_sector(&storage, sector, &palette()).unwrap().unwrap();
        assert_eq!(records.len(), 256);
        assert!(records.iter().all(|(_, r)| r.height == 15));
        assert_eq!(fetches.load(Ordering::Relaxed), 1);
        assert_eq!(records[0].0, (32, 48));
    }

    #[test]
    fn test_composite_corrupt_block_is_skipped() {
        let sector = SectorCoord::new(0, 0);
        let backend = MemoryBackend {
            blocks: vec![
                (SlotCoord::new(sector, 1), vec![18, 0x02, 0xff, 0xff, 0xff]),
                (SlotCoord::new(sector, 0), raw_block(18, &[13; 4096])),
            ],
            fetches: Arc::new(AtomicUsize::new(0)),
        };
        let storage = WorldStorage::from_backends(vec![Box::new(backend)]);

        let records = composite_sector(&storage, sector, &palette()).unwrap().unwrap();
        assert_eq!(records.len(), 256);
        assert!(records.iter().all(|(_, r)| r.content == SAND && r.height == 15));
    }

    #[test]
    fn test_composite_unknown_sector() {
        let storage = WorldStorage::from_backends(Vec::new());
        assert!(composite_sector(&storage, SectorCoord::new(0, 0), &palette())
            .unwrap()
            .is_none());
    }
}
