#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use minemap::MapperConfig;
use minemap_storage::position::{int_to_hex3, int_to_hex4, pack_position};
use rusqlite::{params, Connection};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const AIR: u16 = 126;
pub const WATER: u16 = 2;
pub const STONE: u16 = 0x800;
pub const SAND: u16 = 0x809;

pub const STONE_RGB: [u8; 3] = [100, 120, 140];
pub const SAND_RGB: [u8; 3] = [220, 200, 150];
pub const WATER_RGB: [u8; 3] = [0, 0, 255];

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A world directory with a palette, removed on drop.
pub struct TestWorld {
    root: PathBuf,
}

impl TestWorld {
    pub fn new(label: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "minemap-it-{}-{}-{}",
            label,
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("world")).unwrap();
        fs::write(
            root.join("colors.txt"),
            format!(
                "# test palette\n2 {} {} {}\n800 {} {} {}\n809 {} {} {}\n",
                WATER_RGB[0],
                WATER_RGB[1],
                WATER_RGB[2],
                STONE_RGB[0],
                STONE_RGB[1],
                STONE_RGB[2],
                SAND_RGB[0],
                SAND_RGB[1],
                SAND_RGB[2]
            ),
        )
        .unwrap();
        Self { root }
    }

    pub fn world(&self) -> PathBuf {
        self.root.join("world")
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn config(&self, output: &str) -> MapperConfig {
        MapperConfig {
            input: self.world(),
            output: self.output(output),
            colors: Some(self.root.join("colors.txt")),
            workers: 2,
            ..MapperConfig::default()
        }
    }

    fn write(&self, relative: &Path, data: &[u8]) {
        let target = self.world().join(relative);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, data).unwrap();
    }

    /// Stores a block in the `sectors2/xxx/zzz/yyyy` layout.
    pub fn write_sectors2(&self, x: i16, y: i16, z: i16, blob: &[u8]) {
        let relative = Path::new("sectors2")
            .join(int_to_hex3(x))
            .join(int_to_hex3(z))
            .join(int_to_hex4(y));
        self.write(&relative, blob);
    }

    /// Stores a block in the `sectors/xxxxzzzz/yyyy` layout.
    pub fn write_legacy(&self, x: i16, y: i16, z: i16, blob: &[u8]) {
        let relative = Path::new("sectors")
            .join(format!("{}{}", int_to_hex4(x), int_to_hex4(z)))
            .join(int_to_hex4(y));
        self.write(&relative, blob);
    }

    /// Stores blocks in `map.sqlite`, creating the table on first use.
    pub fn write_sqlite(&self, blocks: &[((i16, i16, i16), Vec<u8>)]) {
        let conn = Connection::open(self.world().join("map.sqlite")).unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS `blocks` (`pos` INT NOT NULL PRIMARY KEY, `data` BLOB)",
            [],
        )
        .unwrap();
        for ((x, y, z), data) in blocks {
            conn.execute(
                "INSERT INTO `blocks` (`pos`, `data`) VALUES (?1, ?2)",
                params![pack_position(*x, *y, *z), data],
            )
            .unwrap();
        }
    }

    pub fn write_player(&self, file: &str, text: &str) {
        self.write(&Path::new("players").join(file), text.as_bytes());
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn compress(payload: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

/// A version 20 block lit by daylight, with content chosen per local node.
pub fn block_v20(content: impl Fn(usize, usize, usize) -> u16) -> Vec<u8> {
    let mut payload = vec![0u8; 0x3000];
    for z in 0..16 {
        for y in 0..16 {
            for x in 0..16 {
                let i = x + 16 * y + 256 * z;
                let c = content(x, y, z);
                if c < 0x80 {
                    payload[i] = c as u8;
                } else {
                    payload[i] = (c >> 4) as u8;
                    payload[i + 0x2000] = ((c & 0x0f) << 4) as u8;
                }
            }
        }
    }
    let mut blob = vec![20, 0x02];
    blob.extend(compress(&payload));
    blob
}

/// A version 17 block lit by daylight, holding raw pre-20 content bytes.
pub fn block_v17(content: impl Fn(usize, usize, usize) -> u8) -> Vec<u8> {
    let mut payload = vec![0u8; 4096];
    for z in 0..16 {
        for y in 0..16 {
            for x in 0..16 {
                payload[x + 16 * y + 256 * z] = content(x, y, z);
            }
        }
    }
    let mut blob = vec![17, 0x02];
    blob.extend(compress(&payload));
    blob
}

/// Solid `content` from the block floor up to local `top`, air above.
pub fn ground(content: u16, top: usize) -> impl Fn(usize, usize, usize) -> u16 {
    move |_, y, _| if y <= top { content } else { AIR }
}

pub fn read_png(path: &Path) -> image::RgbImage {
    image::open(path).unwrap().to_rgb8()
}

/// Pixel of world node (x, z) on a map whose lowest sector coordinates are `min`.
pub fn pixel_at(image: &image::RgbImage, x: i32, z: i32, min: (i32, i32), border: u32) -> [u8; 3] {
    let h = image.height() - border;
    let px = (x - min.0 * 16) as u32 + border;
    let py = h - 1 - (z - min.1 * 16) as u32 + border;
    image.get_pixel(px, py).0
}
