use crate::translation::legacy_translate;
use byteorder::ReadBytesExt;
use flate2::read::ZlibDecoder;
use minemap_common::content::ContentId;
use minemap_common::{MapperError, Result};
use std::io::{Cursor, Read};

/// Edge length of a map block in nodes.
pub const BLOCK_SIZE: usize = 16;
const NODE_COUNT: usize = BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE;

/// Offset of the plane whose high nibble extends content bytes >= 0x80.
const HIGH_NIBBLE_PLANE: usize = 0x2000;

const FLAG_DAY_NIGHT_DIFFERS: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub version: u8,
    pub day_night_differs: bool,
}

impl ChunkHeader {
    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let version = reader.read_u8()?;
        let flags = reader.read_u8()?;
        Ok(Self {
            version,
            day_night_differs: flags & FLAG_DAY_NIGHT_DIFFERS != 0,
        })
    }
}

/// Content ids of a 16x16x16 block, indexed `x + 16y + 256z`.
/// A grid recovered from a malformed block holds no nodes at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGrid {
    nodes: Option<Box<[ContentId; NODE_COUNT]>>,
}

impl ContentGrid {
    pub fn empty() -> Self {
        Self { nodes: None }
    }

    pub fn filled(content: ContentId) -> Self {
        Self {
            nodes: Some(Box::new([content; NODE_COUNT])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_none()
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<ContentId> {
        self.nodes.as_ref().map(|nodes| nodes[node_index(x, y, z)])
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, content: ContentId) {
        let nodes = self.nodes.get_or_insert_with(|| Box::new([0; NODE_COUNT]));
        nodes[node_index(x, y, z)] = content;
    }
}

pub fn node_index(x: usize, y: usize, z: usize) -> usize {
    x + y * BLOCK_SIZE + z * BLOCK_SIZE * BLOCK_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    pub header: ChunkHeader,
    pub grid: ContentGrid,
    /// Set when the payload could not be inflated or was too short; the grid
    /// is empty in that case.
    pub malformed: Option<String>,
}

/// Decodes a raw map block: `[version][flags][zlib payload]`.
///
/// Only versions 16 to 20 are readable. A payload that fails to inflate is
/// not an error; it yields an empty grid with `malformed` describing why.
pub fn decode(raw: &[u8]) -> Result<DecodedBlock> {
    if raw.len() < 2 {
        return Err(MapperError::Truncated(raw.len()));
    }
    let mut reader = Cursor::new(raw);
    let header = ChunkHeader::read(&mut reader)?;

    let required = match header.version {
        20 => HIGH_NIBBLE_PLANE + NODE_COUNT,
        16..=19 => NODE_COUNT,
        version => return Err(MapperError::UnsupportedFormatVersion(version)),
    };

    let mut data = Vec::new();
    if let Err(err) = ZlibDecoder::new(&mut reader).read_to_end(&mut data) {
        return Ok(DecodedBlock {
            header,
            grid: ContentGrid::empty(),
            malformed: Some(format!("zlib: {}", err)),
        });
    }
    if data.len() < required {
        return Ok(DecodedBlock {
            header,
            grid: ContentGrid::empty(),
            malformed: Some(format!("payload {} bytes, expected {}", data.len(), required)),
        });
    }

    let mut nodes = Box::new([0; NODE_COUNT]);
    for (i, node) in nodes.iter_mut().enumerate() {
        *node = read_content(&data, header.version, i);
    }

    Ok(DecodedBlock {
        header,
        grid: ContentGrid { nodes: Some(nodes) },
        malformed: None,
    })
}

fn read_content(data: &[u8], version: u8, i: usize) -> ContentId {
    let raw = data[i];
    if version == 20 {
        if raw < 0x80 {
            raw as ContentId
        } else {
            ((raw as ContentId) << 4) | (data[i + HIGH_NIBBLE_PLANE] >> 4) as ContentId
        }
    } else {
        legacy_translate(raw)
    }
}
