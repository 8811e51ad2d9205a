pub mod decode;
pub mod translation;

pub use decode::{decode, ChunkHeader, ContentGrid, DecodedBlock, BLOCK_SIZE};
pub use translation::legacy_translate;
