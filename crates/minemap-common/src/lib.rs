pub mod content;
pub mod error;
pub mod types;

pub use error::MapperError;
pub use types::{Result, Rgb, SectorBox, SectorCoord, SlotCoord};
