pub mod columns;
pub mod compositor;
pub mod palette;
pub mod shader;

pub use columns::{ColumnRecord, WorldColumns};
pub use compositor::{composite_sector, SectorCompositor};
pub use palette::Palette;
pub use shader::HeightShader;
