pub mod canvas;
pub mod config;
pub mod font;
pub mod overlay;
pub mod pipeline;
pub mod players;
pub mod progress;

// Re-export commonly used items
pub use config::{parse_args, Command, MapperConfig};
pub use minemap_common::{MapperError, Result};
pub use pipeline::{run, RenderSummary};
