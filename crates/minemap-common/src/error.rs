use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum MapperError {
    IoError(std::io::Error),
    SqliteError(rusqlite::Error),
    /// Map block carries a format version the decoder cannot read.
    UnsupportedFormatVersion(u8),
    /// Map block is too short to hold its header.
    Truncated(usize),
    PaletteError(String),
    ConfigError(String),
    /// None of the storage backends has a sector inside the requested area.
    NoData,
    OutputError(String),
}

impl MapperError {
    /// Whether a storage read that failed with this error may succeed if repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            MapperError::IoError(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            MapperError::SqliteError(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::IoError(err) => write!(f, "IO error: {}", err),
            MapperError::SqliteError(err) => write!(f, "SQLite error: {}", err),
            MapperError::UnsupportedFormatVersion(version) => {
                write!(f, "Unsupported map format: {}", version)
            }
            MapperError::Truncated(len) => write!(f, "Map block truncated ({} bytes)", len),
            MapperError::PaletteError(msg) => write!(f, "Palette error: {}", msg),
            MapperError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            MapperError::NoData => write!(f, "No map data found in the requested area"),
            MapperError::OutputError(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl Error for MapperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MapperError::IoError(err) => Some(err),
            MapperError::SqliteError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapperError {
    fn from(err: std::io::Error) -> Self {
        MapperError::IoError(err)
    }
}

impl From<rusqlite::Error> for MapperError {
    fn from(err: rusqlite::Error) -> Self {
        MapperError::SqliteError(err)
    }
}
