//! Setup-time errors
//!
//! Ticks never fail; everything here aborts construction before the first tick.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building an arena or loading its settings.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Grid must be at least 1x1.
    #[error("arena must be at least 1x1 cells, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// Agent ids are stored in a single byte range shared with bonus codes.
    #[error("cannot register more than {max} agents")]
    RosterFull { max: usize },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
