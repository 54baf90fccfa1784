//! Error types for the turn log.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors that can occur while recording or playing back a turn log.
///
/// Format faults refuse playback outright; there is no best-effort
/// recovery from a log that cannot be trusted byte for byte.
#[derive(Debug)]
pub enum LogError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The file does not start with the expected `b"LAIR"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The file ends inside an entry, or its length is not a whole
    /// number of entries.
    TruncatedEntry {
        /// Bytes left over past the last whole entry.
        trailing: u64,
    },
    /// A turn index past the end of the log was requested.
    TurnOutOfRange {
        /// The requested turn index.
        requested: u64,
        /// Number of turns the log holds.
        stored: u64,
    },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"LAIR\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::TruncatedEntry { trailing } => {
                write!(f, "log truncated mid-entry ({trailing} trailing bytes)")
            }
            Self::TurnOutOfRange { requested, stored } => {
                write!(f, "turn {requested} out of range ({stored} turns stored)")
            }
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
