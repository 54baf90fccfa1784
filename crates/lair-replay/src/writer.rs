//! Turn-log recording writer.
//!
//! [`TurnLogWriter`] appends fixed-size entries to any `Write` sink.
//! The header is written immediately on construction, and every entry
//! is flushed before `append_turn` returns, so a crash loses at most
//! the in-flight turn.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lair_core::TurnTable;

use crate::codec::{encode_entry, encode_header};
use crate::error::LogError;
use crate::types::LogHeader;

/// Writes a turn log to a byte sink.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use a buffered file.
///
/// # Examples
///
/// ```
/// use lair_core::{ActiveSet, LevelId, TurnTable};
/// use lair_replay::{LogHeader, TurnLogReader, TurnLogWriter};
/// use std::io::Cursor;
///
/// let header = LogHeader {
///     level: LevelId(1),
///     players_exist: ActiveSet::from_bits(0b01),
///     players_comp: ActiveSet::empty(),
///     checksum_available: true,
/// };
///
/// let mut buf = Vec::new();
/// let mut writer = TurnLogWriter::new(&mut buf, &header).unwrap();
/// writer.append_turn(&TurnTable::empty(), 0xABCD).unwrap();
/// writer.append_turn(&TurnTable::empty(), 0xABCE).unwrap();
/// assert_eq!(writer.turns_written(), 2);
/// drop(writer);
///
/// let reader = TurnLogReader::open(Cursor::new(buf)).unwrap();
/// assert_eq!(reader.turn_count(), 2);
/// ```
pub struct TurnLogWriter<W: Write> {
    sink: W,
    turns_written: u64,
}

impl TurnLogWriter<BufWriter<File>> {
    /// Create (or truncate) a log file at `path` and write the header.
    pub fn create(path: &Path, header: &LogHeader) -> Result<Self, LogError> {
        let file = File::create(path)?;
        TurnLogWriter::new(BufWriter::new(file), header)
    }
}

impl<W: Write> TurnLogWriter<W> {
    /// Wrap a sink, immediately writing the header.
    pub fn new(mut sink: W, header: &LogHeader) -> Result<Self, LogError> {
        encode_header(&mut sink, header)?;
        sink.flush()?;
        Ok(Self {
            sink,
            turns_written: 0,
        })
    }

    /// Append one turn and flush.
    pub fn append_turn(&mut self, table: &TurnTable, fingerprint: u64) -> Result<(), LogError> {
        encode_entry(&mut self.sink, table, fingerprint)?;
        self.sink.flush()?;
        self.turns_written += 1;
        Ok(())
    }

    /// Number of turns appended so far.
    pub fn turns_written(&self) -> u64 {
        self.turns_written
    }

    /// Unwrap the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ENTRY_SIZE, HEADER_SIZE};
    use lair_core::{ActiveSet, LevelId};

    fn header() -> LogHeader {
        LogHeader {
            level: LevelId(3),
            players_exist: ActiveSet::from_bits(0b01),
            players_comp: ActiveSet::empty(),
            checksum_available: false,
        }
    }

    #[test]
    fn file_length_is_header_plus_whole_entries() {
        let mut buf = Vec::new();
        let mut writer = TurnLogWriter::new(&mut buf, &header()).unwrap();
        for turn in 0..5u64 {
            writer.append_turn(&TurnTable::empty(), turn).unwrap();
        }
        drop(writer);
        assert_eq!(buf.len() as u64, HEADER_SIZE + 5 * ENTRY_SIZE);
    }
}
