//! Turn-log playback reader.
//!
//! [`TurnLogReader`] reads entries from any `Read + Seek` source. The
//! header is validated on construction, and the turn count is derived
//! from the source length alone; a length that is not a whole number of
//! entries refuses to open.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::codec::{decode_entry, decode_header};
use crate::error::LogError;
use crate::types::{LogHeader, TurnEntry};
use crate::{ENTRY_SIZE, HEADER_SIZE};

/// Reads a turn log, sequentially or by turn index.
pub struct TurnLogReader<R: Read + Seek> {
    source: R,
    header: LogHeader,
    turn_count: u64,
    next_index: u64,
}

impl TurnLogReader<BufReader<File>> {
    /// Open a log file at `path`.
    pub fn open_path(path: &Path) -> Result<Self, LogError> {
        TurnLogReader::open(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> TurnLogReader<R> {
    /// Open a log source, validating the header and sizing the log.
    pub fn open(mut source: R) -> Result<Self, LogError> {
        let header = decode_header(&mut source)?;
        let len = source.seek(SeekFrom::End(0))?;
        let payload = len - HEADER_SIZE;
        let trailing = payload % ENTRY_SIZE;
        if trailing != 0 {
            return Err(LogError::TruncatedEntry { trailing });
        }
        source.seek(SeekFrom::Start(HEADER_SIZE))?;
        Ok(Self {
            source,
            header,
            turn_count: payload / ENTRY_SIZE,
            next_index: 0,
        })
    }

    /// The validated file header.
    pub fn header(&self) -> &LogHeader {
        &self.header
    }

    /// Number of turns stored, derived from the source length.
    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// Read the entry for a turn index, seeking as needed.
    ///
    /// Sequential reads continue from the turn after `index`.
    pub fn read_turn(&mut self, index: u64) -> Result<TurnEntry, LogError> {
        if index >= self.turn_count {
            return Err(LogError::TurnOutOfRange {
                requested: index,
                stored: self.turn_count,
            });
        }
        self.source
            .seek(SeekFrom::Start(HEADER_SIZE + index * ENTRY_SIZE))?;
        let entry = decode_entry(&mut self.source)?;
        self.next_index = index + 1;
        Ok(entry)
    }

    /// Read the next entry in sequence, or `None` at end of log.
    pub fn next_turn(&mut self) -> Result<Option<TurnEntry>, LogError> {
        if self.next_index >= self.turn_count {
            return Ok(None);
        }
        let entry = self.read_turn(self.next_index)?;
        Ok(Some(entry))
    }

    /// The turn index the next sequential read will return.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::TurnLogWriter;
    use lair_core::{ActionCode, ActiveSet, Intent, LevelId, PlayerId, TurnTable};
    use std::io::Cursor;

    fn header() -> LogHeader {
        LogHeader {
            level: LevelId(9),
            players_exist: ActiveSet::from_bits(0b11),
            players_comp: ActiveSet::empty(),
            checksum_available: true,
        }
    }

    fn sample_log(turns: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = TurnLogWriter::new(&mut buf, &header()).unwrap();
        for turn in 0..turns {
            let mut table = TurnTable::empty();
            table.set(
                PlayerId(0),
                Intent::with_action(ActionCode::DigTag, turn as u16, 0),
            );
            writer.append_turn(&table, turn ^ 0x5A5A).unwrap();
        }
        buf
    }

    #[test]
    fn turn_count_comes_from_the_file_length() {
        let reader = TurnLogReader::open(Cursor::new(sample_log(7))).unwrap();
        assert_eq!(reader.turn_count(), 7);
        assert_eq!(reader.header(), &header());
    }

    #[test]
    fn read_turn_seeks_by_index() {
        let mut reader = TurnLogReader::open(Cursor::new(sample_log(5))).unwrap();
        let entry = reader.read_turn(3).unwrap();
        assert_eq!(entry.table.get(PlayerId(0)).param1, 3);
        assert_eq!(entry.fingerprint, 3 ^ 0x5A5A);

        // sequential read continues after the seek target
        let next = reader.next_turn().unwrap().unwrap();
        assert_eq!(next.table.get(PlayerId(0)).param1, 4);
        assert!(reader.next_turn().unwrap().is_none());
    }

    #[test]
    fn out_of_range_turn_is_an_error() {
        let mut reader = TurnLogReader::open(Cursor::new(sample_log(2))).unwrap();
        assert!(matches!(
            reader.read_turn(2),
            Err(LogError::TurnOutOfRange {
                requested: 2,
                stored: 2
            })
        ));
    }

    #[test]
    fn partial_trailing_entry_refuses_to_open() {
        let mut bytes = sample_log(2);
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            TurnLogReader::open(Cursor::new(bytes)),
            Err(LogError::TruncatedEntry { trailing }) if trailing == ENTRY_SIZE - 10
        ));
    }
}
