//! Binary encode/decode for the turn-log format.
//!
//! All integers are little-endian. Both the header and the entries are
//! fixed-size; there is no compression, no padding beyond the declared
//! reserved bytes, and no self-describing schema.

use std::io::{Read, Write};

use lair_core::{ActiveSet, Intent, LevelId, PlayerId, TurnTable};

use crate::error::LogError;
use crate::types::{LogHeader, TurnEntry};
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitives ──────────────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), LogError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), LogError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), LogError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, LogError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, LogError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, LogError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

// ── Header ──────────────────────────────────────────────────────

/// Write the 16-byte file header.
pub fn encode_header(w: &mut dyn Write, header: &LogHeader) -> Result<(), LogError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u32_le(w, header.level.0)?;
    write_u8(w, header.players_exist.bits())?;
    write_u8(w, header.players_comp.bits())?;
    write_u8(w, header.checksum_available as u8)?;
    w.write_all(&[0u8; 4])?; // reserved
    Ok(())
}

/// Read and validate the 16-byte file header.
pub fn decode_header(r: &mut dyn Read) -> Result<LogHeader, LogError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(LogError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(LogError::UnsupportedVersion { found: version });
    }
    let level = LevelId(read_u32_le(r)?);
    let players_exist = ActiveSet::from_bits(read_u8(r)?);
    let players_comp = ActiveSet::from_bits(read_u8(r)?);
    let checksum_available = read_u8(r)? != 0;
    let mut reserved = [0u8; 4];
    r.read_exact(&mut reserved)?;
    Ok(LogHeader {
        level,
        players_exist,
        players_comp,
        checksum_available,
    })
}

// ── Entries ─────────────────────────────────────────────────────

/// Write one turn entry: every slot's intent record, then the turn's
/// world fingerprint.
pub fn encode_entry(
    w: &mut dyn Write,
    table: &TurnTable,
    fingerprint: u64,
) -> Result<(), LogError> {
    for (_, intent) in table.iter() {
        w.write_all(&intent.encode())?;
    }
    write_u64_le(w, fingerprint)?;
    Ok(())
}

/// Read one whole turn entry.
pub fn decode_entry(r: &mut dyn Read) -> Result<TurnEntry, LogError> {
    let mut table = TurnTable::empty();
    for player in PlayerId::all() {
        let mut buf = [0u8; Intent::WIRE_SIZE];
        r.read_exact(&mut buf)?;
        table.set(player, Intent::decode(&buf));
    }
    let fingerprint = read_u64_le(r)?;
    Ok(TurnEntry { table, fingerprint })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_core::ActionCode;
    use std::io::Cursor;

    fn header() -> LogHeader {
        LogHeader {
            level: LevelId(7),
            players_exist: ActiveSet::from_bits(0b0011),
            players_comp: ActiveSet::from_bits(0b0010),
            checksum_available: true,
        }
    }

    #[test]
    fn header_roundtrip_is_exactly_sixteen_bytes() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        assert_eq!(buf.len() as u64, crate::HEADER_SIZE);

        let decoded = decode_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, header());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[0] = b'X';
        assert!(matches!(
            decode_header(&mut Cursor::new(&buf)),
            Err(LogError::InvalidMagic)
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[4] = FORMAT_VERSION + 1;
        assert!(matches!(
            decode_header(&mut Cursor::new(&buf)),
            Err(LogError::UnsupportedVersion { found }) if found == FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn entry_roundtrip_is_exactly_entry_size() {
        let mut table = TurnTable::empty();
        let mut intent = Intent::with_action(ActionCode::BuildRoom, 1, 0);
        intent.set_position(10, 12);
        table.set(PlayerId(1), intent);

        let mut buf = Vec::new();
        encode_entry(&mut buf, &table, 0xFEED).unwrap();
        assert_eq!(buf.len() as u64, crate::ENTRY_SIZE);

        let entry = decode_entry(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(entry.table, table);
        assert_eq!(entry.fingerprint, 0xFEED);
    }
}
