//! Header and entry types of the turn-log format.

use lair_core::{ActiveSet, LevelId, TurnTable};

/// The session facts recorded once at the head of every turn log.
///
/// Playback refuses to start a log on a different level, and seeds its
/// roster and computer-control masks from here rather than from the
/// live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogHeader {
    /// The level the session was started on.
    pub level: LevelId,
    /// Slots that held a participant when recording began.
    pub players_exist: ActiveSet,
    /// Slots under computer control when recording began.
    pub players_comp: ActiveSet,
    /// Whether fingerprints were recorded. When `false`, entries carry
    /// a zero fingerprint and verification is unavailable.
    pub checksum_available: bool,
}

/// One decoded turn: the full intent table plus the world fingerprint
/// of the state the turn was applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnEntry {
    /// Intent records for every player slot.
    pub table: TurnTable,
    /// World fingerprint entering the turn, zero when the log was
    /// recorded without fingerprints.
    pub fingerprint: u64,
}
