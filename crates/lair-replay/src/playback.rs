//! Playback driver: verification policy and bounded fast-forward.

use std::io::{Read, Seek};

use lair_core::{TurnId, TurnTable};

use crate::error::LogError;
use crate::reader::TurnLogReader;
use crate::types::TurnEntry;

/// Drives a [`TurnLogReader`] through a replay session.
///
/// Owns the two pieces of playback policy that sit above raw reading:
///
/// - **Fingerprint verification.** Requested verification is silently
///   downgraded (with a warning) when the log was recorded without
///   fingerprints; a missing stamp is not an error, it is just less
///   protection.
/// - **Fast-forward.** While budget remains, turns whose intent table
///   is entirely no-action are skipped; every turn consumed during
///   fast-forward decrements the budget, so skipping is bounded and
///   resumable. The budget is clamped to the turns actually stored.
pub struct Playback<R: Read + Seek> {
    reader: TurnLogReader<R>,
    verify: bool,
    fast_forward_remaining: u64,
}

impl<R: Read + Seek> Playback<R> {
    /// Wrap a reader with a verification request and a fast-forward
    /// budget.
    pub fn new(reader: TurnLogReader<R>, checksum_verify: bool, fast_forward: u64) -> Self {
        let available = reader.header().checksum_available;
        let verify = match (checksum_verify, available) {
            (true, false) => {
                log::warn!(
                    "turn log carries no fingerprints; checksum verification disabled"
                );
                false
            }
            (want, _) => want,
        };
        Playback {
            fast_forward_remaining: fast_forward.min(reader.turn_count()),
            reader,
            verify,
        }
    }

    /// Whether fingerprints will actually be checked.
    pub fn verify_enabled(&self) -> bool {
        self.verify
    }

    /// Turns stored in the underlying log.
    pub fn turns_stored(&self) -> u64 {
        self.reader.turn_count()
    }

    /// Remaining fast-forward budget.
    pub fn fast_forward_remaining(&self) -> u64 {
        self.fast_forward_remaining
    }

    /// Whether the session should currently run without frame pacing.
    pub fn fast_forwarding(&self) -> bool {
        self.fast_forward_remaining > 0
    }

    /// The next turn to apply, or `None` at end of log.
    ///
    /// While fast-forwarding, all-no-action turns are discarded; they
    /// carry no observable input, and the world advances identically
    /// whether they are paced or not. The first turn with any real
    /// intent is returned even if budget remains.
    pub fn next_turn(&mut self) -> Result<Option<TurnEntry>, LogError> {
        loop {
            let Some(entry) = self.reader.next_turn()? else {
                self.fast_forward_remaining = 0;
                return Ok(None);
            };
            if self.fast_forward_remaining == 0 {
                return Ok(Some(entry));
            }
            self.fast_forward_remaining -= 1;
            if !entry.table.is_no_action() {
                return Ok(Some(entry));
            }
            log::debug!(
                "fast-forward: skipped idle turn {} ({} turns left)",
                self.reader.next_index() - 1,
                self.fast_forward_remaining
            );
        }
    }

    /// Check a locally recomputed fingerprint against the recorded one.
    ///
    /// Returns `false` only on a real mismatch with verification
    /// enabled; the caller raises the sticky desync flag, playback
    /// itself continues.
    pub fn verify_fingerprint(&self, turn: TurnId, recorded: u64, local: u64) -> bool {
        if !self.verify {
            return true;
        }
        if recorded != local {
            log::warn!(
                "turn {turn}: fingerprint mismatch (recorded {recorded:#018x}, \
                 local {local:#018x})"
            );
            return false;
        }
        true
    }

    /// Access the wrapped reader (header, seeking).
    pub fn reader_mut(&mut self) -> &mut TurnLogReader<R> {
        &mut self.reader
    }
}

/// Convenience: read a whole log into memory as `(table, fingerprint)`
/// pairs, in turn order.
pub fn collect_turns<R: Read + Seek>(
    reader: &mut TurnLogReader<R>,
) -> Result<Vec<(TurnTable, u64)>, LogError> {
    let mut turns = Vec::with_capacity(reader.turn_count() as usize);
    while let Some(entry) = reader.next_turn()? {
        turns.push((entry.table, entry.fingerprint));
    }
    Ok(turns)
}
