//! Strongly-typed identifiers and the active-player roster bitmask.

use std::fmt;

/// Maximum number of player slots in a session.
///
/// The turn table, the turn-log entry layout, and the roster bitmask are
/// all sized by this constant, so it is part of the on-disk format.
pub const MAX_PLAYERS: usize = 4;

/// Identifies a player slot within a session.
///
/// Valid slots are `0..MAX_PLAYERS`. Slot order is part of the
/// determinism contract: intents are applied in ascending slot order
/// every turn, on every participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Iterate all player slots in their fixed application order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..MAX_PLAYERS as u8).map(PlayerId)
    }

    /// The slot index as a usize, for table indexing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing turn counter.
///
/// Incremented each time the lockstep pipeline commits one turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(pub u64);

impl TurnId {
    /// The turn immediately after this one.
    pub fn next(self) -> TurnId {
        TurnId(self.0 + 1)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the level/map a session was started on.
///
/// Stored in the turn-log header so playback can refuse a log recorded
/// on a different map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelId(pub u32);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a live simulation entity (creature, trap, door, ...).
///
/// Entity IDs are allocated by the simulation and carried in intent
/// parameters; they must be identical across participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bitmask of active player slots.
///
/// Bit `n` set means slot `n` holds a declared-active participant.
/// The mask is stored verbatim in the turn-log header.
///
/// # Examples
///
/// ```
/// use lair_core::{ActiveSet, PlayerId};
///
/// let mut set = ActiveSet::empty();
/// set.insert(PlayerId(0));
/// set.insert(PlayerId(2));
///
/// assert!(set.contains(PlayerId(0)));
/// assert!(!set.contains(PlayerId(1)));
/// assert_eq!(set.count(), 2);
/// assert_eq!(set.bits(), 0b101);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveSet(u8);

impl ActiveSet {
    /// The empty roster.
    pub fn empty() -> ActiveSet {
        ActiveSet(0)
    }

    /// Build a roster from its raw bitmask. Bits above `MAX_PLAYERS` are
    /// discarded.
    pub fn from_bits(bits: u8) -> ActiveSet {
        ActiveSet(bits & ((1 << MAX_PLAYERS) - 1))
    }

    /// The raw bitmask, as stored in the turn-log header.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the given slot is active.
    pub fn contains(self, player: PlayerId) -> bool {
        player.index() < MAX_PLAYERS && (self.0 >> player.0) & 1 != 0
    }

    /// Mark a slot active.
    pub fn insert(&mut self, player: PlayerId) {
        if player.index() < MAX_PLAYERS {
            self.0 |= 1 << player.0;
        }
    }

    /// Mark a slot inactive.
    pub fn remove(&mut self, player: PlayerId) {
        self.0 &= !(1 << player.0);
    }

    /// Number of active slots.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate active slots in ascending order.
    pub fn iter(self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all().filter(move |p| self.contains(*p))
    }
}

impl fmt::Display for ActiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_set_roundtrips_bits() {
        let set = ActiveSet::from_bits(0b1010);
        assert_eq!(set.bits(), 0b1010);
        assert!(set.contains(PlayerId(1)));
        assert!(set.contains(PlayerId(3)));
        assert!(!set.contains(PlayerId(0)));
    }

    #[test]
    fn active_set_discards_out_of_range_bits() {
        let set = ActiveSet::from_bits(0xF0);
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn iter_yields_slots_in_application_order() {
        let set = ActiveSet::from_bits(0b0101);
        let slots: Vec<_> = set.iter().collect();
        assert_eq!(slots, vec![PlayerId(0), PlayerId(2)]);
    }
}
