//! Desync detection: comparing self-reported sync stamps across peers.
//!
//! Every intent record carries the sender's [`SyncStamp`] for the state
//! entering the turn. The detector compares each active human peer's
//! stamp against the local reference and classifies any divergence into
//! its two independent components: world state and random stream. A
//! record with no stamp where one was expected counts as a state
//! mismatch, since an unverifiable peer is indistinguishable from a
//! diverged one.

use std::collections::VecDeque;

use indexmap::IndexMap;
use lair_core::{ActiveSet, PlayerId, SyncStamp, TurnId, TurnTable};
use smallvec::SmallVec;

/// Per-turn classification of peer divergence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncVerdict {
    /// Some peer's world state disagrees with ours.
    pub state_mismatch: bool,
    /// Some peer's random stream disagrees with ours.
    pub seed_mismatch: bool,
    /// The peers that disagreed, in slot order.
    pub offenders: SmallVec<[PlayerId; 4]>,
}

impl SyncVerdict {
    /// Whether any divergence was found.
    pub fn diverged(&self) -> bool {
        self.state_mismatch || self.seed_mismatch
    }
}

/// One turn's worth of stamp evidence, kept for diagnostics.
#[derive(Clone, Debug)]
pub struct StampRecord {
    /// The turn the stamps describe.
    pub turn: TurnId,
    /// The local reference stamp.
    pub reference: SyncStamp,
    /// Each checked peer's reported stamp, in slot order.
    pub reported: IndexMap<PlayerId, SyncStamp>,
}

/// Compares peer stamps once per turn and keeps a bounded history.
#[derive(Debug, Default)]
pub struct DesyncDetector {
    history: VecDeque<StampRecord>,
}

impl DesyncDetector {
    /// Turns of stamp evidence retained for diagnostics.
    pub const HISTORY_TURNS: usize = 40;

    /// Fresh detector with empty history.
    pub fn new() -> DesyncDetector {
        DesyncDetector::default()
    }

    /// Compare every checkable peer's stamp for one turn.
    ///
    /// Computer-controlled slots and the local slot are skipped: the
    /// former produce no stamps, the latter is the reference itself.
    pub fn check_turn(
        &mut self,
        turn: TurnId,
        reference: SyncStamp,
        table: &TurnTable,
        roster: ActiveSet,
        computer: ActiveSet,
        local: PlayerId,
    ) -> SyncVerdict {
        let mut verdict = SyncVerdict::default();
        let mut reported = IndexMap::new();

        for player in roster.iter() {
            if player == local || computer.contains(player) {
                continue;
            }
            let intent = table.get(player);
            if intent.is_no_action() {
                // No stamp where one was expected.
                log::warn!("turn {turn}: player {player} delivered no sync stamp");
                verdict.state_mismatch = true;
                verdict.offenders.push(player);
                continue;
            }
            let stamp = intent.stamp;
            reported.insert(player, stamp);

            let state_bad = stamp.state != reference.state;
            let seed_bad = stamp.seed != reference.seed;
            if state_bad || seed_bad {
                log::warn!(
                    "turn {turn}: player {player} out of sync \
                     (state {:#010x} vs {:#010x}, seed {} vs {})",
                    stamp.state,
                    reference.state,
                    stamp.seed,
                    reference.seed,
                );
                verdict.state_mismatch |= state_bad;
                verdict.seed_mismatch |= seed_bad;
                verdict.offenders.push(player);
            }
        }

        self.history.push_back(StampRecord {
            turn,
            reference,
            reported,
        });
        while self.history.len() > Self::HISTORY_TURNS {
            self.history.pop_front();
        }

        verdict
    }

    /// The retained stamp evidence, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &StampRecord> {
        self.history.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_core::{ActionCode, Intent};

    fn stamped_intent(stamp: SyncStamp) -> Intent {
        let mut intent = Intent::with_action(ActionCode::None, 0, 0);
        // any non-zero content marks the record as present
        intent.flags.coords_valid = true;
        intent.stamp = stamp;
        intent
    }

    fn reference() -> SyncStamp {
        SyncStamp {
            state: 0x1111_2222,
            seed: 40,
        }
    }

    #[test]
    fn matching_stamps_produce_a_clean_verdict() {
        let mut detector = DesyncDetector::new();
        let mut table = TurnTable::empty();
        table.set(PlayerId(1), stamped_intent(reference()));

        let verdict = detector.check_turn(
            TurnId(10),
            reference(),
            &table,
            ActiveSet::from_bits(0b11),
            ActiveSet::empty(),
            PlayerId(0),
        );
        assert!(!verdict.diverged());
        assert_eq!(detector.history().count(), 1);
    }

    #[test]
    fn seed_only_divergence_is_classified_separately() {
        let mut detector = DesyncDetector::new();
        let mut table = TurnTable::empty();
        table.set(
            PlayerId(1),
            stamped_intent(SyncStamp {
                state: reference().state,
                seed: 41,
            }),
        );

        let verdict = detector.check_turn(
            TurnId(10),
            reference(),
            &table,
            ActiveSet::from_bits(0b11),
            ActiveSet::empty(),
            PlayerId(0),
        );
        assert!(!verdict.state_mismatch);
        assert!(verdict.seed_mismatch);
        assert_eq!(verdict.offenders.as_slice(), &[PlayerId(1)]);
    }

    #[test]
    fn missing_stamp_counts_as_state_mismatch() {
        let mut detector = DesyncDetector::new();
        let table = TurnTable::empty(); // peer slot all no-action

        let verdict = detector.check_turn(
            TurnId(3),
            reference(),
            &table,
            ActiveSet::from_bits(0b11),
            ActiveSet::empty(),
            PlayerId(0),
        );
        assert!(verdict.state_mismatch);
        assert!(!verdict.seed_mismatch);
    }

    #[test]
    fn computer_slots_are_not_checked() {
        let mut detector = DesyncDetector::new();
        let table = TurnTable::empty();

        let verdict = detector.check_turn(
            TurnId(3),
            reference(),
            &table,
            ActiveSet::from_bits(0b11),
            ActiveSet::from_bits(0b10),
            PlayerId(0),
        );
        assert!(!verdict.diverged());
    }

    #[test]
    fn history_is_bounded() {
        let mut detector = DesyncDetector::new();
        let table = TurnTable::empty();
        for turn in 0..100u64 {
            detector.check_turn(
                TurnId(turn),
                reference(),
                &table,
                ActiveSet::from_bits(0b01),
                ActiveSet::empty(),
                PlayerId(0),
            );
        }
        assert_eq!(detector.history().count(), DesyncDetector::HISTORY_TURNS);
        let oldest = detector.history().next().unwrap();
        assert_eq!(oldest.turn, TurnId(60));
    }
}
