//! The per-turn intent exchange.
//!
//! Sits between the lockstep session and the raw [`Transport`]. Its job
//! is to make peer faults non-fatal: a malformed record, a timed-out
//! peer, or a vanished participant all degrade to the zero/no-action
//! record, and the outcome reports what happened so the session can
//! react (downgrading vanished players to computer control).

use lair_core::{ActiveSet, Intent, PlayerId, TurnId, TurnTable};
use smallvec::SmallVec;

use crate::error::TransportError;
use crate::transport::Transport;

/// What one turn's exchange produced.
#[derive(Debug, Default)]
pub struct ExchangeOutcome {
    /// The fully populated turn table, no-action for every degraded or
    /// inactive slot.
    pub table: TurnTable,
    /// Peers whose record was present but not decodable.
    pub malformed: SmallVec<[PlayerId; 4]>,
    /// Peers that delivered nothing before the transport's deadline.
    pub timed_out: SmallVec<[PlayerId; 4]>,
    /// Peers that left the roster since the previous turn. The caller
    /// hands their dungeons to computer control.
    pub downgraded: SmallVec<[PlayerId; 4]>,
}

/// Drives one [`Transport`] exchange per turn and normalizes the result.
///
/// Tracks the roster across turns so participant loss is reported
/// exactly once, on the turn it happens.
pub struct IntentExchange<T> {
    transport: T,
    local: PlayerId,
    roster: ActiveSet,
}

impl<T: Transport> IntentExchange<T> {
    /// Wrap a transport. The starting roster is the transport's current
    /// one.
    pub fn new(transport: T, local: PlayerId) -> IntentExchange<T> {
        let roster = transport.active_players();
        IntentExchange {
            transport,
            local,
            roster,
        }
    }

    /// The roster as of the last completed exchange.
    pub fn roster(&self) -> ActiveSet {
        self.roster
    }

    /// The slot this participant occupies.
    pub fn local_player(&self) -> PlayerId {
        self.local
    }

    /// Forward a resync request to the transport.
    pub fn resync(&mut self, turn: TurnId) -> Result<(), TransportError> {
        self.transport.resync(turn)
    }

    /// Exchange records for one turn.
    ///
    /// Never fails for peer-caused faults; only transport-fatal errors
    /// (disconnect, closed session, I/O) propagate.
    pub fn exchange_turn(
        &mut self,
        turn: TurnId,
        local_intent: Intent,
    ) -> Result<ExchangeOutcome, TransportError> {
        let mut outcome = ExchangeOutcome::default();
        let wire = local_intent.encode();

        let batch = match self.transport.exchange(turn, &wire) {
            Ok(batch) => Some(batch),
            Err(TransportError::PeerTimeout { player }) => {
                // The whole exchange stalled on one peer. Substitute
                // no-action for everyone remote this turn; lockstep
                // continues and the desync detector arbitrates later.
                log::warn!("turn {turn}: exchange timed out on player {player}");
                outcome.timed_out.push(player);
                None
            }
            Err(err) => return Err(err),
        };

        for player in self.roster.iter() {
            if player == self.local {
                outcome.table.set(player, local_intent);
                continue;
            }
            let Some(batch) = &batch else { continue };
            match batch.get(player) {
                Some(bytes) => match Intent::decode_raw(bytes) {
                    Some(intent) => outcome.table.set(player, intent),
                    None => {
                        log::warn!(
                            "turn {turn}: malformed record from player {player} \
                             ({} bytes), substituting no-action",
                            bytes.len()
                        );
                        outcome.malformed.push(player);
                    }
                },
                None => {
                    log::warn!(
                        "turn {turn}: no record from player {player}, \
                         substituting no-action"
                    );
                    outcome.timed_out.push(player);
                }
            }
        }

        let current = self.transport.active_players();
        for player in self.roster.iter() {
            if !current.contains(player) {
                log::warn!("turn {turn}: player {player} left the session");
                outcome.downgraded.push(player);
            }
        }
        self.roster = current;

        Ok(outcome)
    }
}
