//! The transport seam.

use lair_core::{ActiveSet, Intent, PlayerId, TurnId, MAX_PLAYERS};
use smallvec::SmallVec;

use crate::error::TransportError;

/// One raw peer record as it arrived off the wire.
///
/// Kept as bytes rather than a decoded [`Intent`] so that undersized or
/// oversized records survive to the exchange layer, which substitutes
/// no-action instead of erroring.
pub type WireRecord = SmallVec<[u8; Intent::WIRE_SIZE]>;

/// One turn's worth of raw records, one slot per player.
///
/// `None` means the slot delivered nothing this turn (inactive slot, or
/// a peer the transport gave up waiting on).
#[derive(Clone, Debug, Default)]
pub struct ExchangeBatch {
    slots: [Option<WireRecord>; MAX_PLAYERS],
}

impl ExchangeBatch {
    /// An all-empty batch.
    pub fn empty() -> ExchangeBatch {
        ExchangeBatch::default()
    }

    /// Store the raw record for a slot.
    pub fn set(&mut self, player: PlayerId, bytes: WireRecord) {
        self.slots[player.index()] = Some(bytes);
    }

    /// The raw record for a slot, if one arrived.
    pub fn get(&self, player: PlayerId) -> Option<&[u8]> {
        self.slots[player.index()].as_deref()
    }
}

/// A per-turn record exchange with the other participants.
///
/// Implementations own their timeout and retry policy entirely; the
/// exchange layer above only distinguishes "timed out" (degradable)
/// from everything else (fatal). [`exchange`](Transport::exchange) is
/// called exactly once per turn and is the lockstep pipeline's only
/// blocking point.
pub trait Transport {
    /// Broadcast the local record for `turn` and collect the peers'
    /// records for the same turn.
    fn exchange(
        &mut self,
        turn: TurnId,
        local: &[u8; Intent::WIRE_SIZE],
    ) -> Result<ExchangeBatch, TransportError>;

    /// The current roster of slots with a live participant behind them.
    fn active_players(&self) -> ActiveSet;

    /// Out-of-band state recovery handshake, driven by the resync
    /// controller after a confirmed divergence.
    fn resync(&mut self, turn: TurnId) -> Result<(), TransportError>;
}
