//! A transport whose peers follow a script.

use std::cell::Cell;
use std::rc::Rc;

use lair_core::{ActiveSet, Intent, PlayerId, TurnId, MAX_PLAYERS};
use lair_net::{ExchangeBatch, Transport, TransportError};
use smallvec::SmallVec;

/// Shared tally of transport calls, readable after the transport has
/// moved into a session.
#[derive(Clone, Debug, Default)]
pub struct CallCounts {
    exchanges: Rc<Cell<u64>>,
    resyncs: Rc<Cell<u64>>,
}

impl CallCounts {
    /// Completed exchange calls.
    pub fn exchanges(&self) -> u64 {
        self.exchanges.get()
    }

    /// Resync requests received.
    pub fn resyncs(&self) -> u64 {
        self.resyncs.get()
    }
}

/// Deterministic single-threaded [`Transport`]: every peer's intents
/// are scripted per turn, so sessions can be driven without threads.
///
/// By default scripted peers echo the local record's sync stamp, which
/// is what an in-sync peer would report. Tests exercising desync turn
/// echoing off for a peer and script explicit stamps instead.
pub struct ScriptedTransport {
    roster: ActiveSet,
    local: PlayerId,
    scripts: [Vec<Intent>; MAX_PLAYERS],
    echo_stamp: [bool; MAX_PLAYERS],
    resync_fails: bool,
    counts: CallCounts,
}

impl ScriptedTransport {
    pub fn new(roster: ActiveSet, local: PlayerId) -> ScriptedTransport {
        ScriptedTransport {
            roster,
            local,
            scripts: Default::default(),
            echo_stamp: [true; MAX_PLAYERS],
            resync_fails: false,
            counts: CallCounts::default(),
        }
    }

    /// Script what `player` sends on `turn`. Unscripted turns send the
    /// no-action record.
    pub fn script(&mut self, player: PlayerId, turn: u64, intent: Intent) {
        let script = &mut self.scripts[player.index()];
        if script.len() <= turn as usize {
            script.resize(turn as usize + 1, Intent::NO_ACTION);
        }
        script[turn as usize] = intent;
    }

    /// Stop mirroring the local stamp for `player`; its scripted
    /// records are sent verbatim.
    pub fn stop_echoing_stamp(&mut self, player: PlayerId) {
        self.echo_stamp[player.index()] = false;
    }

    /// Make every resync request fail.
    pub fn fail_resync(&mut self) {
        self.resync_fails = true;
    }

    /// Drop a player from the roster, as a disconnect would.
    pub fn drop_player(&mut self, player: PlayerId) {
        self.roster.remove(player);
    }

    /// A handle to the call tally; keep it before moving the transport
    /// into a session.
    pub fn counts(&self) -> CallCounts {
        self.counts.clone()
    }
}

impl Transport for ScriptedTransport {
    fn exchange(
        &mut self,
        turn: TurnId,
        local: &[u8; Intent::WIRE_SIZE],
    ) -> Result<ExchangeBatch, TransportError> {
        let local_record = Intent::decode(local);
        let mut batch = ExchangeBatch::empty();
        batch.set(self.local, SmallVec::from_slice(local));

        for player in self.roster.iter() {
            if player == self.local {
                continue;
            }
            let mut intent = self.scripts[player.index()]
                .get(turn.0 as usize)
                .copied()
                .unwrap_or(Intent::NO_ACTION);
            if self.echo_stamp[player.index()] {
                intent.stamp = local_record.stamp;
            }
            batch.set(player, SmallVec::from_slice(&intent.encode()));
        }

        self.counts.exchanges.set(self.counts.exchanges.get() + 1);
        Ok(batch)
    }

    fn active_players(&self) -> ActiveSet {
        self.roster
    }

    fn resync(&mut self, _turn: TurnId) -> Result<(), TransportError> {
        self.counts.resyncs.set(self.counts.resyncs.get() + 1);
        if self.resync_fails {
            Err(TransportError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
