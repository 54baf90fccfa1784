//! In-memory full-mesh transport over crossbeam channels.
//!
//! Every participant runs in its own thread and blocks in
//! [`Transport::exchange`] like it would on a socket. Used by tests and
//! by local multi-instance play; timeouts and peer loss surface through
//! the same [`TransportError`] variants a real transport produces.

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use lair_core::{ActiveSet, Intent, PlayerId, TurnId};
use smallvec::SmallVec;

use crate::error::TransportError;
use crate::transport::{ExchangeBatch, Transport, WireRecord};

struct Envelope {
    turn: TurnId,
    from: PlayerId,
    bytes: WireRecord,
}

/// Builder for a mesh of connected [`LoopbackTransport`]s.
pub struct LoopbackHub;

impl LoopbackHub {
    /// Build one connected transport per active slot, in slot order.
    ///
    /// `timeout` is each transport's per-peer receive deadline; a peer
    /// that stays silent past it yields
    /// [`TransportError::PeerTimeout`].
    pub fn mesh(roster: ActiveSet, timeout: Duration) -> Vec<LoopbackTransport> {
        let channels: Vec<(PlayerId, Sender<Envelope>, Receiver<Envelope>)> = roster
            .iter()
            .map(|player| {
                let (tx, rx) = unbounded();
                (player, tx, rx)
            })
            .collect();

        channels
            .iter()
            .map(|(player, _, rx)| LoopbackTransport {
                player: *player,
                roster,
                timeout,
                peers: channels
                    .iter()
                    .filter(|(p, _, _)| p != player)
                    .map(|(p, tx, _)| (*p, tx.clone()))
                    .collect(),
                inbox: rx.clone(),
                pending: Vec::new(),
            })
            .collect()
    }
}

/// One participant's endpoint in a loopback mesh.
pub struct LoopbackTransport {
    player: PlayerId,
    roster: ActiveSet,
    timeout: Duration,
    peers: Vec<(PlayerId, Sender<Envelope>)>,
    inbox: Receiver<Envelope>,
    pending: Vec<Envelope>,
}

impl LoopbackTransport {
    /// The slot this endpoint occupies.
    pub fn player(&self) -> PlayerId {
        self.player
    }
}

impl Transport for LoopbackTransport {
    fn exchange(
        &mut self,
        turn: TurnId,
        local: &[u8; Intent::WIRE_SIZE],
    ) -> Result<ExchangeBatch, TransportError> {
        // Broadcast first; a send failure means the peer endpoint was
        // dropped, which shrinks the roster instead of failing the turn.
        let record = SmallVec::from_slice(local);
        self.peers.retain(|(peer, tx)| {
            let delivered = tx
                .send(Envelope {
                    turn,
                    from: self.player,
                    bytes: SmallVec::clone(&record),
                })
                .is_ok();
            if !delivered {
                self.roster.remove(*peer);
            }
            delivered
        });

        let mut batch = ExchangeBatch::empty();
        batch.set(self.player, record);

        let mut awaiting: SmallVec<[PlayerId; 4]> = self
            .roster
            .iter()
            .filter(|p| *p != self.player)
            .collect();

        // Records buffered from a previous call (peers may run one
        // exchange ahead) are consumed before blocking.
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].turn == turn {
                let env = self.pending.remove(i);
                awaiting.retain(|p| *p != env.from);
                batch.set(env.from, env.bytes);
            } else {
                i += 1;
            }
        }

        let deadline = Instant::now() + self.timeout;
        while !awaiting.is_empty() {
            match self.inbox.recv_deadline(deadline) {
                Ok(env) => {
                    if env.turn == turn {
                        awaiting.retain(|p| *p != env.from);
                        batch.set(env.from, env.bytes);
                    } else if env.turn > turn {
                        self.pending.push(env);
                    }
                    // stale records for an older turn are dropped
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(TransportError::PeerTimeout { player: awaiting[0] });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TransportError::SessionClosed);
                }
            }
        }

        Ok(batch)
    }

    fn active_players(&self) -> ActiveSet {
        self.roster
    }

    fn resync(&mut self, _turn: TurnId) -> Result<(), TransportError> {
        // Shared memory needs no recovery handshake.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_core::ActionCode;
    use std::thread;

    #[test]
    fn three_way_exchange_delivers_every_record() {
        let roster = ActiveSet::from_bits(0b111);
        let transports = LoopbackHub::mesh(roster, Duration::from_secs(5));

        let handles: Vec<_> = transports
            .into_iter()
            .map(|mut t| {
                thread::spawn(move || {
                    let me = t.player();
                    let intent = Intent::with_action(ActionCode::DigTag, me.0 as u16, 0);
                    let batch = t.exchange(TurnId(0), &intent.encode()).unwrap();
                    let mut seen = 0;
                    for p in roster.iter() {
                        let bytes = batch.get(p).expect("record for every slot");
                        let got = Intent::decode_raw(bytes).unwrap();
                        assert_eq!(got.param1, p.0 as u16);
                        seen += 1;
                    }
                    seen
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), 3);
        }
    }

    #[test]
    fn peers_may_run_one_turn_ahead() {
        let roster = ActiveSet::from_bits(0b11);
        let mut transports = LoopbackHub::mesh(roster, Duration::from_secs(5));
        let mut b = transports.pop().unwrap();
        let mut a = transports.pop().unwrap();

        let fast = thread::spawn(move || {
            for turn in 0..4u64 {
                a.exchange(TurnId(turn), &Intent::NO_ACTION.encode()).unwrap();
            }
        });
        for turn in 0..4u64 {
            b.exchange(TurnId(turn), &Intent::NO_ACTION.encode()).unwrap();
        }
        fast.join().unwrap();
    }

    #[test]
    fn silent_peer_times_out() {
        let roster = ActiveSet::from_bits(0b11);
        let mut transports = LoopbackHub::mesh(roster, Duration::from_millis(20));
        let mut a = transports.remove(0);
        // transports[0] (player 1) is kept alive but never exchanges
        let err = a.exchange(TurnId(0), &Intent::NO_ACTION.encode()).unwrap_err();
        assert!(matches!(
            err,
            TransportError::PeerTimeout { player } if player == PlayerId(1)
        ));
        drop(transports);
    }

    #[test]
    fn dropped_peer_shrinks_the_roster() {
        let roster = ActiveSet::from_bits(0b11);
        let mut transports = LoopbackHub::mesh(roster, Duration::from_millis(50));
        let b = transports.pop().unwrap();
        let mut a = transports.pop().unwrap();
        drop(b);

        let batch = a.exchange(TurnId(0), &Intent::NO_ACTION.encode()).unwrap();
        assert!(batch.get(PlayerId(0)).is_some());
        assert_eq!(a.active_players(), ActiveSet::from_bits(0b01));
    }
}
