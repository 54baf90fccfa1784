//! The lockstep session: one pipeline, one turn per call.
//!
//! [`LockstepSession`] owns everything above the simulation seam:
//! intent sourcing (network exchange, turn-log playback, or local
//! only), optional recording, dispatch, fingerprinting, desync
//! detection, and pause/resync arbitration. Each
//! [`advance()`](LockstepSession::advance) call commits exactly one
//! turn; the network round-trip inside the exchange is the only
//! blocking point.

use std::io::{Read, Seek, Write};

use lair_core::{
    compute_fingerprint, fold_fingerprint, ActiveSet, Intent, PlayerId, SeedStream, SessionState,
    Simulation, SyncStamp, TurnId, TurnTable, MAX_PLAYERS,
};
use lair_net::{IntentExchange, Transport};
use lair_replay::{LogHeader, Playback, TurnLogReader, TurnLogWriter};
use smallvec::SmallVec;

use crate::config::{ConfigError, SessionConfig};
use crate::desync::DesyncDetector;
use crate::dispatch;
use crate::error::StepError;
use crate::pause::PauseController;
use crate::player::PlayerSlot;
use crate::resync::ResyncController;

/// What one committed turn looked like from the outside.
#[derive(Clone, Debug)]
pub struct TurnReport {
    /// The turn that was committed.
    pub turn: TurnId,
    /// World fingerprint after the turn.
    pub fingerprint: u64,
    /// Whether the session is paused after this turn.
    pub paused: bool,
    /// Whether either sticky desync flag is set.
    pub desynced: bool,
    /// Players downgraded to computer control this turn.
    pub downgraded: SmallVec<[PlayerId; 4]>,
    /// The local player left the game this turn; the session is over.
    pub quit: bool,
}

enum Source<T, R: Read + Seek> {
    Exchange(IntentExchange<T>),
    Replay(Playback<R>),
    Local,
}

/// A running lockstep session.
///
/// Generic over the transport `T`, the recording sink `W`, and the
/// playback source `R`; modes that do not use a parameter leave it to
/// inference or a turbofish at construction.
pub struct LockstepSession<T: Transport, W: Write, R: Read + Seek> {
    config: SessionConfig,
    source: Source<T, R>,
    recorder: Option<TurnLogWriter<W>>,
    state: SessionState,
    slots: [PlayerSlot; MAX_PLAYERS],
    computer: ActiveSet,
    detector: DesyncDetector,
    pause: PauseController,
    resync: ResyncController,
    seed: SeedStream,
    entering: Option<u64>,
    finished: bool,
}

impl<T: Transport, W: Write, R: Read + Seek> std::fmt::Debug for LockstepSession<T, W, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockstepSession")
            .field("state", &self.state)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, W: Write, R: Read + Seek> LockstepSession<T, W, R> {
    /// Start a networked session over a transport, optionally recording
    /// every turn to `record`.
    pub fn net(config: SessionConfig, transport: T, record: Option<W>) -> Result<Self, StepError> {
        config.validate()?;
        let recorder = Self::make_recorder(&config, record)?;
        let exchange = IntentExchange::new(transport, config.local);
        let state = SessionState::new(true, false);
        Ok(Self::build(config, Source::Exchange(exchange), recorder, state))
    }

    /// Start a playback session from a turn log.
    ///
    /// The roster and computer masks are adopted from the log header;
    /// a log recorded on a different level is refused.
    pub fn replay(mut config: SessionConfig, reader: TurnLogReader<R>) -> Result<Self, StepError> {
        config.validate()?;
        let header = *reader.header();
        if header.level != config.level {
            return Err(ConfigError::LevelMismatch {
                recorded: header.level,
                requested: config.level,
            }
            .into());
        }
        config.roster = header.players_exist;
        config.computer = header.players_comp;

        let playback = Playback::new(reader, config.checksum_verify, config.fast_forward);
        let mut state = SessionState::new(false, true);
        state.set_turns_stored(playback.turns_stored());
        state.set_fast_forward_remaining(playback.fast_forward_remaining());
        Ok(Self::build(config, Source::Replay(playback), None, state))
    }

    /// Start a single-participant session, optionally recording.
    pub fn local(config: SessionConfig, record: Option<W>) -> Result<Self, StepError> {
        config.validate()?;
        let recorder = Self::make_recorder(&config, record)?;
        let state = SessionState::new(false, false);
        Ok(Self::build(config, Source::Local, recorder, state))
    }

    fn make_recorder(
        config: &SessionConfig,
        record: Option<W>,
    ) -> Result<Option<TurnLogWriter<W>>, StepError> {
        let header = LogHeader {
            level: config.level,
            players_exist: config.roster,
            players_comp: config.computer,
            checksum_available: config.checksum_verify,
        };
        match record {
            Some(sink) => Ok(Some(TurnLogWriter::new(sink, &header)?)),
            None => Ok(None),
        }
    }

    fn build(
        config: SessionConfig,
        source: Source<T, R>,
        recorder: Option<TurnLogWriter<W>>,
        state: SessionState,
    ) -> Self {
        LockstepSession {
            computer: config.computer,
            seed: SeedStream::new(config.seed),
            config,
            source,
            recorder,
            state,
            slots: Default::default(),
            detector: DesyncDetector::new(),
            pause: PauseController,
            resync: ResyncController::new(),
            entering: None,
            finished: false,
        }
    }

    /// The session's externally visible state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// A player's dispatcher-owned state.
    pub fn slot(&self, player: PlayerId) -> &PlayerSlot {
        &self.slots[player.index()]
    }

    /// Slots currently under computer control.
    pub fn computer_players(&self) -> ActiveSet {
        self.computer
    }

    /// The desync detector, for stamp-history diagnostics.
    pub fn detector(&self) -> &DesyncDetector {
        &self.detector
    }

    /// Commit one turn.
    ///
    /// Returns `Ok(None)` once the session is over: the replay log is
    /// exhausted, or the local player quit on an earlier turn.
    pub fn advance(
        &mut self,
        world: &mut dyn Simulation,
        local_intent: Intent,
    ) -> Result<Option<TurnReport>, StepError> {
        if self.finished {
            return Ok(None);
        }
        let turn = self.state.turn();
        let roster = self.config.roster;

        let entering = match self.entering {
            Some(fp) => fp,
            None => compute_fingerprint(world, roster)?,
        };
        let reference = SyncStamp {
            state: fold_fingerprint(entering),
            seed: self.seed.draw_count(),
        };

        // 1. Source the turn table.
        let mut downgraded: SmallVec<[PlayerId; 4]> = SmallVec::new();
        let mut verify_failed = false;
        let table = match &mut self.source {
            Source::Exchange(exchange) => {
                let mut intent = local_intent;
                if self.config.checksum_verify {
                    intent.stamp = reference;
                }
                let outcome = exchange.exchange_turn(turn, intent)?;
                downgraded.extend(outcome.downgraded);
                outcome.table
            }
            Source::Replay(playback) => match playback.next_turn()? {
                Some(entry) => {
                    verify_failed =
                        !playback.verify_fingerprint(turn, entry.fingerprint, entering);
                    self.state
                        .set_fast_forward_remaining(playback.fast_forward_remaining());
                    entry.table
                }
                None => {
                    self.finished = true;
                    self.state.set_fast_forward_remaining(0);
                    return Ok(None);
                }
            },
            Source::Local => {
                let mut intent = local_intent;
                if self.config.checksum_verify {
                    intent.stamp = reference;
                }
                let mut table = TurnTable::empty();
                table.set(self.config.local, intent);
                table
            }
        };
        if verify_failed {
            self.state.mark_desynced(true, false);
        }
        for player in downgraded.clone() {
            self.downgrade(world, player);
        }

        // 2. Record. The stored fingerprint is the state entering the
        // turn, which is what playback can recompute before applying it.
        if let Some(recorder) = &mut self.recorder {
            let fingerprint = if self.config.checksum_verify {
                entering
            } else {
                0
            };
            recorder.append_turn(&table, fingerprint)?;
        }

        // 3. Dispatch in fixed slot order.
        let outcome =
            dispatch::apply_turn(world, &table, &mut self.slots, roster, self.state.paused());
        for player in outcome.computer_toggles {
            if self.computer.contains(player) {
                self.computer.remove(player);
            } else {
                self.computer.insert(player);
            }
        }
        for player in &outcome.pause_requests {
            self.pause
                .request_toggle(*player, &mut self.state, &self.slots, roster, self.computer);
        }
        let mut local_quit = false;
        for player in outcome.quitters {
            if player == self.config.local {
                local_quit = true;
            } else {
                self.downgrade(world, player);
                downgraded.push(player);
            }
        }
        if outcome.complete_quit {
            local_quit = true;
        }

        // 4. Advance the world.
        if !self.state.paused() {
            world.tick(&mut self.seed);
        }

        // 5. Desync detection and at-most-one resync pass per incident.
        if self.config.checksum_verify {
            if let Source::Exchange(_) = self.source {
                let verdict = self.detector.check_turn(
                    turn,
                    reference,
                    &table,
                    roster,
                    self.computer,
                    self.config.local,
                );
                self.state
                    .mark_desynced(verdict.state_mismatch, verdict.seed_mismatch);

                if self.state.desynced() {
                    if self.resync.should_attempt() {
                        self.resync.note_attempted(turn);
                        let result = match &mut self.source {
                            Source::Exchange(exchange) => exchange.resync(turn),
                            Source::Replay(_) | Source::Local => Ok(()),
                        };
                        match result {
                            Ok(()) => {
                                log::info!("turn {turn}: resync pass succeeded");
                                self.state.clear_desync();
                                self.resync.note_clean();
                            }
                            Err(err) => {
                                log::warn!("turn {turn}: resync pass failed: {err}");
                                for player in verdict.offenders {
                                    self.downgrade(world, player);
                                    downgraded.push(player);
                                }
                            }
                        }
                    }
                } else {
                    self.resync.note_clean();
                }
            }
        }

        // 6. Fingerprint the post-turn state for the next turn's stamp.
        let fingerprint = compute_fingerprint(world, roster)?;
        self.entering = Some(fingerprint);
        self.state.note_turn_committed();
        if local_quit {
            self.finished = true;
        }

        Ok(Some(TurnReport {
            turn,
            fingerprint,
            paused: self.state.paused(),
            desynced: self.state.desynced(),
            downgraded,
            quit: local_quit,
        }))
    }

    /// Hand a player's dungeon to the computer. Idempotent.
    fn downgrade(&mut self, world: &mut dyn Simulation, player: PlayerId) {
        if self.computer.contains(player) {
            return;
        }
        log::warn!("player {player} handed to computer control");
        world.toggle_computer(player);
        self.computer.insert(player);
    }

    /// Finish recording and hand back the sink, flushed.
    pub fn into_recorder(self) -> Option<TurnLogWriter<W>> {
        self.recorder
    }
}
