//! Lockstep session, action dispatch, and desync handling.
//!
//! This crate is the conductor of the Lair engine: it takes intent
//! records from a source (network exchange, turn-log playback, or the
//! local player alone), applies them to the simulation in a fixed
//! order, fingerprints the result, and arbitrates the pause and
//! resync handshakes.
//!
//! # Architecture
//!
//! - [`LockstepSession`] drives the per-turn pipeline, one turn per
//!   [`advance()`](LockstepSession::advance)
//! - [`dispatch`] routes each player's intent through their
//!   [`ViewState`] and [`ToolMode`] machines
//! - [`DesyncDetector`] classifies peer divergence into the two sticky
//!   session flags
//! - [`PauseController`] and [`ResyncController`] arbitrate the global
//!   handshakes

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod desync;
pub mod dispatch;
mod dungeon;
pub mod error;
pub mod pause;
pub mod player;
mod possession;
pub mod resync;
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use desync::{DesyncDetector, StampRecord, SyncVerdict};
pub use dispatch::{apply_turn, DispatchOutcome};
pub use error::StepError;
pub use pause::PauseController;
pub use player::{PlayerSlot, ToolMode, Transition, ViewState};
pub use resync::{ResyncController, ResyncPhase};
pub use session::{LockstepSession, TurnReport};
