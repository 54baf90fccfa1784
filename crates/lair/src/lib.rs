//! Lair: a deterministic lockstep multiplayer and replay engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Lair sub-crates. For most users, adding `lair` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lair::prelude::*;
//! use std::io::Cursor;
//!
//! // Record two turns of a one-player session into memory.
//! let header = LogHeader {
//!     level: LevelId(1),
//!     players_exist: ActiveSet::from_bits(0b01),
//!     players_comp: ActiveSet::empty(),
//!     checksum_available: true,
//! };
//! let mut buf = Vec::new();
//! let mut writer = TurnLogWriter::new(&mut buf, &header).unwrap();
//!
//! let mut table = TurnTable::empty();
//! table.set(PlayerId(0), Intent::with_action(ActionCode::DigTag, 0, 0));
//! writer.append_turn(&table, 0xFEED).unwrap();
//! writer.append_turn(&TurnTable::empty(), 0xFEED).unwrap();
//! drop(writer);
//!
//! // Read them back by index.
//! let mut reader = TurnLogReader::open(Cursor::new(buf)).unwrap();
//! assert_eq!(reader.turn_count(), 2);
//! let entry = reader.read_turn(0).unwrap();
//! assert_eq!(entry.table, table);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `lair-core` | IDs, intent records, fingerprints, core traits |
//! | [`net`] | `lair-net` | Transport contract, intent exchange, loopback mesh |
//! | [`replay`] | `lair-replay` | Turn-log codec, writer, reader, playback |
//! | [`engine`] | `lair-engine` | Lockstep session, dispatch, desync handling |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use lair_core as core;
pub use lair_engine as engine;
pub use lair_net as net;
pub use lair_replay as replay;

/// The types most users need, in one import.
pub mod prelude {
    pub use lair_core::{
        compute_fingerprint, fold_fingerprint, ActionCode, ActiveSet, ControlFlags, EntityId,
        Intent, LevelId, PlayerId, SeedStream, SessionState, Simulation, StateView, SyncStamp,
        TurnId, TurnTable, MAX_PLAYERS,
    };
    pub use lair_engine::{
        LockstepSession, SessionConfig, StepError, ToolMode, TurnReport, ViewState,
    };
    pub use lair_net::{IntentExchange, LoopbackHub, Transport, TransportError};
    pub use lair_replay::{
        LogError, LogHeader, Playback, TurnLogReader, TurnLogWriter,
    };
}
