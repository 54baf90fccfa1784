//! Core types and traits for the Lair lockstep engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the transport, replay, and
//! engine crates: typed IDs, the fixed-layout per-turn intent record,
//! the world-fingerprint accumulator, the seeded RNG stream, and the
//! traits behind which the actual game simulation hides.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fingerprint;
pub mod id;
pub mod intent;
pub mod kinds;
pub mod seed;
pub mod session;
pub mod traits;

pub use error::SweepError;
pub use fingerprint::{compute_fingerprint, fold_fingerprint};
pub use id::{ActiveSet, EntityId, LevelId, PlayerId, TurnId, MAX_PLAYERS};
pub use intent::{ActionCode, ControlFlags, Intent, SyncStamp, TurnTable};
pub use kinds::{DoorKind, PowerKind, RoomKind, TrapKind};
pub use seed::SeedStream;
pub use session::SessionState;
pub use traits::{
    CreatureStatus, EntityClass, EntityDigest, MapCoord, PlayerDigest, Simulation, StateView,
    Steering,
};
