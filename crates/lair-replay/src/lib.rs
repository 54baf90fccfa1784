//! The turn log: fixed-record persistence of per-turn intent tables.
//!
//! A turn log stores what every player did on every turn, plus the
//! world fingerprint entering the turn. Because every entry is the same
//! size,
//! the log is seekable by turn index and its length alone tells you how
//! many turns it holds.
//!
//! # Architecture
//!
//! - [`TurnLogWriter`] appends entries to any `Write` sink, flushing
//!   per turn
//! - [`TurnLogReader`] reads entries from any `Read + Seek` source,
//!   sequentially or by index
//! - [`Playback`] drives a reader through a session: fingerprint
//!   verification and bounded fast-forward
//! - All I/O uses a custom binary codec (no serde dependency)
//!
//! # Format
//!
//! ```text
//! [MAGIC "LAIR"] [VERSION u8] [level u32] [players_exist u8]
//! [players_comp u8] [chksum_available u8] [reserved 4B]
//! [Entry 0] [Entry 1] ... [Entry N-1]
//! ```
//!
//! Each entry is `MAX_PLAYERS` intent records followed by the turn's
//! world fingerprint, [`ENTRY_SIZE`] bytes total.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod playback;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::LogError;
pub use playback::Playback;
pub use reader::TurnLogReader;
pub use types::{LogHeader, TurnEntry};
pub use writer::TurnLogWriter;

use lair_core::{Intent, MAX_PLAYERS};

/// Magic bytes at the start of every turn log.
pub const MAGIC: [u8; 4] = *b"LAIR";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: u64 = 16;

/// Size of one turn entry in bytes: one intent record per player slot
/// plus the 8-byte world fingerprint.
pub const ENTRY_SIZE: u64 = (MAX_PLAYERS * Intent::WIRE_SIZE + 8) as u64;

const _: () = assert!(ENTRY_SIZE == 104);
