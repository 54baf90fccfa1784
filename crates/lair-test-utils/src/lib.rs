//! Test utilities and mock types for Lair development.
//!
//! Provides [`MockWorld`], a miniature deterministic dungeon simulation
//! implementing the core traits, a [`ScriptedTransport`] for driving
//! sessions through canned peer behavior, and intent-building helpers.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod intents;
mod transport;
mod world;

pub use intents::*;
pub use transport::{CallCounts, ScriptedTransport};
pub use world::MockWorld;
