//! Transport contract and per-turn intent exchange.
//!
//! The lockstep pipeline has exactly one blocking point per turn: the
//! intent exchange. This crate defines the [`Transport`] seam a real
//! network layer implements, the [`IntentExchange`] that drives it and
//! degrades peer faults to no-action records, and an in-memory
//! [`LoopbackHub`] mesh used by tests and local multi-instance play.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod exchange;
pub mod loopback;
pub mod transport;

pub use error::TransportError;
pub use exchange::{ExchangeOutcome, IntentExchange};
pub use loopback::{LoopbackHub, LoopbackTransport};
pub use transport::{ExchangeBatch, Transport, WireRecord};
