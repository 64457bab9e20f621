//! Leader-election state machine for a Paxos-style monitor cluster.
//!
//! A fixed set of peers, each identified by a small integer [`Rank`], elects
//! exactly one leader per round and surfaces the resulting quorum to the
//! surrounding system. This crate is the pure decision logic only: message
//! transport, timer scheduling, and the replicated log that follows an
//! election are all the embedder's concern, reached through the [`Owner`]
//! trait.
//!
//! The engine is driven by events — [`ElectionEngine::start`],
//! [`ElectionEngine::receive_propose`], [`ElectionEngine::receive_ack`],
//! [`ElectionEngine::receive_victory_claim`],
//! [`ElectionEngine::end_election_period`] — each of which runs to
//! completion before the next begins; callers are responsible for
//! supplying that serialization (a lock, a single-reader event loop, a
//! dispatch queue).

/// Declarative cluster configuration loaded from TOML.
#[cfg(feature = "toml_config")]
pub mod config;
pub mod engine;
pub mod epoch;
pub mod error;
/// Logging helpers; builds a terminal logger when the `logging` feature is
/// enabled, a silent one otherwise.
pub mod logger;
pub mod owner;
pub mod peer_tracker;
pub mod strategy;
pub mod types;

pub use engine::ElectionEngine;
pub use epoch::Epoch;
pub use error::ElectionError;
pub use owner::Owner;
pub use peer_tracker::PeerTracker;
pub use strategy::Strategy;
pub use types::{Message, NodeMap, NodeSet, Rank};
