//! A simulation of the Bully leader election among a fixed set of in-process peers
//!
//! # General Structure
//! ## The `Roster`
//! All peers live in a single, id-sorted [`Roster`] that is built once and never changes
//! afterwards. Every peer is addressed through a [`PeerHandle`], which is just a shared reference
//! to the roster plus the index of the peer in it, so handing peers to other peers does not create
//! any ownership cycles.
//!
//! ## Probing
//! Every peer runs a [`probe::probe_loop`] that periodically checks all higher ranked peers. Once
//! the peer that is currently believed to be the leader does not answer anymore, an election is
//! started.
//!
//! ## Elections
//! An election walks all the higher ranked peers and [`PeerHandle::challenge`]s them, the first
//! one that answers as alive takes over the election (by starting its own) and the current peer
//! stands down. If none of the higher ranked peers answer, the peer declares itself the leader.
//!
//! ## The `Cluster`
//! The [`Cluster`] bootstraps everything, it builds the roster, seeds the initial leader, spawns
//! the probers and allows for stopping peers, either directly or after some delay.
//!
//! # References
//! * [Elections in a Distributed Computing System](https://doi.org/10.1109/TC.1982.1675885)

pub mod config;
pub mod schedule;
pub mod store;

mod challenge;
mod cluster;
mod election;
mod peer;
mod roster;

pub mod probe;

pub use cluster::{Builder, Cluster};
pub use election::ElectionOutcome;
pub use peer::{PeerHandle, PeerId, PeerSnapshot, Response};
pub use roster::{Roster, RosterError};
