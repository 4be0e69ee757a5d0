use std::{
    fmt::{self, Display},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use crate::{roster::Roster, store::Store};

/// The Rank of a Peer, higher Ids win elections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct PeerId(pub u64);

impl Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PeerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The Answer to a probe or challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum Response {
    Alive,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Electing,
}

/// Everything about a Peer that can change while the election is running.
///
/// The leader, phase and round are kept in one record, so checking the phase and writing the
/// leader always happen under the same lock.
#[derive(Debug)]
struct State {
    leader: PeerId,
    phase: Phase,
    round: u64,
}

/// The record for a single Peer stored in the [`Roster`]
#[derive(Debug)]
pub(crate) struct Peer {
    id: PeerId,
    alive: AtomicBool,
    state: Mutex<State>,
    store: Store,
}

impl Peer {
    pub(crate) fn new(id: PeerId, leader: PeerId) -> Self {
        Self {
            id,
            alive: AtomicBool::new(true),
            state: Mutex::new(State {
                leader,
                phase: Phase::Idle,
                round: 0,
            }),
            store: Store::new(),
        }
    }

    pub(crate) fn id(&self) -> PeerId {
        self.id
    }

    // The state only holds plain values, so a panic while holding the lock can not leave it in a
    // broken state
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Attempts the Idle -> Electing transition, returning the round of the new election
    pub(crate) fn begin_election(&self) -> Option<u64> {
        let mut state = self.state();
        if state.phase == Phase::Electing {
            return None;
        }

        state.phase = Phase::Electing;
        state.round += 1;
        Some(state.round)
    }

    /// Returns to Idle, optionally declaring ourselves the leader on the way
    pub(crate) fn finish_election(&self, declare: bool) {
        let mut state = self.state();
        if declare {
            state.leader = self.id;
        }
        state.phase = Phase::Idle;
    }

    pub(crate) fn adopt_leader(&self, leader: PeerId) {
        self.state().leader = leader;
    }
}

/// A point in time view of a Peer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct PeerSnapshot {
    pub id: PeerId,
    pub alive: bool,
    pub leader: PeerId,
    pub electing: bool,
    pub round: u64,
}

/// A Handle to a single Peer in a [`Roster`]
///
/// Handles are cheap to clone and can be freely send to other tasks, they all refer to the same
/// shared Peer.
#[derive(Clone)]
pub struct PeerHandle {
    roster: Arc<Roster>,
    idx: usize,
}

impl PeerHandle {
    pub(crate) fn new(roster: Arc<Roster>, idx: usize) -> Self {
        Self { roster, idx }
    }

    pub(crate) fn peer(&self) -> &Peer {
        &self.roster.peers[self.idx]
    }

    pub(crate) fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    pub fn id(&self) -> PeerId {
        self.peer().id
    }

    pub fn is_alive(&self) -> bool {
        self.peer().is_alive()
    }

    /// The Peer this Peer currently considers to be the leader
    pub fn believed_leader(&self) -> PeerId {
        self.peer().state().leader
    }

    pub fn is_electing(&self) -> bool {
        self.peer().state().phase == Phase::Electing
    }

    /// The number of elections this Peer has started so far
    pub fn round(&self) -> u64 {
        self.peer().state().round
    }

    pub fn store(&self) -> &Store {
        &self.peer().store
    }

    pub fn snapshot(&self) -> PeerSnapshot {
        let peer = self.peer();
        let state = peer.state();

        PeerSnapshot {
            id: peer.id,
            alive: peer.is_alive(),
            leader: state.leader,
            electing: state.phase == Phase::Electing,
            round: state.round,
        }
    }

    /// All the Peers with a higher rank than this one, in ascending order
    pub fn higher(&self) -> impl Iterator<Item = PeerHandle> + '_ {
        ((self.idx + 1)..self.roster.peers.len()).map(|idx| PeerHandle::new(self.roster.clone(), idx))
    }

    /// Marks the Peer as crashed, from now on it will answer every probe and challenge with
    /// [`Response::Down`].
    ///
    /// Returns `true` if this call actually stopped the Peer and `false` if it was already
    /// stopped before.
    pub fn stop(&self) -> bool {
        let stopped = self.peer().alive.swap(false, Ordering::AcqRel);

        #[cfg(feature = "tracing")]
        if stopped {
            tracing::info!(peer = %self.id(), "Peer stopped");
        }

        stopped
    }

    /// Answers a liveness check from another Peer
    pub fn probe(&self, caller: PeerId) -> Response {
        let resp = if self.is_alive() {
            Response::Alive
        } else {
            Response::Down
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(peer = %self.id(), %caller, ?resp, "Probed");
        #[cfg(not(feature = "tracing"))]
        let _ = caller;

        resp
    }
}

impl fmt::Debug for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerHandle")
            .field("id", &self.id())
            .field("idx", &self.idx)
            .finish()
    }
}

impl PartialEq for PeerHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.roster, &other.roster) && self.idx == other.idx
    }
}
