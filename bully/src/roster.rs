use std::sync::Arc;

use crate::{
    config::PeerConfig,
    peer::{Peer, PeerHandle, PeerId},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("the roster needs at least one peer")]
    Empty,
    #[error("peer {0} is part of the roster more than once")]
    DuplicateId(PeerId),
    #[error("the initial leader {0} is not part of the roster")]
    UnknownLeader(PeerId),
    #[error("no peer with id {0} in the roster")]
    UnknownPeer(PeerId),
    #[error("the roster must be created from within a tokio runtime")]
    NoRuntime,
}

/// The fixed set of all Peers, sorted by their Id
///
/// Once created, the Roster never changes, Peers can neither join nor leave.
#[derive(Debug)]
pub struct Roster {
    pub(crate) peers: Vec<Peer>,
    pub(crate) config: PeerConfig,
    pub(crate) runtime: tokio::runtime::Handle,
}

impl Roster {
    /// Creates a new Roster, where every Peer starts out believing that `leader` is the current
    /// leader.
    pub fn new<I>(
        ids: I,
        leader: PeerId,
        config: PeerConfig,
        runtime: tokio::runtime::Handle,
    ) -> Result<Arc<Self>, RosterError>
    where
        I: IntoIterator<Item = PeerId>,
    {
        let mut ids: Vec<PeerId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(RosterError::Empty);
        }

        ids.sort_unstable();
        if let Some(dup) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(RosterError::DuplicateId(dup[0]));
        }

        if ids.binary_search(&leader).is_err() {
            return Err(RosterError::UnknownLeader(leader));
        }

        Ok(Arc::new(Self {
            peers: ids.into_iter().map(|id| Peer::new(id, leader)).collect(),
            config,
            runtime,
        }))
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn ids(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.iter().map(|p| p.id())
    }

    /// Gets the Handle for the Peer with the given Id
    pub fn get(self: &Arc<Self>, id: PeerId) -> Result<PeerHandle, RosterError> {
        self.peers
            .binary_search_by_key(&id, |p| p.id())
            .map(|idx| PeerHandle::new(self.clone(), idx))
            .map_err(|_| RosterError::UnknownPeer(id))
    }

    /// Handles to all the Peers, in ascending order of their Ids
    pub fn handles(self: &Arc<Self>) -> impl Iterator<Item = PeerHandle> + '_ {
        (0..self.peers.len()).map(|idx| PeerHandle::new(self.clone(), idx))
    }
}
