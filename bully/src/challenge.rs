use crate::peer::{PeerHandle, PeerId, Response};

impl PeerHandle {
    /// Answers a challenge from a lower ranked Peer that is running an election.
    ///
    /// A live Peer not only answers [`Response::Alive`], it also starts an election of its own,
    /// because the challenger just found out that the current leader might be gone and we outrank
    /// it.
    pub fn challenge(&self, challenger: PeerId) -> Response {
        if !self.is_alive() {
            #[cfg(feature = "tracing")]
            tracing::debug!(peer = %self.id(), %challenger, "Challenged while down");

            return Response::Down;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(peer = %self.id(), %challenger, "Answering challenge");
        #[cfg(not(feature = "tracing"))]
        let _ = challenger;

        self.start_election();

        Response::Alive
    }

    /// Receives the announcement of a new leader
    pub fn announce(&self, leader: PeerId) {
        if !self.is_alive() {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::info!(peer = %self.id(), %leader, "Leader announced");

        self.peer().adopt_leader(leader);
    }
}
