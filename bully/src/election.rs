use crate::peer::{PeerHandle, PeerId, Response};

/// How a single call to [`PeerHandle::elect`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionOutcome {
    /// The Peer was already running an election, nothing was done
    AlreadyRunning,
    /// The Peer has been stopped and does not take part in elections anymore
    Stopped,
    /// A higher ranked Peer answered our challenge and takes over
    Yielded { to: PeerId },
    /// None of the higher ranked Peers answered, we are the leader now
    Elected,
}

impl PeerHandle {
    /// Starts an election in the background, unless this Peer is already running one.
    ///
    /// Returns `true` if a new election was started.
    pub fn start_election(&self) -> bool {
        if !self.is_alive() {
            return false;
        }

        let round = match self.peer().begin_election() {
            Some(r) => r,
            None => return false,
        };

        let handle = self.clone();
        self.roster().runtime.spawn(async move {
            handle.campaign(round);
        });

        true
    }

    /// Runs an election to completion on the current task
    pub fn elect(&self) -> ElectionOutcome {
        if !self.is_alive() {
            return ElectionOutcome::Stopped;
        }

        match self.peer().begin_election() {
            Some(round) => self.campaign(round),
            None => ElectionOutcome::AlreadyRunning,
        }
    }

    /// The actual election, must only be called after successfully entering the Electing phase
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(peer = %self.id())))]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn campaign(&self, round: u64) -> ElectionOutcome {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting election");

        for target in self.higher() {
            match target.challenge(self.id()) {
                Response::Alive => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(to = %target.id(), "Yielding");

                    self.peer().finish_election(false);
                    return ElectionOutcome::Yielded { to: target.id() };
                }
                Response::Down => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(higher = %target.id(), "Higher peer is down");
                }
            };
        }

        self.peer().finish_election(true);

        #[cfg(feature = "tracing")]
        tracing::info!("New leader declared");

        if self.roster().config.announces() && self.is_alive() {
            self.broadcast();
        }

        ElectionOutcome::Elected
    }

    /// Tells every lower ranked Peer that we are the leader now
    fn broadcast(&self) {
        let id = self.id();
        for peer in self.roster().handles().take_while(|p| p.id() < id) {
            peer.announce(id);
        }
    }
}
