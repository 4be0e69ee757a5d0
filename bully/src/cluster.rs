use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::{
    config::PeerConfig,
    peer::{PeerHandle, PeerId},
    probe,
    roster::{Roster, RosterError},
    schedule::{ProbeSchedule, Schedule},
};

/// Collects everything needed to bootstrap a [`Cluster`]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    ids: Vec<PeerId>,
    leader: Option<PeerId>,
    config: PeerConfig,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given Peers to the Cluster
    pub fn peers<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PeerId>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// The leader every Peer believes in at the start, defaults to the highest ranked Peer
    pub fn initial_leader<P>(mut self, leader: P) -> Self
    where
        P: Into<PeerId>,
    {
        self.leader = Some(leader.into());
        self
    }

    pub fn config(mut self, config: PeerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the Cluster, this needs to be called from within a tokio runtime, as the Peers use
    /// it to run their elections.
    pub fn build(self) -> Result<Cluster, RosterError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| RosterError::NoRuntime)?;

        let leader = self
            .leader
            .or_else(|| self.ids.iter().max().copied())
            .ok_or(RosterError::Empty)?;

        let roster = Roster::new(self.ids, leader, self.config, runtime)?;

        Ok(Cluster {
            roster,
            probing: false,
            tasks: Vec::new(),
        })
    }
}

/// A running set of Peers
///
/// Dropping the Cluster stops all the background tasks it started.
#[derive(Debug)]
pub struct Cluster {
    roster: Arc<Roster>,
    probing: bool,
    tasks: Vec<JoinHandle<()>>,
}

impl Cluster {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    pub fn peer<P>(&self, id: P) -> Result<PeerHandle, RosterError>
    where
        P: Into<PeerId>,
    {
        self.roster.get(id.into())
    }

    /// All the Peers in ascending order of their Ids
    pub fn peers(&self) -> Vec<PeerHandle> {
        self.roster.handles().collect()
    }

    /// Starts the prober of every Peer, pacing them with the configured probe interval
    ///
    /// Returns `false` if the probers were already started before.
    pub fn start(&mut self) -> bool {
        let interval = self.roster.config().probe_interval();
        self.start_with(|_| Schedule::unlimited_constant(interval))
    }

    /// Starts the prober of every Peer, using the schedule returned by `schedule` for each of them
    ///
    /// Every Peer only ever gets a single prober, so this does nothing and returns `false` if the
    /// probers were already started before.
    pub fn start_with<F, S>(&mut self, mut schedule: F) -> bool
    where
        F: FnMut(PeerId) -> S,
        S: ProbeSchedule + Send + 'static,
    {
        if self.probing {
            #[cfg(feature = "tracing")]
            tracing::warn!("Probers are already running");

            return false;
        }
        self.probing = true;

        for peer in self.roster.handles() {
            #[cfg(feature = "tracing")]
            if peer.id() == peer.believed_leader() {
                tracing::info!(peer = %peer.id(), "Peer is the leader");
            }

            let peer_schedule = schedule(peer.id());
            let task = self
                .roster
                .runtime
                .spawn(probe::probe_loop(peer, peer_schedule));
            self.tasks.push(task);
        }

        true
    }

    /// Stops the given Peer right away
    pub fn stop<P>(&self, id: P) -> Result<bool, RosterError>
    where
        P: Into<PeerId>,
    {
        Ok(self.peer(id)?.stop())
    }

    /// Stops the given Peer once `delay` has passed
    pub fn stop_after<P>(&mut self, id: P, delay: Duration) -> Result<(), RosterError>
    where
        P: Into<PeerId>,
    {
        let peer = self.peer(id)?;

        let task = self.roster.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            peer.stop();
        });
        self.tasks.push(task);

        Ok(())
    }

    /// The current state of every Peer
    pub fn snapshot(&self) -> Vec<crate::PeerSnapshot> {
        self.roster.handles().map(|p| p.snapshot()).collect()
    }

    /// Tears down all the background tasks and waits for them to finish.
    ///
    /// Elections that are currently running are not cancelled and will still finish.
    pub async fn shutdown(mut self) {
        let tasks = std::mem::take(&mut self.tasks);

        for task in tasks.iter() {
            task.abort();
        }

        for task in tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Background task failed: {:?}", e);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Cluster shut down");
    }
}

impl Drop for Cluster {
    fn drop(&mut self) {
        for task in self.tasks.iter() {
            task.abort();
        }
    }
}
