//! The Liveness Prober every Peer runs in the background

use crate::{
    peer::{PeerHandle, Response},
    schedule::{self, ProbeSchedule},
};

/// Sends a single probe from `peer` to `target` and starts an election if the target was the
/// leader and did not answer.
///
/// Returns the Response of the target.
pub fn probe_once(peer: &PeerHandle, target: &PeerHandle) -> Response {
    let resp = target.probe(peer.id());

    if resp == Response::Down && peer.believed_leader() == target.id() {
        #[cfg(feature = "tracing")]
        tracing::info!(peer = %peer.id(), leader = %target.id(), "Leader is down");

        peer.start_election();
    }

    resp
}

/// Keeps probing all the Peers ranked higher than `peer`, one after the other and pausing after
/// each probe, for as long as the `schedule` allows it.
///
/// A Peer that has been stopped keeps probing, its elections just don't matter anymore.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(peer, schedule), fields(peer = %peer.id())))]
pub async fn probe_loop<S>(peer: PeerHandle, mut schedule: S)
where
    S: ProbeSchedule,
{
    let higher: Vec<PeerHandle> = peer.higher().collect();

    #[cfg(feature = "tracing")]
    tracing::info!(targets = higher.len(), "Peer started");

    loop {
        if higher.is_empty() {
            // Nothing to probe, but we still don't want to spin
            if !schedule.should_probe() {
                break;
            }
            schedule::pause(&mut schedule).await;
            continue;
        }

        for target in higher.iter() {
            if !schedule.should_probe() {
                #[cfg(feature = "tracing")]
                tracing::debug!("Schedule exhausted");

                return;
            }

            probe_once(&peer, target);

            schedule::pause(&mut schedule).await;
        }
    }
}
