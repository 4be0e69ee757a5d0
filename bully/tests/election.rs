use std::time::Duration;

use bully::{config::PeerConfig, schedule::Schedule, Cluster, ElectionOutcome, PeerId, Response};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

fn cluster(peers: u64, config: PeerConfig) -> Cluster {
    Cluster::builder()
        .peers(0..peers)
        .initial_leader(peers - 1)
        .config(config)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn leader_failure_silent() {
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_test_writer()),
    );

    let mut cluster = cluster(8, PeerConfig::basic());
    cluster.start();
    cluster.stop_after(7u64, Duration::from_secs(10)).unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    for peer in cluster.peers() {
        assert_eq!(0, peer.round(), "{:?}", peer.snapshot());
    }

    tokio::time::sleep(Duration::from_secs(60)).await;

    let new_leader = cluster.peer(6u64).unwrap();
    assert_eq!(PeerId(6), new_leader.believed_leader());
    assert!(new_leader.round() >= 1);

    // Without announcements nobody else finds out, but every one of them probes 7 and notices
    for id in 0..6u64 {
        let peer = cluster.peer(id).unwrap();
        assert_eq!(PeerId(7), peer.believed_leader(), "{:?}", peer.snapshot());
        assert!(peer.round() >= 1, "{:?}", peer.snapshot());
    }
    assert!(!cluster.peer(7u64).unwrap().is_alive());

    cluster.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn leader_failure_broadcast() {
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_test_writer()),
    );

    let mut cluster = cluster(8, PeerConfig::broadcasting());
    cluster.start();
    cluster.stop_after(7u64, Duration::from_secs(10)).unwrap();

    tokio::time::sleep(Duration::from_secs(60)).await;

    for id in 0..7u64 {
        let peer = cluster.peer(id).unwrap();
        assert_eq!(PeerId(6), peer.believed_leader(), "{:?}", peer.snapshot());
    }

    // Once everyone agrees on 6, nobody probes a dead leader anymore
    let rounds: Vec<_> = cluster.peers().iter().map(|p| p.round()).collect();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(rounds, cluster.peers().iter().map(|p| p.round()).collect::<Vec<_>>());

    cluster.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn successive_failures() {
    let mut cluster = cluster(5, PeerConfig::broadcasting());
    cluster.start_with(|_| Schedule::unlimited_constant(Duration::from_millis(500)));

    cluster.stop(4u64).unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(PeerId(3), cluster.peer(0u64).unwrap().believed_leader());

    cluster.stop(3u64).unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    for id in 0..3u64 {
        assert_eq!(PeerId(2), cluster.peer(id).unwrap().believed_leader());
    }

    cluster.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn challenge_dead_peer_continues() {
    let cluster = cluster(8, PeerConfig::basic());
    let peer = cluster.peer(3u64).unwrap();

    cluster.stop(4u64).unwrap();
    cluster.stop(7u64).unwrap();

    assert_eq!(Response::Down, cluster.peer(7u64).unwrap().challenge(PeerId(3)));

    // 4 is down, so the next in line is asked
    assert_eq!(ElectionOutcome::Yielded { to: PeerId(5) }, peer.elect());
}

#[tokio::test(start_paused = true)]
async fn challenge_live_peer() {
    let cluster = cluster(8, PeerConfig::basic());
    let challenger = cluster.peer(3u64).unwrap();
    let challenged = cluster.peer(5u64).unwrap();

    cluster.stop(4u64).unwrap();

    assert_eq!(Response::Alive, challenged.challenge(challenger.id()));
    assert_eq!(1, challenged.round());

    assert_eq!(ElectionOutcome::Yielded { to: PeerId(5) }, challenger.elect());
    assert_eq!(PeerId(7), challenger.believed_leader());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!challenged.is_electing());
}

#[tokio::test(start_paused = true)]
async fn elections_never_go_down() {
    let cluster = cluster(6, PeerConfig::basic());
    for id in 3..6u64 {
        cluster.stop(id).unwrap();
    }

    // 0 and 1 are alive and would answer, so they must never be asked
    let peer = cluster.peer(2u64).unwrap();
    assert_eq!(ElectionOutcome::Elected, peer.elect());
    assert_eq!(PeerId(2), peer.believed_leader());

    tokio::time::sleep(Duration::from_millis(1)).await;
    for id in 0..2u64 {
        let lower = cluster.peer(id).unwrap();
        assert_eq!(0, lower.round(), "{:?}", lower.snapshot());
        assert_eq!(PeerId(5), lower.believed_leader());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_triggers() {
    let cluster = cluster(8, PeerConfig::basic());
    cluster.stop(7u64).unwrap();

    let peer = cluster.peer(6u64).unwrap();
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let peer = peer.clone();
            tokio::spawn(async move { peer.start_election() })
        })
        .collect();

    let mut started = 0;
    for handle in handles {
        if handle.await.unwrap() {
            started += 1;
        }
    }

    // Every started election has to finish before the next one can begin
    assert!(started >= 1);
    assert_eq!(started, peer.round());

    while peer.is_electing() {
        tokio::task::yield_now().await;
    }
    assert_eq!(PeerId(6), peer.believed_leader());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn snapshot_serializes() {
    let cluster = cluster(2, PeerConfig::basic());
    cluster.stop(0u64).unwrap();

    let raw = serde_json::to_value(cluster.snapshot()).unwrap();
    assert_eq!(
        serde_json::json!([
            { "id": 0, "alive": false, "leader": 1, "electing": false, "round": 0 },
            { "id": 1, "alive": true, "leader": 1, "electing": false, "round": 0 },
        ]),
        raw
    );
}
