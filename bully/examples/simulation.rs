//! Runs 8 Peers, stops the leader after 10 seconds and keeps going until Ctrl-C is pressed
//!
//! `cargo run --example simulation`

use std::time::Duration;

use bully::{config::PeerConfig, Cluster};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

const PEERS: u64 = 8;

fn main() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()),
    )
    .unwrap();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .enable_io()
        .build()
        .unwrap();

    runtime.block_on(async {
        tracing::info!("Starting the peers");

        let mut cluster = Cluster::builder()
            .peers(0..PEERS)
            .initial_leader(PEERS - 1)
            .config(PeerConfig::basic())
            .build()
            .unwrap();

        for peer in cluster.peers() {
            peer.store()
                .put(format!("peer-{}", peer.id()), format!("started as {}", peer.id()));
        }

        cluster.start();
        cluster
            .stop_after(PEERS - 1, Duration::from_secs(10))
            .unwrap();

        tokio::signal::ctrl_c().await.unwrap();

        tracing::info!("Stopping the peers");

        for snapshot in cluster.snapshot() {
            tracing::info!(?snapshot, "Final state");
        }
        for peer in cluster.peers() {
            tracing::info!(peer = %peer.id(), data = ?peer.store().dump(), "Stored data");
        }

        cluster.shutdown().await;
    });
}
