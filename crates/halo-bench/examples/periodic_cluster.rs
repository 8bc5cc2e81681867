//! Eight-rank periodic halo exchange example.
//!
//! Demonstrates: process grid → local cluster → one exchanger per rank
//! → repeated exchanges → per-rank metrics.

use std::thread;

use halo_core::{GridExtents, Transport};
use halo_exchange::{ExchangeConfig, HaloExchanger};
use halo_transport::{LocalCluster, ProcessGrid};

fn main() {
    println!("=== Halo Exchange: 2x2x2 periodic cluster ===\n");

    let procs = ProcessGrid::periodic([2, 2, 2]).expect("valid process grid");
    let config = ExchangeConfig::new(GridExtents::new(16, 16, 16), 1, 19);
    let cluster = LocalCluster::new(&procs);

    let handles: Vec<_> = cluster
        .into_iter()
        .map(|mut transport| {
            let config = config.clone();
            thread::spawn(move || {
                let mut exchanger = HaloExchanger::new(config).expect("valid config");
                let len = exchanger.config().field_len().expect("field fits in memory");
                let rank = transport.rank();
                let mut field = vec![rank.0 as f64; len];
                for _ in 0..10 {
                    exchanger
                        .exchange_field(&mut transport, &mut field)
                        .expect("exchange");
                }
                (rank, exchanger.last_metrics().clone())
            })
        })
        .collect();

    for handle in handles {
        let (rank, m) = handle.join().expect("rank thread panicked");
        println!(
            "rank {rank}: {} pairs, {} elements out, {} in, {}us (gather {}us, exchange {}us, scatter {}us)",
            m.pairs_executed,
            m.elements_sent,
            m.elements_received,
            m.total_us,
            m.gather_us,
            m.exchange_us,
            m.scatter_us,
        );
    }
}
