//! Aggregation-read demo.
//!
//! Configures three channels on a loopback transport, lets a simulated peer
//! publish on two of them, then performs one 1-second aggregation read and
//! prints the snapshot. The third channel stays silent and shows up as
//! `Timeout`.
//!
//! Run with: `cargo run --example reader --features logging`

use std::sync::Arc;
use std::time::Duration;

use scalarbus::{
    Bus, ChannelSpec, Loopback, LogWriter, NodeConfig, SubjectId, TelemetryReader, Transport,
    ValueKind,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = NodeConfig {
        node_name: "org.scalarbus.demo_reader".to_string(),
        ..NodeConfig::default()
    };

    let transport = Arc::new(Loopback::new(64));
    transport.start().await?;

    let bus = Bus::new(cfg.bus_capacity);
    LogWriter::spawn_listener(bus.subscribe());

    let kinds = [
        ValueKind::AngularVelocity,
        ValueKind::AngularVelocity,
        ValueKind::Angle,
    ];
    let subjects = [
        SubjectId::new(1111).unwrap(),
        SubjectId::new(1112).unwrap(),
        SubjectId::new(1113).unwrap(),
    ];
    let specs = ChannelSpec::paired(&kinds, &subjects)?;

    let mut reader = TelemetryReader::configure(transport.as_ref(), &specs, bus).await?;
    println!("reader configured with {} channels", specs.len());

    // Simulated remote peer: publishes on 1111 and 1113, never on 1112.
    let peer = Arc::clone(&transport);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        peer.inject(SubjectId::new(1111).unwrap(), 2.5);
        peer.inject(SubjectId::new(1113).unwrap(), 0.1);
    });

    let snapshot = reader.aggregate_read(Duration::from_secs(1)).await?;
    let mut entries: Vec<_> = snapshot.iter().collect();
    entries.sort_by_key(|(subject, _)| **subject);
    for (subject, outcome) in entries {
        println!("  {subject}: {outcome:?}");
    }

    reader.close();
    transport.close().await;
    Ok(())
}
