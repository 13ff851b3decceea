//! Publish-loop demo.
//!
//! Reads scalar values line by line from stdin and forwards each one onto a
//! loopback transport while heartbeating once a second. Type a number and
//! press enter to publish it; close stdin (Ctrl-D) or press Ctrl-C to stop.
//!
//! Run with: `cargo run --example sender --features logging`

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use scalarbus::{
    Bus, Loopback, LogWriter, NodeConfig, SubjectId, TelemetrySender, Transport, ValueKind, drive,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = NodeConfig {
        node_name: "org.scalarbus.demo_sender".to_string(),
        heartbeat_period: Duration::from_secs(1),
        ..NodeConfig::default()
    };
    let port = SubjectId::new(1111).unwrap();

    let transport = Arc::new(Loopback::new(64));
    transport.start().await?;

    let bus = Bus::new(cfg.bus_capacity);
    LogWriter::spawn_listener(bus.subscribe());

    let mut sender = TelemetrySender::bind(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ValueKind::AngularVelocity,
        port,
        bus,
    )
    .await?;
    println!("sender bound to subject {port}; enter values to publish");

    // Stdin pump: parsed lines feed the driver's value channel.
    let (tx, mut rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match line.trim().parse::<f64>() {
                Ok(value) => {
                    if tx.send(value).await.is_err() {
                        break;
                    }
                }
                Err(_) => eprintln!("not a number: {line:?}"),
            }
        }
    });

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    drive(&mut sender, &mut rx, &cfg, token).await?;

    transport.close().await;
    println!(
        "sender stopped after {} heartbeats",
        sender.state().uptime_ticks
    );
    Ok(())
}
