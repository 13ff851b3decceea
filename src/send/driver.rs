//! # Outer publish loop: bounded input polling plus heartbeat cadence.
//!
//! [`drive`] is the thin loop around a [`TelemetrySender`]: it drains an
//! input channel of externally supplied values, forwarding each one as a
//! `set_value` + `publish_once` pair, while ticking the heartbeat on its own
//! interval. It is a single-threaded reactor multiplexing three waits:
//!
//! ```text
//! loop {
//!   select! {
//!     shutdown cancelled  → break
//!     heartbeat interval  → tick_heartbeat()
//!     poll interval       → drain queued values:
//!                             set_value(v); publish_once()
//!   }
//! }
//! ```
//!
//! Input polling is non-blocking: the loop checks for available values, then
//! yields for [`NodeConfig::poll_interval`] rather than blocking the task, so
//! the heartbeat cadence stays responsive regardless of input traffic. The
//! loop exits on cancellation or when the value source closes; either way it
//! announces [`EventKind::DriverStopped`] on the bus.

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::NodeConfig;
use crate::error::TransportError;
use crate::events::{Event, EventKind};
use crate::send::TelemetrySender;

/// Runs the publish loop until `shutdown` is cancelled or `values` closes.
///
/// Transport failures on the publish or heartbeat path abort the loop and
/// propagate unmodified; retry policy belongs to the caller.
pub async fn drive(
    sender: &mut TelemetrySender,
    values: &mut mpsc::Receiver<f64>,
    cfg: &NodeConfig,
    shutdown: CancellationToken,
) -> Result<(), TransportError> {
    let mut heartbeat = time::interval(cfg.heartbeat_period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut poll = time::interval(cfg.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let result = loop {
        tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            _ = heartbeat.tick() => {
                if let Err(e) = sender.tick_heartbeat().await {
                    break Err(e);
                }
            }
            _ = poll.tick() => {
                match drain(sender, values).await {
                    Ok(true) => continue,
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
        }
    };

    sender
        .bus()
        .publish(Event::new(EventKind::DriverStopped));
    result
}

/// Forwards every queued value without waiting for more.
///
/// Returns `Ok(false)` once the input source has closed.
async fn drain(
    sender: &mut TelemetrySender,
    values: &mut mpsc::Receiver<f64>,
) -> Result<bool, TransportError> {
    loop {
        match values.try_recv() {
            Ok(value) => {
                sender.set_value(value);
                sender.publish_once().await?;
            }
            Err(mpsc::error::TryRecvError::Empty) => return Ok(true),
            Err(mpsc::error::TryRecvError::Disconnected) => return Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::events::Bus;
    use crate::transport::{
        HEARTBEAT_SUBJECT, Loopback, SubjectId, Subscription, Transport, ValueKind,
    };

    const PORT: SubjectId = SubjectId::new(333).unwrap();

    fn test_config() -> NodeConfig {
        NodeConfig {
            heartbeat_period: Duration::from_millis(20),
            poll_interval: Duration::from_millis(5),
            ..NodeConfig::default()
        }
    }

    async fn receive_n(tap: &mut Box<dyn Subscription>, n: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(v) = tap.receive_within(Duration::from_millis(300)).await {
                out.push(v);
            }
        }
        out
    }

    #[tokio::test]
    async fn forwards_values_and_keeps_heartbeating() {
        let lo = Arc::new(Loopback::new(64));
        let mut data_tap = lo.subscribe(ValueKind::AngularVelocity, PORT).await.unwrap();
        let mut hb_tap = lo
            .subscribe(ValueKind::Voltage, HEARTBEAT_SUBJECT)
            .await
            .unwrap();

        let mut sender = TelemetrySender::bind(
            Arc::clone(&lo) as Arc<dyn Transport>,
            ValueKind::AngularVelocity,
            PORT,
            Bus::new(64),
        )
        .await
        .unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let token = CancellationToken::new();
        let cfg = test_config();

        tx.send(1.0).await.unwrap();
        tx.send(2.0).await.unwrap();

        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            let res = drive(&mut sender, &mut rx, &cfg, loop_token).await;
            (res, sender.state())
        });

        // Both queued values come out as distinct transmissions, in order.
        assert_eq!(receive_n(&mut data_tap, 2).await, vec![1.0, 2.0]);
        // Heartbeats keep flowing with no further input.
        assert!(
            hb_tap
                .receive_within(Duration::from_millis(300))
                .await
                .is_some()
        );

        token.cancel();
        let (res, state) = handle.await.unwrap();
        assert!(res.is_ok());
        assert_eq!(state.current_value, 2.0);
        assert!(state.uptime_ticks >= 1);
    }

    #[tokio::test]
    async fn stops_when_input_source_closes() {
        let lo = Arc::new(Loopback::new(64));
        let bus = Bus::new(64);
        let mut events = bus.subscribe();

        let mut sender = TelemetrySender::bind(
            Arc::clone(&lo) as Arc<dyn Transport>,
            ValueKind::Voltage,
            PORT,
            bus,
        )
        .await
        .unwrap();

        let (tx, mut rx) = mpsc::channel::<f64>(8);
        drop(tx);

        let cfg = test_config();
        let res = drive(&mut sender, &mut rx, &cfg, CancellationToken::new()).await;
        assert!(res.is_ok());

        // The last event on the bus is the driver announcing its exit.
        let mut last = None;
        while let Ok(ev) = events.try_recv() {
            last = Some(ev.kind);
        }
        assert_eq!(last, Some(EventKind::DriverStopped));
    }

    #[tokio::test]
    async fn transport_failure_aborts_the_loop() {
        let lo = Arc::new(Loopback::new(64));
        let mut sender = TelemetrySender::bind(
            Arc::clone(&lo) as Arc<dyn Transport>,
            ValueKind::Voltage,
            PORT,
            Bus::new(64),
        )
        .await
        .unwrap();

        lo.close().await;

        let (_tx, mut rx) = mpsc::channel::<f64>(8);
        let cfg = test_config();
        let res = drive(&mut sender, &mut rx, &cfg, CancellationToken::new()).await;
        assert!(matches!(res, Err(TransportError::Closed)));
    }
}
