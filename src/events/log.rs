//! # Simple logging listener for debugging and demos.
//!
//! [`LogWriter`] drains an event receiver and prints each event to stdout in
//! a human-readable format. This is primarily useful for development,
//! debugging, and the bundled demos.
//!
//! ## Output format
//! ```text
//! [read-started] channels=3 budget_ms=1000
//! [channel-timeout] subject=1112 budget_ms=1000
//! [read-completed] channels=3 timeouts=1 budget_ms=1000
//! [published] subject=1200 value=7
//! [heartbeat] uptime=42
//! [driver-stopped]
//! ```

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{Event, EventKind};

/// Simple stdout logging listener.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use — attach your own listener to
/// [`Bus::subscribe`](super::Bus::subscribe) for structured logging or
/// metrics collection.
pub struct LogWriter;

impl LogWriter {
    /// Spawns a background listener that prints every event from `rx`.
    ///
    /// The listener exits when the bus is dropped or the receiver lags.
    pub fn spawn_listener(mut rx: broadcast::Receiver<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                Self::write(&ev);
            }
        })
    }

    fn write(ev: &Event) {
        match ev.kind {
            EventKind::ReadStarted => {
                println!(
                    "[read-started] channels={} budget_ms={}",
                    ev.channels.unwrap_or(0),
                    ev.budget_ms.unwrap_or(0)
                );
            }
            EventKind::ReadCompleted => {
                println!(
                    "[read-completed] channels={} timeouts={} budget_ms={}",
                    ev.channels.unwrap_or(0),
                    ev.timeouts.unwrap_or(0),
                    ev.budget_ms.unwrap_or(0)
                );
            }
            EventKind::ChannelTimedOut => {
                if let Some(subject) = ev.subject {
                    println!(
                        "[channel-timeout] subject={subject} budget_ms={}",
                        ev.budget_ms.unwrap_or(0)
                    );
                }
            }
            EventKind::ValuePublished => {
                if let (Some(subject), Some(value)) = (ev.subject, ev.value) {
                    println!("[published] subject={subject} value={value}");
                }
            }
            EventKind::HeartbeatTick => {
                println!("[heartbeat] uptime={}", ev.uptime.unwrap_or(0));
            }
            EventKind::DriverStopped => {
                println!("[driver-stopped]");
            }
        }
    }
}
