//! # Per-node configuration.
//!
//! [`NodeConfig`] carries everything a node instance needs: identity, the
//! register-file path handed to the transport, the heartbeat cadence, the
//! driver poll interval, and the event bus capacity.
//!
//! The configuration is an explicit value passed at construction and owned
//! per instance. There is no process-wide mutable state: two nodes in one
//! process can use different register files.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use scalarbus::NodeConfig;
//!
//! let mut cfg = NodeConfig::default();
//! cfg.node_name = "org.example.reader".into();
//! cfg.heartbeat_period = Duration::from_millis(500);
//!
//! assert_eq!(cfg.heartbeat_period, Duration::from_millis(500));
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one node instance.
///
/// Controls node identity, transport persistence, heartbeat cadence, and the
/// driver's input polling.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Node name announced on the bus (reverse-DNS convention).
    pub node_name: String,
    /// Bus-level node identifier. Must be unique within a network.
    pub node_id: u8,
    /// Register file handed to the transport for persisted configuration.
    pub register_file: PathBuf,
    /// Cadence of liveness heartbeats, independent of data traffic.
    pub heartbeat_period: Duration,
    /// Bounded yield between input polls in the driver loop.
    pub poll_interval: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for NodeConfig {
    /// Provides a default configuration:
    /// - `node_name = "org.scalarbus.node"`
    /// - `node_id = 3`
    /// - `register_file = "node.db"`
    /// - `heartbeat_period = 1s`
    /// - `poll_interval = 10ms`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            node_name: "org.scalarbus.node".to_string(),
            node_id: 3,
            register_file: PathBuf::from("node.db"),
            heartbeat_period: Duration::from_secs(1),
            poll_interval: Duration::from_millis(10),
            bus_capacity: 256,
        }
    }
}
