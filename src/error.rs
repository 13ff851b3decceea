//! Error types used by the scalarbus core.
//!
//! This module defines three error enums:
//!
//! - [`ConfigError`] — malformed channel specifications, rejected before any
//!   read is attempted.
//! - [`ReadError`] — misuse of the aggregation reader.
//! - [`TransportError`] — failures surfaced by the underlying pub/sub
//!   transport, propagated unmodified.
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. A per-channel timeout is deliberately **not** an error:
//! absence of data within the read budget is valid domain information and is
//! represented in-band as [`ReadOutcome::Timeout`](crate::ReadOutcome).

use thiserror::Error;

use crate::transport::SubjectId;

/// # Errors raised while configuring a subscription set.
///
/// These are structural preconditions, checked eagerly at configure time and
/// never retried automatically. A failed configure acquires zero handles.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The channel specification list was empty.
    #[error("channel specification list is empty")]
    EmptySpecs,

    /// Two specifications named the same subject id.
    #[error("duplicate subject id {subject} in channel specifications")]
    DuplicateSubject {
        /// The subject id that appeared more than once.
        subject: SubjectId,
    },

    /// Parallel specification lists differ in length.
    #[error("specification lists differ in length: {kinds} value kinds vs {ids} subject ids")]
    LengthMismatch {
        /// Number of value kinds supplied.
        kinds: usize,
        /// Number of subject ids supplied.
        ids: usize,
    },

    /// The transport refused to bind a channel handle.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scalarbus::ConfigError;
    ///
    /// assert_eq!(ConfigError::EmptySpecs.as_label(), "config_empty_specs");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::EmptySpecs => "config_empty_specs",
            ConfigError::DuplicateSubject { .. } => "config_duplicate_subject",
            ConfigError::LengthMismatch { .. } => "config_length_mismatch",
            ConfigError::Transport(_) => "config_transport",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Errors raised by the aggregation reader.
///
/// Note that a channel going silent is **not** represented here; see
/// [`ReadOutcome::Timeout`](crate::ReadOutcome).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReadError {
    /// `aggregate_read` was invoked with no configured channels.
    ///
    /// An aggregation read over zero channels is meaningless; the caller must
    /// configure the subscription set before reading.
    #[error("no channels configured; configure the subscription set before reading")]
    NoSubscriptions,
}

impl ReadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scalarbus::ReadError;
    ///
    /// assert_eq!(ReadError::NoSubscriptions.as_label(), "read_no_subscriptions");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReadError::NoSubscriptions => "read_no_subscriptions",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Failures surfaced by the pub/sub transport.
///
/// The core performs no implicit retry; retry policy, if any, belongs to the
/// driver.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// A receive endpoint could not be bound.
    #[error("failed to subscribe to subject {subject}: {reason}")]
    Subscribe {
        /// Subject that failed to bind.
        subject: SubjectId,
        /// Transport-provided failure detail.
        reason: String,
    },

    /// A transmission could not be sent.
    #[error("failed to publish on subject {subject}: {reason}")]
    Publish {
        /// Subject of the failed transmission.
        subject: SubjectId,
        /// Transport-provided failure detail.
        reason: String,
    },

    /// The transport node has been closed.
    #[error("transport node is closed")]
    Closed,
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Subscribe { .. } => "transport_subscribe",
            TransportError::Publish { .. } => "transport_publish",
            TransportError::Closed => "transport_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
