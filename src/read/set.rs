//! # Validated collection of receive endpoints.
//!
//! [`SubscriptionSet`] rejects malformed configuration before any handle is
//! acquired, then owns the acquired handles for its lifetime. No other
//! component reads from or releases the handles directly.
//!
//! ## Validation rules
//! - the spec list must be non-empty;
//! - subject ids must be unique within the set.
//!
//! Both rules are checked **before** the first `subscribe` call, so a failed
//! configure acquires zero handles. A transport refusal mid-acquisition drops
//! the handles bound so far.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::read::ChannelSpec;
use crate::transport::{SubjectId, Subscription, Transport};

/// Owns the receive endpoints of one reader.
pub struct SubscriptionSet {
    subs: Vec<Box<dyn Subscription>>,
}

impl std::fmt::Debug for SubscriptionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionSet")
            .field("subs", &self.subs.len())
            .finish()
    }
}

impl SubscriptionSet {
    /// Validates `specs` and acquires one receive endpoint per spec.
    ///
    /// Fails with [`ConfigError::EmptySpecs`] or
    /// [`ConfigError::DuplicateSubject`] before touching the transport;
    /// transport refusals surface as [`ConfigError::Transport`].
    pub async fn configure(
        transport: &dyn Transport,
        specs: &[ChannelSpec],
    ) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptySpecs);
        }
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.subject) {
                return Err(ConfigError::DuplicateSubject {
                    subject: spec.subject,
                });
            }
        }

        let mut subs = Vec::with_capacity(specs.len());
        for spec in specs {
            subs.push(transport.subscribe(spec.kind, spec.subject).await?);
        }
        Ok(Self { subs })
    }

    /// Number of configured channels.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// True after [`close`](Self::close) or when nothing was configured.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Subject ids of the configured channels, in configuration order.
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.subs.iter().map(|s| s.subject()).collect()
    }

    /// Releases every handle. Safe to call multiple times.
    pub fn close(&mut self) {
        self.subs.clear();
    }

    pub(crate) fn handles_mut(&mut self) -> &mut [Box<dyn Subscription>] {
        &mut self.subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Loopback, ValueKind};

    fn subject(id: u16) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    #[tokio::test]
    async fn configure_acquires_one_handle_per_spec() {
        let lo = Loopback::new(8);
        let specs = [
            ChannelSpec::new(subject(1111), ValueKind::AngularVelocity),
            ChannelSpec::new(subject(1113), ValueKind::Angle),
        ];

        let set = SubscriptionSet::configure(&lo, &specs).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.subjects(), vec![subject(1111), subject(1113)]);
        assert_eq!(lo.subscription_count(), 2);
    }

    #[tokio::test]
    async fn empty_specs_are_rejected() {
        let lo = Loopback::new(8);
        let err = SubscriptionSet::configure(&lo, &[]).await.unwrap_err();
        assert!(matches!(err, ConfigError::EmptySpecs));
        assert_eq!(lo.subscription_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_subjects_acquire_zero_handles() {
        let lo = Loopback::new(8);
        let specs = [
            ChannelSpec::new(subject(42), ValueKind::Voltage),
            ChannelSpec::new(subject(42), ValueKind::Voltage),
        ];

        let err = SubscriptionSet::configure(&lo, &specs).await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateSubject { subject } if subject.get() == 42
        ));
        assert_eq!(lo.subscription_count(), 0);
    }

    #[tokio::test]
    async fn close_releases_handles_and_is_idempotent() {
        let lo = Loopback::new(8);
        let specs = [ChannelSpec::new(subject(7), ValueKind::Voltage)];
        let mut set = SubscriptionSet::configure(&lo, &specs).await.unwrap();
        assert_eq!(lo.subscription_count(), 1);

        set.close();
        assert_eq!(lo.subscription_count(), 0);
        assert!(set.is_empty());

        set.close();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn closed_transport_refusal_propagates() {
        let lo = Loopback::new(8);
        lo.close().await;
        let specs = [ChannelSpec::new(subject(7), ValueKind::Voltage)];

        let err = SubscriptionSet::configure(&lo, &specs).await.unwrap_err();
        assert!(matches!(err, ConfigError::Transport(_)));
    }
}
