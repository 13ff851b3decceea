//! # Channel specification.
//!
//! [`ChannelSpec`] names one subscribable stream: a subject id plus the value
//! kind flowing on it. Specs are plain data; validation of a whole set
//! (uniqueness, non-emptiness) happens in
//! [`SubscriptionSet::configure`](super::SubscriptionSet::configure).

use crate::error::ConfigError;
use crate::transport::{SubjectId, ValueKind};

/// Identifies one subscribable stream on the bus.
///
/// # Example
/// ```
/// use scalarbus::{ChannelSpec, SubjectId, ValueKind};
///
/// let spec = ChannelSpec::new(SubjectId::new(1111).unwrap(), ValueKind::AngularVelocity);
/// assert_eq!(spec.subject.get(), 1111);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Subject id of the stream. Must be unique within a subscription set.
    pub subject: SubjectId,
    /// Scalar type flowing on the subject.
    pub kind: ValueKind,
}

impl ChannelSpec {
    /// Creates a spec for one stream.
    pub fn new(subject: SubjectId, kind: ValueKind) -> Self {
        Self { subject, kind }
    }

    /// Builds specs from parallel lists of kinds and subject ids.
    ///
    /// Fails with [`ConfigError::LengthMismatch`] when the lists differ in
    /// length. This is a structural precondition checked before anything is
    /// built.
    ///
    /// # Example
    /// ```
    /// use scalarbus::{ChannelSpec, SubjectId, ValueKind};
    ///
    /// let kinds = [ValueKind::AngularVelocity, ValueKind::Angle];
    /// let ids = [SubjectId::new(1111).unwrap(), SubjectId::new(1113).unwrap()];
    ///
    /// let specs = ChannelSpec::paired(&kinds, &ids).unwrap();
    /// assert_eq!(specs.len(), 2);
    /// assert_eq!(specs[1].kind, ValueKind::Angle);
    /// ```
    pub fn paired(kinds: &[ValueKind], subjects: &[SubjectId]) -> Result<Vec<Self>, ConfigError> {
        if kinds.len() != subjects.len() {
            return Err(ConfigError::LengthMismatch {
                kinds: kinds.len(),
                ids: subjects.len(),
            });
        }
        Ok(kinds
            .iter()
            .zip(subjects)
            .map(|(&kind, &subject)| Self { subject, kind })
            .collect())
    }
}
