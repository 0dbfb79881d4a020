use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Instant on the shared host clock, in whole seconds since the UNIX epoch.
///
/// The core never reads a clock itself: every mutating operation receives the
/// current `Timestamp` from its environment. The host guarantees the signal
/// is monotonically non-decreasing.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from a second count.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The epoch (second zero).
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    /// Seconds since the epoch.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + secs`, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// `self + secs`, clamped at `u64::MAX`.
    pub fn saturating_add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}s)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_seconds() {
        let a = Timestamp::from_secs(100);
        let b = Timestamp::from_secs(200);
        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn equal_timestamps() {
        let a = Timestamp::from_secs(5);
        let b = Timestamp::from(5);
        assert_eq!(a, b);
        assert!(a <= b && a >= b);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(
            Timestamp::from_secs(10).checked_add_secs(5),
            Some(Timestamp::from_secs(15))
        );
        assert_eq!(Timestamp::from_secs(u64::MAX).checked_add_secs(1), None);
        assert_eq!(
            Timestamp::from_secs(u64::MAX).saturating_add_secs(1),
            Timestamp::from_secs(u64::MAX)
        );
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        // After 2020-01-01.
        assert!(Timestamp::now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn zero_is_smallest() {
        assert!(Timestamp::zero() < Timestamp::from_secs(1));
        assert_eq!(Timestamp::default(), Timestamp::zero());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&Timestamp::from_secs(1234)).unwrap();
        assert_eq!(json, "1234");
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Timestamp::from_secs(42)), "42");
        assert_eq!(format!("{:?}", Timestamp::from_secs(42)), "Timestamp(42s)");
    }
}
