//! Integer millisecond time values.
//!
//! All timeline arithmetic happens in whole milliseconds so that summing many
//! scene durations never drifts. On the wire a [`Millis`] is written as
//! fractional seconds, which is what the render engine expects.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative point or span on the timeline, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Create from a whole number of milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create from whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Convert fractional seconds, rounding half away from zero.
    ///
    /// Returns `None` for NaN, infinities, negative values and values that do
    /// not fit in a `u64` millisecond count.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let ms = (secs * 1000.0).round();
        if ms >= u64::MAX as f64 {
            return None;
        }
        Some(Self(ms as u64))
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_sub(self, other: Millis) -> Millis {
        Millis(self.0.saturating_sub(other.0))
    }

    pub const fn saturating_add(self, other: Millis) -> Millis {
        Millis(self.0.saturating_add(other.0))
    }

    pub const fn checked_add(self, other: Millis) -> Option<Millis> {
        match self.0.checked_add(other.0) {
            Some(ms) => Some(Millis(ms)),
            None => None,
        }
    }

    pub const fn checked_sub(self, other: Millis) -> Option<Millis> {
        match self.0.checked_sub(other.0) {
            Some(ms) => Some(Millis(ms)),
            None => None,
        }
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0 + rhs.0)
    }
}

impl AddAssign for Millis {
    fn add_assign(&mut self, rhs: Millis) {
        self.0 += rhs.0;
    }
}

impl Sum for Millis {
    fn sum<I: Iterator<Item = Millis>>(iter: I) -> Millis {
        iter.fold(Millis::ZERO, Add::add)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs_f64())
    }
}

impl Serialize for Millis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Millis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Millis::from_secs_f64(secs)
            .ok_or_else(|| D::Error::custom(format!("invalid time value: {}", secs)))
    }
}

impl JsonSchema for Millis {
    fn schema_name() -> String {
        "Seconds".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        f64::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs_f64_rounds() {
        assert_eq!(Millis::from_secs_f64(1.5), Some(Millis::from_millis(1500)));
        assert_eq!(Millis::from_secs_f64(0.0004), Some(Millis::ZERO));
        assert_eq!(Millis::from_secs_f64(0.0005), Some(Millis::from_millis(1)));
        assert_eq!(Millis::from_secs_f64(-1.0), None);
        assert_eq!(Millis::from_secs_f64(f64::NAN), None);
        assert_eq!(Millis::from_secs_f64(f64::INFINITY), None);
        assert_eq!(Millis::from_secs_f64(1.8446744073709552e16), None);
    }

    #[test]
    fn test_sum_is_exact() {
        // 0.1s added 1000 times drifts in f64 but not in integer millis.
        let total: Millis = (0..1000).map(|_| Millis::from_secs_f64(0.1).unwrap()).sum();
        assert_eq!(total, Millis::from_secs(100));
    }

    #[test]
    fn test_serializes_as_seconds() {
        let json = serde_json::to_string(&Millis::from_millis(14500)).unwrap();
        assert_eq!(json, "14.5");

        let back: Millis = serde_json::from_str("0.3").unwrap();
        assert_eq!(back, Millis::from_millis(300));
        assert!(serde_json::from_str::<Millis>("-2").is_err());
    }

    #[test]
    fn test_saturating_sub() {
        let a = Millis::from_millis(300);
        let b = Millis::from_millis(500);
        assert_eq!(a.saturating_sub(b), Millis::ZERO);
        assert_eq!(b.checked_sub(a), Some(Millis::from_millis(200)));
        assert_eq!(a.checked_sub(b), None);
    }
}
