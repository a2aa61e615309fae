//! Time codes and the seconds → time code mapping.
//!
//! The stage samples attributes in its own unit (time codes). A session captures
//! the stage's time codes per second once, at open, and converts every caller
//! supplied time in seconds through a [`TimeMapping`].

use crate::util::Chrono;

/// Default rate used by freshly created stages.
pub const DEFAULT_TIME_CODES_PER_SECOND: f64 = 24.0;

/// A point on the stage's time axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeCode {
    /// The non-animated ("default") value slot.
    Default,
    /// A sampled time, in time codes.
    Time(f64),
}

impl TimeCode {
    /// Check if this is the default time code.
    #[inline]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// The numeric value, or None for the default time code.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Default => None,
            Self::Time(t) => Some(*t),
        }
    }
}

impl Default for TimeCode {
    fn default() -> Self {
        Self::Default
    }
}

impl From<f64> for TimeCode {
    fn from(t: f64) -> Self {
        Self::Time(t)
    }
}

/// Stateless conversion between seconds and time codes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeMapping {
    samples_per_second: f64,
}

impl TimeMapping {
    /// Create a mapping for the given rate.
    pub const fn new(samples_per_second: f64) -> Self {
        Self { samples_per_second }
    }

    /// Samples (time codes) per second.
    #[inline]
    pub fn samples_per_second(&self) -> f64 {
        self.samples_per_second
    }

    /// `seconds * samples_per_second`, no clamping.
    #[inline]
    pub fn to_time_code(&self, seconds: Chrono) -> TimeCode {
        TimeCode::Time(seconds * self.samples_per_second)
    }

    /// Inverse of [`Self::to_time_code`]; the default time code maps to 0.
    #[inline]
    pub fn to_seconds(&self, code: TimeCode) -> Chrono {
        match code {
            TimeCode::Default => 0.0,
            TimeCode::Time(t) => t / self.samples_per_second,
        }
    }
}

impl Default for TimeMapping {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_CODES_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_time_code() {
        let m = TimeMapping::new(24.0);
        assert_eq!(m.to_time_code(1.0), TimeCode::Time(24.0));
        assert_eq!(m.to_time_code(0.5), TimeCode::Time(12.0));
        // No clamping for negative times.
        assert_eq!(m.to_time_code(-1.0), TimeCode::Time(-24.0));
    }

    #[test]
    fn test_round_trip() {
        let m = TimeMapping::new(30.0);
        let t = 1.25;
        assert!((m.to_seconds(m.to_time_code(t)) - t).abs() < 1e-12);
        assert_eq!(m.to_seconds(TimeCode::Default), 0.0);
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(TimeMapping::default().samples_per_second(), 24.0);
        assert!(TimeCode::default().is_default());
        assert_eq!(TimeCode::from(3.0).value(), Some(3.0));
    }
}
