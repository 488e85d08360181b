//! Quality-control value types: intervals, ranges and statuses

use crate::error::ParseError;
use crate::MeasurementKey;
use serde::{Deserialize, Serialize};

/// Closed numeric interval [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Interval {
    /// Create a new interval
    ///
    /// Bounds are not checked here; `QcRange::validate` rejects inverted ones.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check if `other` lies entirely inside this interval
    pub fn covers(&self, other: &Interval) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

/// Pass and margin thresholds for one measurement key
///
/// The margin interval widens the pass interval below, above, or on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QcRange {
    /// Measurement the range applies to
    pub key: MeasurementKey,
    /// Values considered passing
    pub pass: Interval,
    /// Values still usable with caution
    pub margin: Interval,
}

impl QcRange {
    /// Create a range
    pub fn new(key: MeasurementKey, pass: Interval, margin: Interval) -> Self {
        Self { key, pass, margin }
    }

    /// Check bounds are ordered and the margin surrounds the pass interval
    pub fn validate(&self) -> Result<(), String> {
        for (name, interval) in [("pass", &self.pass), ("margin", &self.margin)] {
            if interval.min.is_nan() || interval.max.is_nan() || interval.min > interval.max {
                return Err(format!(
                    "{} {} interval [{}, {}] is inverted or not a number",
                    self.key, name, interval.min, interval.max
                ));
            }
        }
        if !self.margin.covers(&self.pass) {
            return Err(format!(
                "{} margin interval must contain the pass interval",
                self.key
            ));
        }
        Ok(())
    }
}

/// Outcome of checking a measurement against its range
///
/// Variants are declared from least to most severe, so `Ord` gives the
/// combination precedence directly: the worst status is the maximum, and
/// `Unknown` can never win over an observed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcStatus {
    /// No data
    #[default]
    Unknown,
    /// Within the pass interval
    Pass,
    /// Outside pass but within margin
    Margin,
    /// Outside margin
    Fail,
}

impl QcStatus {
    /// Status name
    pub fn as_str(&self) -> &'static str {
        match self {
            QcStatus::Unknown => "unknown",
            QcStatus::Pass => "pass",
            QcStatus::Margin => "margin",
            QcStatus::Fail => "fail",
        }
    }

    /// Parse a status name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unknown" => Some(QcStatus::Unknown),
            "pass" => Some(QcStatus::Pass),
            "margin" => Some(QcStatus::Margin),
            "fail" => Some(QcStatus::Fail),
            _ => None,
        }
    }
}

impl std::fmt::Display for QcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QcStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}
