//! Multi-criteria grading of a charge controller or inverter choice.
//!
//! Every criterion is evaluated and reported; the verdict is acceptable only
//! when all of them pass. Evaluators read nothing but their arguments, so the
//! same inputs always reproduce the same verdict.

use std::fmt;

use serde::Serialize;

pub mod controller;
pub mod inverter;

pub use controller::evaluate_controller;
pub use inverter::evaluate_inverter;

/// Cold-weather Voc rise margin for the controller voltage rating.
pub const VOC_SAFETY_MARGIN: f64 = 1.2;
/// Margin on array Isc for the controller current rating.
pub const ISC_SAFETY_MARGIN: f64 = 1.25;
/// Share of array nameplate power a controller must handle.
pub const MIN_POWER_SHARE: f64 = 0.8;
/// Motor starting draw as a multiple of running power.
pub const MOTOR_START_FACTOR: f64 = 3.0;

/// Named sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    VoltageSafety,
    CurrentRating,
    PowerCapacity,
    MpptWindow,
    AcOutput,
    SurgeCapacity,
}

impl CriterionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::VoltageSafety => "Voltage safety",
            Self::CurrentRating => "Current rating",
            Self::PowerCapacity => "Power capacity",
            Self::MpptWindow => "MPPT window",
            Self::AcOutput => "AC output",
            Self::SurgeCapacity => "Surge capacity",
        }
    }
}

/// Requirement a rated value is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Threshold {
    /// Strictly greater than `limit`.
    Above { limit: f64 },
    /// Greater than or equal to `limit`.
    AtLeast { limit: f64 },
    /// Within `[min, max]` inclusive.
    Within { min: f64, max: f64 },
}

impl Threshold {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Self::Above { limit } => value > limit,
            Self::AtLeast { limit } => value >= limit,
            Self::Within { min, max } => min <= value && value <= max,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above { limit } => write!(f, "> {limit:.2}"),
            Self::AtLeast { limit } => write!(f, ">= {limit:.2}"),
            Self::Within { min, max } => write!(f, "in [{min:.1}, {max:.1}]"),
        }
    }
}

/// Outcome of one rule, with the numbers that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub kind: CriterionKind,
    pub passed: bool,
    /// The value under test (equipment rating, or array voltage for MPPT).
    pub value: f64,
    pub threshold: Threshold,
}

impl Criterion {
    pub fn check(kind: CriterionKind, value: f64, threshold: Threshold) -> Self {
        Self {
            kind,
            passed: threshold.admits(value),
            value,
            threshold,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "PASS" } else { "FAIL" };
        write!(
            f,
            "[{mark}] {}: {:.2} {}",
            self.kind.label(),
            self.value,
            self.threshold
        )
    }
}

/// Graded equipment choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub acceptable: bool,
    pub criteria: Vec<Criterion>,
}

impl Verdict {
    /// Combines criteria; acceptable iff every one passed.
    pub fn from_criteria(criteria: Vec<Criterion>) -> Self {
        Self {
            acceptable: criteria.iter().all(|c| c.passed),
            criteria,
        }
    }

    pub fn criterion(&self, kind: CriterionKind) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.kind == kind)
    }

    pub fn failed(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| !c.passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.acceptable {
            "compatible"
        } else {
            "not compatible"
        };
        write!(f, "{status}")?;
        for c in &self.criteria {
            write!(f, "\n  {c}")?;
        }
        Ok(())
    }
}
