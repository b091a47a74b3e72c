//! Normalized gait-cycle phase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{REPRESENTATIVE_PHASE_PERCENTS, SAMPLES_PER_CYCLE};
use crate::errors::StructuralError;

/// Integer percentage of the gait cycle, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Phase(u8);

impl Phase {
    pub fn new(percent: u8) -> Option<Self> {
        (percent <= 100).then_some(Self(percent))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// The phases consulted by the classifier: 0, 25, 50, 75%.
    pub fn representative() -> [Phase; 4] {
        REPRESENTATIVE_PHASE_PERCENTS.map(Phase)
    }

    pub fn is_representative(&self) -> bool {
        REPRESENTATIVE_PHASE_PERCENTS.contains(&self.0)
    }

    /// Index of this phase on the 150-point grid: `floor(pct * 150 / 100)`,
    /// clamped to the last sample for 100%.
    pub fn sample_index(&self) -> usize {
        let idx = (self.0 as usize * SAMPLES_PER_CYCLE) / 100;
        idx.min(SAMPLES_PER_CYCLE - 1)
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Phase::new(value).ok_or_else(|| format!("phase {value} is outside 0..=100"))
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        phase.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Phase {
    type Err = StructuralError;

    /// Accepts `"50"` or `"50%"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_suffix('%').unwrap_or(s);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Phase::new)
            .ok_or_else(|| StructuralError::InvalidPhase {
                phase: s.to_string(),
            })
    }
}
