//! Known locomotion tasks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StructuralError;

/// A locomotion activity. Closed: labels outside this set are rejected
/// at ingestion rather than skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    LevelWalking,
    InclineWalking,
    DeclineWalking,
    StairAscent,
    StairDescent,
    Run,
    SitToStand,
}

impl Task {
    pub const ALL: [Task; 7] = [
        Task::LevelWalking,
        Task::InclineWalking,
        Task::DeclineWalking,
        Task::StairAscent,
        Task::StairDescent,
        Task::Run,
        Task::SitToStand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LevelWalking => "level_walking",
            Self::InclineWalking => "incline_walking",
            Self::DeclineWalking => "decline_walking",
            Self::StairAscent => "stair_ascent",
            Self::StairDescent => "stair_descent",
            Self::Run => "run",
            Self::SitToStand => "sit_to_stand",
        }
    }

    /// Exact match against the canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == label)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| StructuralError::UnknownTask {
            label: s.to_string(),
        })
    }
}
