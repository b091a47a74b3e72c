//! Biomechanical variables with declared physical units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StructuralError;

/// Physical unit of a variable. Declared, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Radians,
    NewtonMeters,
    Newtons,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Radians => "rad",
            Self::NewtonMeters => "Nm",
            Self::Newtons => "N",
        }
    }

    /// Parse a declared unit symbol. Only the spellings below are accepted.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "rad" | "radians" => Some(Self::Radians),
            "Nm" | "N*m" | "N·m" | "newton_meters" => Some(Self::NewtonMeters),
            "N" | "newtons" => Some(Self::Newtons),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Signal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Kinematic,
    Kinetic,
}

/// A named biomechanical signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    HipFlexionAngle,
    KneeFlexionAngle,
    AnkleDorsiflexionAngle,
    PelvisTiltAngle,
    HipFlexionMoment,
    KneeFlexionMoment,
    AnkleDorsiflexionMoment,
    VerticalGroundReactionForce,
}

impl Variable {
    pub const ALL: [Variable; 8] = [
        Variable::HipFlexionAngle,
        Variable::KneeFlexionAngle,
        Variable::AnkleDorsiflexionAngle,
        Variable::PelvisTiltAngle,
        Variable::HipFlexionMoment,
        Variable::KneeFlexionMoment,
        Variable::AnkleDorsiflexionMoment,
        Variable::VerticalGroundReactionForce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HipFlexionAngle => "hip_flexion_angle",
            Self::KneeFlexionAngle => "knee_flexion_angle",
            Self::AnkleDorsiflexionAngle => "ankle_dorsiflexion_angle",
            Self::PelvisTiltAngle => "pelvis_tilt_angle",
            Self::HipFlexionMoment => "hip_flexion_moment",
            Self::KneeFlexionMoment => "knee_flexion_moment",
            Self::AnkleDorsiflexionMoment => "ankle_dorsiflexion_moment",
            Self::VerticalGroundReactionForce => "vertical_ground_reaction_force",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == label)
    }

    /// The canonical unit a column for this variable must declare.
    pub fn unit(&self) -> Unit {
        match self {
            Self::HipFlexionAngle
            | Self::KneeFlexionAngle
            | Self::AnkleDorsiflexionAngle
            | Self::PelvisTiltAngle => Unit::Radians,
            Self::HipFlexionMoment | Self::KneeFlexionMoment | Self::AnkleDorsiflexionMoment => {
                Unit::NewtonMeters
            }
            Self::VerticalGroundReactionForce => Unit::Newtons,
        }
    }

    pub fn kind(&self) -> Kind {
        match self.unit() {
            Unit::Radians => Kind::Kinematic,
            Unit::NewtonMeters | Unit::Newtons => Kind::Kinetic,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| StructuralError::UnknownVariable {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_are_kinematic_radians() {
        assert_eq!(Variable::KneeFlexionAngle.unit(), Unit::Radians);
        assert_eq!(Variable::KneeFlexionAngle.kind(), Kind::Kinematic);
        assert_eq!(Variable::KneeFlexionMoment.unit(), Unit::NewtonMeters);
        assert_eq!(Variable::VerticalGroundReactionForce.kind(), Kind::Kinetic);
    }

    #[test]
    fn unit_symbols() {
        assert_eq!(Unit::from_symbol("N*m"), Some(Unit::NewtonMeters));
        assert_eq!(Unit::from_symbol("deg"), None);
    }

    #[test]
    fn labels_round_trip() {
        for v in Variable::ALL {
            assert_eq!(v.as_str().parse::<Variable>().unwrap(), v);
        }
        assert!("knee_angle".parse::<Variable>().is_err());
    }
}
