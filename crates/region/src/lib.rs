//! Magnetospheric region classification.
//!
//! A GSM position and a Kp value resolve to exactly one of solar wind,
//! magnetosheath or magnetosphere. See [`classify_gsm`] for the one-shot
//! entry point and [`Classifier`] to control the fast-speed solver.

pub mod classifier;
pub mod hinge;

pub use classifier::{
    Classification, Classifier, Sample, classify_all, classify_gsm, classify_inertial,
    classify_with,
};
pub use hinge::rotate_about_hinge;
pub use radmon_boundaries::{RootSearch, SolverOptions};

use std::fmt;

use radmon_boundaries::BoundaryError;
use radmon_frames::{Frame, FrameError};
use radmon_solarwind::SolarWindError;
use thiserror::Error;

/// Phenomenological region a spacecraft occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionLabel {
    SolarWind,
    Magnetosheath,
    Magnetosphere,
}

impl RegionLabel {
    pub const ALL: [RegionLabel; 3] = [
        RegionLabel::SolarWind,
        RegionLabel::Magnetosheath,
        RegionLabel::Magnetosphere,
    ];

    /// Integer code used in region tables.
    pub fn code(self) -> u8 {
        match self {
            RegionLabel::SolarWind => 1,
            RegionLabel::Magnetosheath => 2,
            RegionLabel::Magnetosphere => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        RegionLabel::ALL.into_iter().find(|label| label.code() == code)
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegionLabel::SolarWind => "solar wind",
            RegionLabel::Magnetosheath => "magnetosheath",
            RegionLabel::Magnetosphere => "magnetosphere",
        })
    }
}

/// Errors surfaced by the classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    SolarWind(#[from] SolarWindError),
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
    #[error("earth radius must be positive, got {0} km")]
    InvalidEarthRadius(f64),
    #[error("a rotation state is required to classify {0} positions")]
    MissingRotation(Frame),
}
