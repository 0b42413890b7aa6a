//! Frame-tagged positions and the rotations between inertial, geographic,
//! GSM and GSE frames.
//!
//! Every transform takes the [`RotationState`] for the query instant as an
//! explicit argument; nothing here computes or caches it.

pub mod position;
pub mod rotation;
pub mod spherical;
pub mod transform;

pub use position::{Frame, Position, Units};
pub use rotation::{RotationProvider, RotationState};
pub use spherical::{Spherical, from_spherical, to_spherical};
pub use transform::{from_geographic, from_gse, from_gsm, to_geographic, to_gse, to_gsm};

use thiserror::Error;

/// Errors surfaced by frame bookkeeping and transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("degenerate input: {what}")]
    DegenerateInput { what: String },
    #[error("expected a position in the {expected} frame, found {found}")]
    FrameMismatch { expected: Frame, found: Frame },
}

impl FrameError {
    pub(crate) fn degenerate(what: impl Into<String>) -> Self {
        FrameError::DegenerateInput { what: what.into() }
    }
}
