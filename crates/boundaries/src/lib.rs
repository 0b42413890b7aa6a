//! Empirical magnetospheric boundary models.
//!
//! - [`magnetopause`]: pressure-scaled ellipsoid/cylinder surface (T96_01 form).
//! - [`fast`]: local fast magnetosonic speed for the bow-shock flaring term.
//! - [`bow_shock`]: Mach-dependent conic bow shock (Bennett et al. 1997).

pub mod bow_shock;
pub mod fast;
pub mod magnetopause;

pub use bow_shock::{BowShockModel, BowShockRadius, PlasmaSpeeds, bow_shock_radius};
pub use fast::{
    FastSpeed, FastSpeedError, FastSpeedInputs, RootSearch, SolverOptions,
    fast_magnetosonic_speed,
};
pub use magnetopause::{
    MagnetopauseGeometry, MagnetopauseResult, PressureDriver, locate_magnetopause,
    locate_magnetopause_with,
};

use radmon_frames::FrameError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("dynamic pressure must be positive and finite, got {0} nPa")]
    InvalidPressure(f64),
    #[error("invalid plasma parameters: {0}")]
    InvalidPlasma(String),
    #[error("fast magnetosonic solver failed: {0}")]
    FastSpeed(#[from] FastSpeedError),
    #[error("solar wind is not super-magnetosonic (fast Mach number {mach:.3})")]
    SubMagnetosonic { mach: f64 },
}
