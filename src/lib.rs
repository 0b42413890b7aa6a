//! Magnetospheric region classification for radiation monitoring.
//!
//! The root crate re-exports the member crates and adds the batch pieces
//! shared by front-ends: CSV sample readers and the region-table pipeline.

pub mod samples;
pub mod table;

pub use radmon_boundaries as boundaries;
pub use radmon_config as config;
pub use radmon_core as common;
pub use radmon_export as export;
pub use radmon_frames as frames;
pub use radmon_region as region;
pub use radmon_solarwind as solarwind;

pub use radmon_region::{Classification, Classifier, RegionLabel, classify_gsm};

use radmon_config::{ClassifierConfig, InputFrame, RotationConfig, SolverMethod};
use radmon_frames::{Frame, FrameError, RotationState};
use radmon_region::{RegionError, RootSearch, SolverOptions};

/// Build a classifier from a loaded configuration.
pub fn classifier_from_config(config: &ClassifierConfig) -> Result<Classifier, RegionError> {
    let method = match config.solver.method {
        SolverMethod::Bisection => RootSearch::Bisection,
        SolverMethod::Stepped => RootSearch::Stepped,
    };
    Classifier::new(SolverOptions {
        method,
        tolerance_km_s: config.solver.tolerance,
        max_iterations: config.solver.max_iterations,
    })
    .with_earth_radius_km(config.earth_radius_km)
}

/// Frame tag for positions read under `input_frame`.
pub fn frame_for(input_frame: InputFrame) -> Frame {
    match input_frame {
        InputFrame::Gsm => Frame::Gsm,
        InputFrame::Gse => Frame::Gse,
        InputFrame::Geographic => Frame::Geographic,
        InputFrame::Inertial => Frame::Inertial,
    }
}

/// Rotation state described by a configured set of angles.
pub fn rotation_from_config(rotation: &RotationConfig) -> Result<RotationState, FrameError> {
    RotationState::from_angles(
        rotation.gst_deg.to_radians(),
        rotation.sun_ra_deg.to_radians(),
        rotation.sun_dec_deg.to_radians(),
        rotation.dipole_colat_deg.to_radians(),
        rotation.dipole_lon_deg.to_radians(),
        rotation.obliquity_deg.to_radians(),
    )
}

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
