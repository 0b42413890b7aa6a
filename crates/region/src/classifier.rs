use log::debug;
use radmon_boundaries::{
    BowShockModel, BowShockRadius, MagnetopauseResult, SolverOptions, locate_magnetopause,
};
use radmon_core::constants::EARTH_RADIUS_KM;
use radmon_core::time::Epoch;
use radmon_frames::{
    Frame, FrameError, Position, RotationProvider, Units, from_gse, to_geographic, to_gsm,
};
use radmon_solarwind::{SolarWindState, solar_wind_state};

use crate::hinge::rotate_about_hinge;
use crate::{RegionError, RegionLabel};

/// Outcome of one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: RegionLabel,
    /// Query position in GSM, Re.
    pub gsm: Position,
    /// Query position after the aberration rotation (bow-shock frame, Re).
    pub rotated: Position,
    pub magnetopause: MagnetopauseResult,
    /// Only evaluated when the position is outside the magnetopause.
    pub bow_shock: Option<BowShockRadius>,
    pub solar_wind: SolarWindState,
}

/// One GSM query in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub epoch: Epoch,
    pub position: Position,
    pub kp: f64,
}

/// Classifier settings. Holds no per-query state and is freely shared
/// between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    solver: SolverOptions,
    earth_radius_km: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            solver: SolverOptions::default(),
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl Classifier {
    pub fn new(solver: SolverOptions) -> Self {
        Classifier {
            solver,
            ..Classifier::default()
        }
    }

    /// Earth radius used when converting kilometre positions.
    pub fn with_earth_radius_km(mut self, earth_radius_km: f64) -> Result<Self, RegionError> {
        if !(earth_radius_km.is_finite() && earth_radius_km > 0.0) {
            return Err(RegionError::InvalidEarthRadius(earth_radius_km));
        }
        self.earth_radius_km = earth_radius_km;
        Ok(self)
    }

    pub fn solver(&self) -> &SolverOptions {
        &self.solver
    }

    pub fn earth_radius_km(&self) -> f64 {
        self.earth_radius_km
    }

    /// Classify a GSM position for a raw Kp value.
    pub fn classify(&self, position: &Position, kp: f64) -> Result<Classification, RegionError> {
        let state = solar_wind_state(kp)?;
        self.classify_in(position, &state)
    }

    /// Classify a GSM position under explicit solar wind conditions.
    pub fn classify_in(
        &self,
        position: &Position,
        state: &SolarWindState,
    ) -> Result<Classification, RegionError> {
        position.require(Frame::Gsm)?;
        let gsm = self.to_earth_radii(position)?;
        let rotated = rotate_about_hinge(&gsm, state.aberration_deg, state.hinge_re)?;

        let magnetopause = locate_magnetopause(&rotated, state)?;
        let (label, bow_shock) = if magnetopause.inside {
            (RegionLabel::Magnetosphere, None)
        } else {
            let radius = BowShockModel::new(state, &self.solver)?.radius(&rotated)?;
            let label = if radius.contains(rotated.cylindrical_radius()) {
                RegionLabel::Magnetosheath
            } else {
                RegionLabel::SolarWind
            };
            (label, Some(radius))
        };

        debug!(
            "kp {:.3}: ({:.3}, {:.3}, {:.3}) Re -> {label}",
            state.activity.value(),
            gsm.x(),
            gsm.y(),
            gsm.z()
        );

        Ok(Classification {
            label,
            gsm,
            rotated,
            magnetopause,
            bow_shock,
            solar_wind: *state,
        })
    }

    /// Classify an inertial, geographic or GSE position at `epoch`, taking
    /// the frame rotations from `provider`. GSM positions pass straight through.
    pub fn classify_inertial<R>(
        &self,
        epoch: Epoch,
        position: &Position,
        kp: f64,
        provider: &R,
    ) -> Result<Classification, RegionError>
    where
        R: RotationProvider + ?Sized,
    {
        let gsm = match position.frame() {
            Frame::Inertial => {
                let state = provider.rotation_state(epoch)?;
                to_gsm(&to_geographic(position, &state)?, &state)?
            }
            Frame::Geographic => to_gsm(position, &provider.rotation_state(epoch)?)?,
            Frame::Gse => from_gse(position, &provider.rotation_state(epoch)?)?,
            Frame::Gsm => *position,
            found => {
                return Err(FrameError::FrameMismatch {
                    expected: Frame::Inertial,
                    found,
                }
                .into());
            }
        };
        self.classify(&gsm, kp)
    }

    /// Classify every sample independently; failures do not stop the batch.
    pub fn classify_all(&self, samples: &[Sample]) -> Vec<Result<Classification, RegionError>> {
        samples
            .iter()
            .map(|sample| self.classify(&sample.position, sample.kp))
            .collect()
    }

    fn to_earth_radii(&self, position: &Position) -> Result<Position, RegionError> {
        match position.units() {
            Units::EarthRadii => Ok(*position),
            Units::Kilometres => Ok(Position::new(
                position.frame(),
                Units::EarthRadii,
                position.components().map(|c| c / self.earth_radius_km),
            )?),
        }
    }
}

/// Classify a GSM position with the default solver.
pub fn classify_gsm(position: &Position, kp: f64) -> Result<Classification, RegionError> {
    Classifier::default().classify(position, kp)
}

pub fn classify_with(
    position: &Position,
    kp: f64,
    classifier: &Classifier,
) -> Result<Classification, RegionError> {
    classifier.classify(position, kp)
}

/// Inertial or geographic position to region, with the default solver.
pub fn classify_inertial<R>(
    epoch: Epoch,
    position: &Position,
    kp: f64,
    provider: &R,
) -> Result<Classification, RegionError>
where
    R: RotationProvider + ?Sized,
{
    Classifier::default().classify_inertial(epoch, position, kp, provider)
}

pub fn classify_all(
    samples: &[Sample],
    classifier: &Classifier,
) -> Vec<Result<Classification, RegionError>> {
    classifier.classify_all(samples)
}
