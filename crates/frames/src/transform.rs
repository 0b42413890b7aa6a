//! Rotations between GEI, GEO, GSM and GSE.
//!
//! Each forward transform checks the source frame and applies the matching
//! matrix from the [`RotationState`]; its inverse applies the transpose.

use radmon_core::vector::{self, Matrix3};

use crate::{Frame, FrameError, Position, RotationState};

/// GEI → GEO.
pub fn to_geographic(inertial: &Position, state: &RotationState) -> Result<Position, FrameError> {
    forward(inertial, Frame::Inertial, Frame::Geographic, state.gei_to_geo())
}

/// GEO → GEI.
pub fn from_geographic(geographic: &Position, state: &RotationState) -> Result<Position, FrameError> {
    inverse(geographic, Frame::Geographic, Frame::Inertial, state.gei_to_geo())
}

/// GEO → GSM.
pub fn to_gsm(geographic: &Position, state: &RotationState) -> Result<Position, FrameError> {
    forward(geographic, Frame::Geographic, Frame::Gsm, state.geo_to_gsm())
}

/// GSM → GEO.
pub fn from_gsm(gsm: &Position, state: &RotationState) -> Result<Position, FrameError> {
    inverse(gsm, Frame::Gsm, Frame::Geographic, state.geo_to_gsm())
}

/// GSM → GSE.
pub fn to_gse(gsm: &Position, state: &RotationState) -> Result<Position, FrameError> {
    forward(gsm, Frame::Gsm, Frame::Gse, state.gsm_to_gse())
}

/// GSE → GSM.
pub fn from_gse(gse: &Position, state: &RotationState) -> Result<Position, FrameError> {
    inverse(gse, Frame::Gse, Frame::Gsm, state.gsm_to_gse())
}

fn forward(
    position: &Position,
    from: Frame,
    to: Frame,
    matrix: &Matrix3,
) -> Result<Position, FrameError> {
    position.require(from)?;
    position.with_frame(to, vector::mat_mul(matrix, &position.components()))
}

fn inverse(
    position: &Position,
    from: Frame,
    to: Frame,
    matrix: &Matrix3,
) -> Result<Position, FrameError> {
    position.require(from)?;
    position.with_frame(to, vector::mat_t_mul(matrix, &position.components()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Units;

    fn equinox_state() -> RotationState {
        // Sun on the GEI x axis, dipole on the GEO z axis, GST = 0.
        RotationState::new(0.0, [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn aligned_state_is_identity() {
        let state = equinox_state();
        let p = Position::inertial_km(7_000.0, -1_200.0, 300.0).unwrap();
        let geo = to_geographic(&p, &state).unwrap();
        let gsm = to_gsm(&geo, &state).unwrap();
        let gse = to_gse(&gsm, &state).unwrap();
        assert_eq!(gse.frame(), Frame::Gse);
        assert_eq!(gse.units(), Units::Kilometres);
        for (a, b) in p.components().iter().zip(gse.components()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn sidereal_rotation_moves_x_to_negative_y() {
        let gst = std::f64::consts::FRAC_PI_2;
        let state =
            RotationState::new(gst, [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]).unwrap();
        let p = Position::inertial_km(1.0, 0.0, 0.0).unwrap();
        let geo = to_geographic(&p, &state).unwrap();
        assert!(geo.x().abs() < 1e-12);
        assert!((geo.y() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_source_frame_is_rejected() {
        let state = equinox_state();
        let gsm = Position::gsm_re(1.0, 2.0, 3.0).unwrap();
        assert_eq!(
            to_geographic(&gsm, &state).unwrap_err(),
            FrameError::FrameMismatch {
                expected: Frame::Inertial,
                found: Frame::Gsm
            }
        );
    }
}
