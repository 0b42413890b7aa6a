//! Per-instant rotation state supplied by the external geomagnetic field model.

use log::debug;
use radmon_core::time::Epoch;
use radmon_core::vector::{self, Matrix3, Vector3};

use crate::FrameError;

/// Source of the rotation state for a given instant.
///
/// Implemented by whatever dipole-field model the caller runs; the
/// classifier only ever consumes the returned value.
pub trait RotationProvider {
    fn rotation_state(&self, epoch: Epoch) -> Result<RotationState, FrameError>;
}

/// Rotation matrices for one instant.
///
/// Built from the Greenwich sidereal angle, the Sun direction and ecliptic
/// pole in GEI, and the dipole axis in GEO. Each matrix is orthonormal, so the
/// inverse transform is its transpose.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    gst_rad: f64,
    dipole_tilt_rad: f64,
    gei_to_geo: Matrix3,
    geo_to_gsm: Matrix3,
    gsm_to_gse: Matrix3,
}

impl RotationState {
    pub fn new(
        gst_rad: f64,
        sun_gei: Vector3,
        dipole_geo: Vector3,
        ecliptic_pole_gei: Vector3,
    ) -> Result<Self, FrameError> {
        if !gst_rad.is_finite() {
            return Err(FrameError::degenerate("non-finite sidereal angle"));
        }
        let sun = unit(&sun_gei, "Sun direction")?;
        let dipole_geo = unit(&dipole_geo, "dipole axis")?;
        let ecliptic_pole = unit(&ecliptic_pole_gei, "ecliptic pole")?;

        let (sin_g, cos_g) = gst_rad.sin_cos();
        let gei_to_geo = [
            [cos_g, sin_g, 0.0],
            [-sin_g, cos_g, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let dipole_gei = vector::mat_t_mul(&gei_to_geo, &dipole_geo);

        // GSM: x to the Sun, y perpendicular to the dipole axis.
        let gsm_y = vector::normalize(&vector::cross(&dipole_gei, &sun))
            .ok_or_else(|| FrameError::degenerate("dipole axis parallel to the Sun line"))?;
        let gsm_z = vector::cross(&sun, &gsm_y);
        let gsm_axes = [sun, gsm_y, gsm_z];

        // GSE: x to the Sun, z towards the ecliptic pole.
        let gse_y = vector::normalize(&vector::cross(&ecliptic_pole, &sun))
            .ok_or_else(|| FrameError::degenerate("ecliptic pole parallel to the Sun line"))?;
        let gse_z = vector::cross(&sun, &gse_y);
        let gse_axes = [sun, gse_y, gse_z];

        let geo_to_gsm = gsm_axes.map(|axis| vector::mat_mul(&gei_to_geo, &axis));
        let gsm_to_gse = gse_axes.map(|gse| gsm_axes.map(|gsm| vector::dot(&gse, &gsm)));
        let dipole_tilt_rad = vector::dot(&dipole_gei, &sun).clamp(-1.0, 1.0).asin();

        debug!(
            "rotation state: gst = {:.6} rad, dipole tilt = {:.4} deg",
            gst_rad,
            dipole_tilt_rad.to_degrees()
        );

        Ok(RotationState {
            gst_rad,
            dipole_tilt_rad,
            gei_to_geo,
            geo_to_gsm,
            gsm_to_gse,
        })
    }

    /// Build the state from angles: Sun right ascension/declination, dipole
    /// pole colatitude/east longitude in GEO, and the obliquity of the ecliptic.
    pub fn from_angles(
        gst_rad: f64,
        sun_ra_rad: f64,
        sun_dec_rad: f64,
        dipole_colat_rad: f64,
        dipole_lon_rad: f64,
        obliquity_rad: f64,
    ) -> Result<Self, FrameError> {
        let sun = [
            sun_dec_rad.cos() * sun_ra_rad.cos(),
            sun_dec_rad.cos() * sun_ra_rad.sin(),
            sun_dec_rad.sin(),
        ];
        let dipole = [
            dipole_colat_rad.sin() * dipole_lon_rad.cos(),
            dipole_colat_rad.sin() * dipole_lon_rad.sin(),
            dipole_colat_rad.cos(),
        ];
        let pole = [0.0, -obliquity_rad.sin(), obliquity_rad.cos()];
        RotationState::new(gst_rad, sun, dipole, pole)
    }

    pub fn gst_rad(&self) -> f64 {
        self.gst_rad
    }

    /// Angle between the dipole axis and the GSM z axis; positive when the
    /// northern magnetic pole tilts towards the Sun.
    pub fn dipole_tilt_rad(&self) -> f64 {
        self.dipole_tilt_rad
    }

    pub(crate) fn gei_to_geo(&self) -> &Matrix3 {
        &self.gei_to_geo
    }

    pub(crate) fn geo_to_gsm(&self) -> &Matrix3 {
        &self.geo_to_gsm
    }

    pub(crate) fn gsm_to_gse(&self) -> &Matrix3 {
        &self.gsm_to_gse
    }
}

/// A fixed state answers every epoch; handy when a batch shares one instant.
impl RotationProvider for RotationState {
    fn rotation_state(&self, _epoch: Epoch) -> Result<RotationState, FrameError> {
        Ok(self.clone())
    }
}

fn unit(v: &Vector3, what: &str) -> Result<Vector3, FrameError> {
    if !vector::is_finite(v) {
        return Err(FrameError::degenerate(format!("non-finite {what}")));
    }
    vector::normalize(v).ok_or_else(|| FrameError::degenerate(format!("zero-length {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_orthonormal(m: &Matrix3) -> bool {
        (0..3).all(|i| {
            (0..3).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (vector::dot(&m[i], &m[j]) - expected).abs() < 1e-12
            })
        })
    }

    #[test]
    fn matrices_are_orthonormal() {
        let state = RotationState::from_angles(
            1.3,
            0.4,
            0.15,
            9.5_f64.to_radians(),
            -72.0_f64.to_radians(),
            23.44_f64.to_radians(),
        )
        .unwrap();
        assert!(is_orthonormal(state.gei_to_geo()));
        assert!(is_orthonormal(state.geo_to_gsm()));
        assert!(is_orthonormal(state.gsm_to_gse()));
    }

    #[test]
    fn dipole_along_sun_line_is_degenerate() {
        let err = RotationState::new(0.0, [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, FrameError::DegenerateInput { .. }));
    }

    #[test]
    fn tilt_is_zero_for_dipole_perpendicular_to_sun() {
        let state =
            RotationState::new(0.0, [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]).unwrap();
        assert!(state.dipole_tilt_rad().abs() < 1e-15);
    }
}
