//! Cartesian ↔ spherical (radius, colatitude, azimuth) conversion.

use crate::{Frame, FrameError, Position, Units};

/// Spherical form of a [`Position`]; angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    /// Angle from the +z axis, in [0, 180].
    pub colatitude_deg: f64,
    /// Angle from +x towards +y, in (−180, 180].
    pub azimuth_deg: f64,
    pub units: Units,
}

/// Convert a Cartesian position to spherical coordinates.
///
/// The origin has no direction and is reported as `DegenerateInput`.
pub fn to_spherical(position: &Position) -> Result<Spherical, FrameError> {
    let radius = position.radius();
    if radius == 0.0 {
        return Err(FrameError::degenerate(format!(
            "{} position at the origin has no direction",
            position.frame()
        )));
    }
    let colatitude_deg = (position.z() / radius).clamp(-1.0, 1.0).acos().to_degrees();
    let mut azimuth_deg = position.y().atan2(position.x()).to_degrees();
    if azimuth_deg <= -180.0 {
        azimuth_deg += 360.0;
    }
    Ok(Spherical {
        radius,
        colatitude_deg,
        azimuth_deg,
        units: position.units(),
    })
}

/// Rebuild a Cartesian position in `frame` from spherical coordinates.
pub fn from_spherical(frame: Frame, spherical: &Spherical) -> Result<Position, FrameError> {
    let (sin_t, cos_t) = spherical.colatitude_deg.to_radians().sin_cos();
    let (sin_p, cos_p) = spherical.azimuth_deg.to_radians().sin_cos();
    let r = spherical.radius;
    Position::new(
        frame,
        spherical.units,
        [r * sin_t * cos_p, r * sin_t * sin_p, r * cos_t],
    )
}
