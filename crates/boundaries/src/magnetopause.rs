//! Pressure-dependent magnetopause.
//!
//! The surface is an ellipsoid of revolution about the x axis on the dayside,
//! joined at `x = x0 - a` to a cylinder of radius `a·sqrt(s0² - 1)` downtail
//! (Tsyganenko 1989; T96_01 parameters). All lengths scale with
//! `(pd / 2 nPa)^-0.14`.

use log::debug;
use radmon_frames::{Frame, FrameError, Position, Units};
use radmon_solarwind::SolarWindState;

use crate::BoundaryError;

/// Pressure at which the reference geometry applies (nPa).
pub const REFERENCE_PRESSURE_NPA: f64 = 2.0;
const PRESSURE_EXPONENT: f64 = 0.14;
const A0_RE: f64 = 70.0;
const S00: f64 = 1.08;
const X00_RE: f64 = 5.48;
/// nPa per (cm⁻³ · (km/s)²) for a proton plasma.
const RAM_PRESSURE_FACTOR: f64 = 1.94e-6;

/// What sets the solar wind ram pressure on the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressureDriver {
    /// Dynamic pressure in nPa.
    DynamicPressure(f64),
    /// Proton density (cm⁻³) and bulk speed (km/s).
    DensityVelocity { density_cm3: f64, speed_km_s: f64 },
}

impl PressureDriver {
    pub fn pressure_npa(&self) -> f64 {
        match *self {
            PressureDriver::DynamicPressure(pd) => pd,
            PressureDriver::DensityVelocity {
                density_cm3,
                speed_km_s,
            } => RAM_PRESSURE_FACTOR * density_cm3 * speed_km_s * speed_km_s,
        }
    }
}

/// Magnetopause shape parameters scaled to a given pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetopauseGeometry {
    /// Semi-major axis (Re).
    pub a: f64,
    /// Elliptic coordinate of the surface; not pressure scaled.
    pub s0: f64,
    /// Ellipse centre offset (Re).
    pub x0: f64,
}

impl MagnetopauseGeometry {
    pub fn scaled(driver: PressureDriver) -> Result<Self, BoundaryError> {
        let pd = driver.pressure_npa();
        if !(pd.is_finite() && pd > 0.0) {
            return Err(BoundaryError::InvalidPressure(pd));
        }
        let rat16 = (pd / REFERENCE_PRESSURE_NPA).powf(PRESSURE_EXPONENT);
        Ok(MagnetopauseGeometry {
            a: A0_RE / rat16,
            s0: S00,
            x0: X00_RE / rat16,
        })
    }

    /// x of the seam between the ellipsoid and the tail cylinder.
    pub fn seam_x(&self) -> f64 {
        self.x0 - self.a
    }

    /// Sub-solar standoff distance (Re).
    pub fn nose_x(&self) -> f64 {
        self.x0 + self.a * (self.s0 - 1.0)
    }

    /// Radius of the tail cylinder (Re).
    pub fn tail_radius(&self) -> f64 {
        self.a * (self.s0 * self.s0 - 1.0).sqrt()
    }
}

/// Nearest boundary point, distance to it, and containment flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetopauseResult {
    /// Closest point on the surface, in the query's frame and in Re.
    pub nearest: Position,
    /// Distance from the query to `nearest` (Re).
    pub distance: f64,
    pub inside: bool,
}

/// Locate the magnetopause relative to `position` for the state's dynamic pressure.
pub fn locate_magnetopause(
    position: &Position,
    state: &SolarWindState,
) -> Result<MagnetopauseResult, BoundaryError> {
    locate_magnetopause_with(
        position,
        PressureDriver::DynamicPressure(state.dynamic_pressure_npa),
    )
}

/// Locate the magnetopause relative to `position` for an explicit pressure driver.
///
/// Accepts GSM positions and their aberration-rotated variant.
pub fn locate_magnetopause_with(
    position: &Position,
    driver: PressureDriver,
) -> Result<MagnetopauseResult, BoundaryError> {
    if !matches!(position.frame(), Frame::Gsm | Frame::BowShockAligned) {
        return Err(FrameError::FrameMismatch {
            expected: Frame::Gsm,
            found: position.frame(),
        }
        .into());
    }
    let geometry = MagnetopauseGeometry::scaled(driver)?;
    let p = position.in_earth_radii();
    let (x, y, z) = (p.x(), p.y(), p.z());
    let MagnetopauseGeometry { a, s0, x0 } = geometry;

    // Azimuth measured from +z towards +y; on-axis points default to 0.
    let phi = if y != 0.0 || z != 0.0 { y.atan2(z) } else { 0.0 };
    let rho = y.hypot(z);

    let (x_mp, rho_mp, inside) = if x < geometry.seam_x() {
        let rho_mp = geometry.tail_radius();
        (x, rho_mp, rho_mp >= rho)
    } else {
        let xksi = (x - x0) / a + 1.0;
        let xdzt = rho / a;
        let sq1 = (1.0 + xksi).hypot(xdzt);
        let sq2 = (1.0 - xksi).hypot(xdzt);
        let sigma = 0.5 * (sq1 + sq2);
        // sq1² - sq2² = 4·xksi, so the difference needs no subtraction.
        let tau = 2.0 * xksi / (sq1 + sq2);
        let x_mp = x0 - a * (1.0 - s0 * tau);
        let rho_mp = a * ((s0 * s0 - 1.0) * (1.0 - tau * tau)).max(0.0).sqrt();
        (x_mp, rho_mp, sigma <= s0)
    };

    let nearest = Position::new(
        p.frame(),
        Units::EarthRadii,
        [x_mp, rho_mp * phi.sin(), rho_mp * phi.cos()],
    )?;
    let distance = (x - x_mp).hypot(y - nearest.y()).hypot(z - nearest.z());

    debug!(
        "magnetopause: query ({x:.3}, {y:.3}, {z:.3}) Re, nearest x = {x_mp:.3}, rho = {rho_mp:.3}, inside = {inside}"
    );

    Ok(MagnetopauseResult {
        nearest,
        distance,
        inside,
    })
}
