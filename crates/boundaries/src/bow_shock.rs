//! Bow shock cylindrical radius (Bennett et al. 1997).
//!
//! The base shape is the Greenstadt hyperboloid `rho² = a·x² - b·x + c`,
//! scaled by `(n̄·v̄² / n·v²)^(1/6)` for dynamic pressure, then widened or
//! narrowed by the difference in Mach-cone flaring between the prevailing
//! and average fast magnetosonic Mach numbers.

use std::f64::consts::PI;

use log::debug;
use radmon_core::constants::{ERG_PER_EV, PROTON_MASS_G};
use radmon_core::units::{kelvin_to_ev, km_s_to_cm_s, nt_to_gauss};
use radmon_frames::{Frame, Position};
use radmon_solarwind::SolarWindState;

use crate::BoundaryError;
use crate::fast::{FastSpeedInputs, SolverOptions, fast_magnetosonic_speed};

const ECCENTRICITY: f64 = 1.0040;
const LATUS_RECTUM_RE: f64 = 22.073117134;
const FOCUS_RE: f64 = 3.493725046;
const NOSE_RE: f64 = 14.422071657;

const AVERAGE_DENSITY_CM3: f64 = 7.0;
const AVERAGE_SPEED_KM_S: f64 = 430.0;
const AVERAGE_ALFVEN_MACH: f64 = 9.4;
const AVERAGE_SONIC_MACH: f64 = 7.2;
const AVERAGE_SPEED_CM_S: f64 = 4.3e7;

/// Characteristic speeds of the upstream plasma (cm/s) and the Mach numbers they imply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlasmaSpeeds {
    pub alfven_cm_s: f64,
    pub sound_cm_s: f64,
    pub bulk_cm_s: f64,
}

impl PlasmaSpeeds {
    /// Alfvén and sound speeds after Slavin & Holzer (1981).
    pub fn from_state(state: &SolarWindState) -> Result<Self, BoundaryError> {
        let density = state.proton_density_cm3;
        let helium = state.helium_fraction;
        if !(density > 0.0) {
            return Err(BoundaryError::InvalidPlasma(format!(
                "proton density must be positive, got {density}"
            )));
        }
        let mass_density = density * PROTON_MASS_G * (1.0 + 4.0 * helium);
        let b_gauss = nt_to_gauss(state.imf_magnitude_nt());

        let electron_ev = kelvin_to_ev(state.electron_temp_k);
        let proton_ev = kelvin_to_ev(state.proton_temp_k);
        let helium_ev = kelvin_to_ev(state.helium_temp_k);
        let pressure = density
            * (2.0 * helium * electron_ev + (1.0 + helium * helium_ev) * proton_ev)
            * ERG_PER_EV;

        Ok(PlasmaSpeeds {
            alfven_cm_s: b_gauss / (4.0 * PI * mass_density).sqrt(),
            sound_cm_s: (2.0 * pressure / mass_density).sqrt(),
            bulk_cm_s: km_s_to_cm_s(state.bulk_speed_km_s()),
        })
    }

    pub fn alfven_mach(&self) -> f64 {
        self.bulk_cm_s / self.alfven_cm_s
    }

    pub fn sonic_mach(&self) -> f64 {
        self.bulk_cm_s / self.sound_cm_s
    }

    /// Fast Mach number for propagation perpendicular to the field.
    pub fn perpendicular_fast_mach(&self) -> f64 {
        self.bulk_cm_s / self.alfven_cm_s.hypot(self.sound_cm_s)
    }
}

/// Cylindrical bow shock radius at some downtail distance (Re, never negative).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BowShockRadius(f64);

impl BowShockRadius {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether a point `distance` Re off the tail axis is behind the shock.
    /// A zero radius means the cross-section lies upstream of the nose.
    pub fn contains(&self, distance: f64) -> bool {
        self.0 > 0.0 && distance <= self.0
    }
}

/// Bow shock for fixed solar wind conditions; only the downtail distance varies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowShockModel {
    a: f64,
    b: f64,
    c: f64,
    /// Sunward root of the base conic; the far sheet beyond it is not part of the shock.
    conic_root_re: f64,
    nose_re: f64,
    pressure_scale: f64,
    flaring: f64,
    speeds: PlasmaSpeeds,
    fast_mach: f64,
}

impl BowShockModel {
    pub fn new(state: &SolarWindState, options: &SolverOptions) -> Result<Self, BoundaryError> {
        let speeds = PlasmaSpeeds::from_state(state)?;
        let bulk_km_s = state.bulk_speed_km_s();

        let pressure_scale = ((AVERAGE_DENSITY_CM3 * AVERAGE_SPEED_KM_S * AVERAGE_SPEED_KM_S)
            / (state.proton_density_cm3 * bulk_km_s * bulk_km_s))
            .powf(1.0 / 6.0);
        let latus = LATUS_RECTUM_RE * pressure_scale;
        let focus = FOCUS_RE * pressure_scale;
        let e2m1 = ECCENTRICITY * ECCENTRICITY - 1.0;

        let fast = fast_magnetosonic_speed(
            &FastSpeedInputs {
                alfven_cm_s: speeds.alfven_cm_s,
                sound_cm_s: speeds.sound_cm_s,
                bulk_cm_s: speeds.bulk_cm_s,
                imf_nt: state.imf_nt,
                angle_rad: state.bow_shock_angle_rad,
            },
            options,
        )?;
        let fast_mach = speeds.bulk_cm_s / fast.speed_cm_s;
        if !(fast_mach > 1.0) {
            return Err(BoundaryError::SubMagnetosonic { mach: fast_mach });
        }
        let theta1 = (1.0 / fast_mach).asin();
        let flaring = theta1.tan() - average_flaring_angle().tan();

        debug!(
            "bow shock: va = {:.4e} cm/s, cs = {:.4e} cm/s, Mf = {fast_mach:.3}, pressure scale = {pressure_scale:.4}",
            speeds.alfven_cm_s, speeds.sound_cm_s
        );

        let a = e2m1;
        let b = 2.0 * ECCENTRICITY * latus + 2.0 * e2m1 * focus;
        let c = latus * latus + 2.0 * ECCENTRICITY * latus * focus + e2m1 * focus * focus;
        let discriminant = b * b - 4.0 * a * c;
        let conic_root_re = if discriminant >= 0.0 {
            2.0 * c / (b + discriminant.sqrt())
        } else {
            f64::INFINITY
        };

        Ok(BowShockModel {
            a,
            b,
            c,
            conic_root_re,
            nose_re: NOSE_RE * pressure_scale,
            pressure_scale,
            flaring,
            speeds,
            fast_mach,
        })
    }

    pub fn speeds(&self) -> &PlasmaSpeeds {
        &self.speeds
    }

    /// Prevailing fast magnetosonic Mach number at the evaluation angle.
    pub fn fast_mach(&self) -> f64 {
        self.fast_mach
    }

    pub fn pressure_scale(&self) -> f64 {
        self.pressure_scale
    }

    /// Pressure-scaled nose distance (Re).
    pub fn nose_re(&self) -> f64 {
        self.nose_re
    }

    /// Sunward end of the shock surface (Re).
    pub fn conic_root_re(&self) -> f64 {
        self.conic_root_re
    }

    /// Radius at downtail distance `x` (Re). Zero sunward of the conic root.
    pub fn radius_at(&self, x: f64) -> BowShockRadius {
        if x >= self.conic_root_re {
            return BowShockRadius(0.0);
        }
        let base = if x.abs() > 1.0 {
            // Factored form; a·x² overflows long before the radius does.
            x.abs() * (self.a - self.b / x + self.c / (x * x)).max(0.0).sqrt()
        } else {
            (self.a * x * x - self.b * x + self.c).max(0.0).sqrt()
        };
        let radius = base + (self.nose_re - x) * self.flaring;
        BowShockRadius(radius.max(0.0))
    }

    /// Radius at the downtail distance of an aberration-aligned position.
    pub fn radius(&self, position: &Position) -> Result<BowShockRadius, BoundaryError> {
        position.require(Frame::BowShockAligned)?;
        Ok(self.radius_at(position.in_earth_radii().x()))
    }
}

/// Flaring half-angle of the Mach cone for average solar wind with the
/// field at 45° to the flow.
fn average_flaring_angle() -> f64 {
    let va = AVERAGE_SPEED_CM_S / AVERAGE_ALFVEN_MACH;
    let vs = AVERAGE_SPEED_CM_S / AVERAGE_SONIC_MACH;
    let cos45 = 45f64.to_radians().cos();
    let sum = va * va + vs * vs;
    let fast = (0.5 * (sum + (sum * sum - 4.0 * va * va * vs * vs * cos45 * cos45).sqrt())).sqrt();
    (fast / AVERAGE_SPEED_CM_S).asin()
}

/// One-shot bow shock radius for `state` at an aberration-aligned position.
pub fn bow_shock_radius(
    state: &SolarWindState,
    position: &Position,
) -> Result<BowShockRadius, BoundaryError> {
    BowShockModel::new(state, &SolverOptions::default())?.radius(position)
}
