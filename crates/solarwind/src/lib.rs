//! Solar wind parameter model driven by the Kp geomagnetic activity index.
//!
//! Only the dynamic pressure, the aberration angle and the bulk speed vary
//! with activity; the IMF, density and temperatures are fixed tabulated
//! values.

pub mod interpolate;
pub mod kp;

pub use interpolate::{FitMode, interpolate};
pub use kp::KpSeries;

use log::warn;
use radmon_core::vector::{self, Vector3};
use thiserror::Error;

/// Lower bound of the Kp scale.
pub const KP_MIN: f64 = 0.0;
/// Upper bound of the Kp scale.
pub const KP_MAX: f64 = 9.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolarWindError {
    #[error("activity index must be finite, got {0}")]
    NonFiniteIndex(f64),
}

/// A Kp value clamped to [0, 9], remembering what the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityIndex {
    value: f64,
    requested: f64,
}

impl ActivityIndex {
    /// Clamp `kp` into range. Out-of-range values are logged, not rejected.
    pub fn new(kp: f64) -> Result<Self, SolarWindError> {
        if !kp.is_finite() {
            return Err(SolarWindError::NonFiniteIndex(kp));
        }
        let value = kp.clamp(KP_MIN, KP_MAX);
        if value != kp {
            warn!("activity index {kp} outside [{KP_MIN}, {KP_MAX}], clamped to {value}");
        }
        Ok(ActivityIndex {
            value,
            requested: kp,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn requested(&self) -> f64 {
        self.requested
    }

    pub fn was_clamped(&self) -> bool {
        self.value != self.requested
    }
}

/// Solar wind conditions used by the boundary models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarWindState {
    pub activity: ActivityIndex,
    /// Interplanetary magnetic field (nT).
    pub imf_nt: Vector3,
    /// Bulk flow velocity (km/s); x is negative for anti-sunward flow.
    pub velocity_km_s: Vector3,
    /// Proton number density (cm⁻³).
    pub proton_density_cm3: f64,
    pub electron_temp_k: f64,
    pub proton_temp_k: f64,
    /// Fraction of ions that are helium.
    pub helium_fraction: f64,
    pub helium_temp_k: f64,
    /// Angle about the tail axis at which the bow shock is evaluated (rad, 0 along +z).
    pub bow_shock_angle_rad: f64,
    /// Dynamic pressure (nPa).
    pub dynamic_pressure_npa: f64,
    /// Magnetotail aberration angle (deg).
    pub aberration_deg: f64,
    /// Downtail hinge point of the aberration rotation (Re).
    pub hinge_re: f64,
}

impl SolarWindState {
    pub fn bulk_speed_km_s(&self) -> f64 {
        vector::norm(&self.velocity_km_s)
    }

    pub fn imf_magnitude_nt(&self) -> f64 {
        vector::norm(&self.imf_nt)
    }
}

/// Activity-dependent quantities at one tabulated Kp.
struct Breakpoint {
    kp: f64,
    pressure_npa: f64,
    aberration_deg: f64,
    vx_km_s: f64,
}

const QUIET: Breakpoint = Breakpoint {
    kp: 4.0,
    pressure_npa: 1.0,
    aberration_deg: 4.0,
    vx_km_s: -400.0,
};

const ACTIVE: Breakpoint = Breakpoint {
    kp: 6.0,
    pressure_npa: 4.0,
    aberration_deg: 0.0,
    vx_km_s: -500.0,
};

const STORM: Breakpoint = Breakpoint {
    kp: 9.0,
    pressure_npa: 10.0,
    aberration_deg: 0.0,
    vx_km_s: -500.0,
};

const HINGE_RE: f64 = 14.0;
const IMF_NT: Vector3 = [-5.0, 6.0, 6.0];
const PROTON_DENSITY_CM3: f64 = 8.0;
const ELECTRON_TEMP_K: f64 = 1.4e5;
const PROTON_TEMP_K: f64 = 1.2e5;
const HELIUM_FRACTION: f64 = 0.047;
const HELIUM_TEMP_K: f64 = 5.8e5;

/// Solar wind state for a raw Kp value; clamps into [0, 9].
pub fn solar_wind_state(kp: f64) -> Result<SolarWindState, SolarWindError> {
    Ok(state_for(ActivityIndex::new(kp)?))
}

/// Solar wind state for an already validated activity index.
pub fn state_for(activity: ActivityIndex) -> SolarWindState {
    let kp = activity.value();
    let (pressure, aberration, vx) = if kp <= QUIET.kp {
        (QUIET.pressure_npa, QUIET.aberration_deg, QUIET.vx_km_s)
    } else if kp <= ACTIVE.kp {
        (
            between(&QUIET, &ACTIVE, kp, |b| b.pressure_npa),
            between(&QUIET, &ACTIVE, kp, |b| b.aberration_deg),
            between(&QUIET, &ACTIVE, kp, |b| b.vx_km_s),
        )
    } else {
        (
            between(&ACTIVE, &STORM, kp, |b| b.pressure_npa),
            STORM.aberration_deg,
            STORM.vx_km_s,
        )
    };

    SolarWindState {
        activity,
        imf_nt: IMF_NT,
        velocity_km_s: [vx, 0.0, 0.0],
        proton_density_cm3: PROTON_DENSITY_CM3,
        electron_temp_k: ELECTRON_TEMP_K,
        proton_temp_k: PROTON_TEMP_K,
        helium_fraction: HELIUM_FRACTION,
        helium_temp_k: HELIUM_TEMP_K,
        bow_shock_angle_rad: std::f64::consts::PI,
        dynamic_pressure_npa: pressure,
        aberration_deg: aberration,
        hinge_re: HINGE_RE,
    }
}

fn between(lo: &Breakpoint, hi: &Breakpoint, kp: f64, pick: impl Fn(&Breakpoint) -> f64) -> f64 {
    interpolate(lo.kp, pick(lo), hi.kp, pick(hi), kp, FitMode::LinearLinear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_regime_is_flat() {
        for kp in [0.0, 1.0, 2.333, 4.0] {
            let state = solar_wind_state(kp).unwrap();
            assert_eq!(state.dynamic_pressure_npa, 1.0);
            assert_eq!(state.aberration_deg, 4.0);
            assert_eq!(state.velocity_km_s[0], -400.0);
            assert_eq!(state.hinge_re, 14.0);
        }
    }

    #[test]
    fn nan_index_is_rejected() {
        assert!(matches!(
            solar_wind_state(f64::NAN),
            Err(SolarWindError::NonFiniteIndex(_))
        ));
        assert!(ActivityIndex::new(f64::INFINITY).is_err());
    }

    #[test]
    fn clamping_is_observable() {
        let state = solar_wind_state(12.0).unwrap();
        assert!(state.activity.was_clamped());
        assert_eq!(state.activity.value(), 9.0);
        assert_eq!(state.activity.requested(), 12.0);
        assert_eq!(state.dynamic_pressure_npa, 10.0);
        assert!(!solar_wind_state(3.0).unwrap().activity.was_clamped());
    }
}
