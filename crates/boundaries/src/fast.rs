//! Local fast magnetosonic speed (Bennett et al. 1997, eqs. 21-24).
//!
//! The flow-aligned velocity component `vx` (km/s) is the root of
//!
//! ```text
//! f(vx) = va² + vs² - 2·v0·vx + sqrt((va² + vs²)² - 4·va²·vs²·cos²θ)
//! ```
//!
//! where the solved flow vector is `(vx, sinα·vb, cosα·vb)` with
//! `vb = sqrt(v0·vx - vx²)` and θ is its angle to the IMF. `f` is positive
//! near `vx = 0` and negative at `vx = v0` whenever the wind is
//! super-magnetosonic, so the root is bracketed by `(0, v0]`.

use log::debug;
use radmon_core::units::{cm_s_to_km_s, km_s_to_cm_s};
use radmon_core::vector::{self, Vector3};
use thiserror::Error;

/// Root-finding strategy for the `vx` balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSearch {
    /// Halve the `(0, v0]` bracket until it is narrower than the tolerance.
    Bisection,
    /// Historical coarse-to-fine stepping: 2.0 up, 0.1 back, 0.01 up.
    Stepped,
}

/// Solver configuration. `max_iterations` bounds residual evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub method: RootSearch,
    /// Resolution of the solved `vx` (km/s).
    pub tolerance_km_s: f64,
    pub max_iterations: usize,
}

impl SolverOptions {
    pub fn bisection() -> Self {
        SolverOptions {
            method: RootSearch::Bisection,
            tolerance_km_s: 0.01,
            max_iterations: 200,
        }
    }

    pub fn stepped() -> Self {
        SolverOptions {
            method: RootSearch::Stepped,
            tolerance_km_s: 0.01,
            max_iterations: 100_000,
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions::bisection()
    }
}

/// Inputs to [`fast_magnetosonic_speed`]. Speeds in cm/s, field in nT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastSpeedInputs {
    pub alfven_cm_s: f64,
    pub sound_cm_s: f64,
    pub bulk_cm_s: f64,
    pub imf_nt: Vector3,
    /// Angle about the tail axis, 0 along +z (rad).
    pub angle_rad: f64,
}

/// Converged solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastSpeed {
    /// Magnitude of the solved flow vector (cm/s).
    pub speed_cm_s: f64,
    /// Angle between the IMF and the solved flow vector (rad).
    pub angle_rad: f64,
    /// Solved flow-aligned component (km/s).
    pub vx_km_s: f64,
    /// Residual evaluations spent.
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FastSpeedError {
    #[error("invalid solver input: {0}")]
    InvalidInput(String),
    #[error("residual does not change sign on (0, v0]; residual at v0 is {residual_at_bulk:.3}")]
    NoSignChange { residual_at_bulk: f64 },
    #[error("no root within {iterations} residual evaluations")]
    NotConverged { iterations: usize },
    #[error("search left the physical domain at vx = {vx_km_s} km/s")]
    OutsideDomain { vx_km_s: f64 },
}

struct Residual {
    va2: f64,
    vs2: f64,
    v0: f64,
    imf: Vector3,
    imf2: f64,
    sin_a: f64,
    cos_a: f64,
}

impl Residual {
    fn eval(&self, vx: f64) -> f64 {
        let vb = (self.v0 * vx - vx * vx).sqrt();
        let along = vx * self.imf[0] + vb * (self.imf[1] * self.sin_a + self.imf[2] * self.cos_a);
        let cos2 = along * along / (self.imf2 * self.v0 * vx);
        let sum = self.va2 + self.vs2;
        let disc = sum * sum - 4.0 * self.va2 * self.vs2 * cos2;
        // Round-off can leave a tiny negative; NaN from outside (0, v0] passes through.
        let disc = if disc < 0.0 { 0.0 } else { disc };
        sum - 2.0 * self.v0 * vx + disc.sqrt()
    }

    /// Residual restricted to the physical domain `0 < vx <= v0`.
    fn checked(&self, vx: f64) -> Result<f64, FastSpeedError> {
        if !(vx > 0.0 && vx <= self.v0) {
            return Err(FastSpeedError::OutsideDomain { vx_km_s: vx });
        }
        match self.eval(vx) {
            f if f.is_nan() => Err(FastSpeedError::OutsideDomain { vx_km_s: vx }),
            f => Ok(f),
        }
    }

    fn flow(&self, vx: f64) -> Vector3 {
        let vb = (self.v0 * vx - vx * vx).max(0.0).sqrt();
        [vx, self.sin_a * vb, self.cos_a * vb]
    }
}

/// Solve for the local fast magnetosonic speed and its angle to the IMF.
pub fn fast_magnetosonic_speed(
    inputs: &FastSpeedInputs,
    options: &SolverOptions,
) -> Result<FastSpeed, FastSpeedError> {
    let imf2 = vector::dot(&inputs.imf_nt, &inputs.imf_nt);
    let finite = [inputs.alfven_cm_s, inputs.sound_cm_s, inputs.bulk_cm_s, inputs.angle_rad]
        .iter()
        .all(|v| v.is_finite())
        && vector::is_finite(&inputs.imf_nt);
    if !finite {
        return Err(FastSpeedError::InvalidInput("non-finite component".into()));
    }
    if imf2 == 0.0 {
        return Err(FastSpeedError::InvalidInput("zero magnetic field".into()));
    }
    if inputs.bulk_cm_s <= 0.0 {
        return Err(FastSpeedError::InvalidInput(format!(
            "bulk speed must be positive, got {} cm/s",
            inputs.bulk_cm_s
        )));
    }
    if !(options.tolerance_km_s > 0.0) {
        return Err(FastSpeedError::InvalidInput(format!(
            "tolerance must be positive, got {}",
            options.tolerance_km_s
        )));
    }

    let va = cm_s_to_km_s(inputs.alfven_cm_s);
    let vs = cm_s_to_km_s(inputs.sound_cm_s);
    let (sin_a, cos_a) = inputs.angle_rad.sin_cos();
    let residual = Residual {
        va2: va * va,
        vs2: vs * vs,
        v0: cm_s_to_km_s(inputs.bulk_cm_s),
        imf: inputs.imf_nt,
        imf2,
        sin_a,
        cos_a,
    };

    let at_bulk = residual.eval(residual.v0);
    if !(at_bulk < 0.0) {
        return Err(FastSpeedError::NoSignChange {
            residual_at_bulk: at_bulk,
        });
    }

    let (vx, iterations) = match options.method {
        RootSearch::Bisection => bisect(&residual, options)?,
        RootSearch::Stepped => step_search(&residual, options)?,
    };

    let flow = residual.flow(vx);
    let speed = vector::norm(&flow);
    let angle = (vector::dot(&inputs.imf_nt, &flow) / (imf2.sqrt() * speed))
        .clamp(-1.0, 1.0)
        .acos();

    debug!(
        "fast magnetosonic solve ({:?}): vx = {vx:.4} km/s, |v| = {speed:.4} km/s after {iterations} evaluations",
        options.method
    );

    Ok(FastSpeed {
        speed_cm_s: km_s_to_cm_s(speed),
        angle_rad: angle,
        vx_km_s: vx,
        iterations,
    })
}

/// Returns the upper (non-positive residual) end of the final bracket.
fn bisect(residual: &Residual, options: &SolverOptions) -> Result<(f64, usize), FastSpeedError> {
    let mut lo = (options.tolerance_km_s * 1.0e-3).min(0.5 * residual.v0);
    let mut hi = residual.v0;
    let mut evaluations = 1;
    if !(residual.eval(lo) > 0.0) {
        return Err(FastSpeedError::NoSignChange {
            residual_at_bulk: residual.eval(hi),
        });
    }
    while hi - lo > options.tolerance_km_s {
        if evaluations >= options.max_iterations {
            return Err(FastSpeedError::NotConverged {
                iterations: evaluations,
            });
        }
        let mid = 0.5 * (lo + hi);
        evaluations += 1;
        if residual.eval(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok((hi, evaluations))
}

/// Coarse-to-fine stepping from `vx = 1`: advance by 2.0 until the residual
/// changes sign, back off by 0.1 until it flips again, then advance by 0.01
/// to the final flip. Upward steps stop at `v0`, where the residual is known
/// to be negative.
fn step_search(residual: &Residual, options: &SolverOptions) -> Result<(f64, usize), FastSpeedError> {
    const START: f64 = 1.0;
    const COARSE: f64 = 2.0;
    const MEDIUM: f64 = 0.1;

    let fine = options.tolerance_km_s;
    let v0 = residual.v0;
    let mut evaluations = 0;
    let mut eval = |vx: f64| -> Result<f64, FastSpeedError> {
        if evaluations >= options.max_iterations {
            return Err(FastSpeedError::NotConverged {
                iterations: evaluations,
            });
        }
        evaluations += 1;
        residual.checked(vx)
    };

    let mut vx = START.min(v0);
    let initial = eval(vx)?;
    if initial == 0.0 {
        return Ok((vx, evaluations));
    }
    // +1 when the first evaluation is positive; each stage runs while the
    // residual keeps the stage's sign.
    let sign = initial.signum();
    let mut f = initial;
    while f * sign > 0.0 {
        vx = (vx + COARSE).min(v0);
        f = eval(vx)?;
    }
    while f * sign < 0.0 {
        vx -= MEDIUM;
        f = eval(vx)?;
    }
    while f * sign > 0.0 {
        vx = (vx + fine).min(v0);
        f = eval(vx)?;
    }
    Ok((vx, evaluations))
}
