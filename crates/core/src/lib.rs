//! Core units, constants, and shared primitives for the radmon workspace.

/// Physical constants. Lengths in km unless stated otherwise; plasma quantities in CGS.
pub mod constants {
    /// Earth radius used for km ↔ Re conversion (km).
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;
    /// Kelvin per electron-volt, rounded the way the plasma tables are.
    pub const KELVIN_PER_EV: f64 = 11_600.0;
    /// Proton mass (g).
    pub const PROTON_MASS_G: f64 = 1.67e-24;
    /// Erg per electron-volt.
    pub const ERG_PER_EV: f64 = 1.602e-12;
    /// Centimetres per kilometre.
    pub const CM_PER_KM: f64 = 1.0e5;
    /// Gauss per nanotesla.
    pub const GAUSS_PER_NT: f64 = 1.0e-5;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{CM_PER_KM, EARTH_RADIUS_KM, GAUSS_PER_NT, KELVIN_PER_EV};

    /// Convert kilometres to Earth radii.
    #[inline]
    pub fn km_to_re(v: f64) -> f64 {
        v / EARTH_RADIUS_KM
    }

    /// Convert Earth radii to kilometres.
    #[inline]
    pub fn re_to_km(v: f64) -> f64 {
        v * EARTH_RADIUS_KM
    }

    /// Convert kilometres per second to centimetres per second.
    #[inline]
    pub fn km_s_to_cm_s(v: f64) -> f64 {
        v * CM_PER_KM
    }

    /// Convert centimetres per second to kilometres per second.
    #[inline]
    pub fn cm_s_to_km_s(v: f64) -> f64 {
        v / CM_PER_KM
    }

    /// Convert nanotesla to gauss.
    #[inline]
    pub fn nt_to_gauss(v: f64) -> f64 {
        v * GAUSS_PER_NT
    }

    /// Convert a temperature in kelvin to electron-volts.
    #[inline]
    pub fn kelvin_to_ev(v: f64) -> f64 {
        v / KELVIN_PER_EV
    }
}

/// Instants keyed by seconds since the Unix epoch.
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use thiserror::Error;

    const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y:%j:%H:%M:%S"];

    #[derive(Debug, Error)]
    pub enum TimeError {
        #[error("invalid calendar date {0}")]
        InvalidCalendar(String),
        #[error("unrecognised timestamp '{0}'")]
        Unparseable(String),
        #[error("epoch {0} s lies outside the representable calendar range")]
        OutOfRange(f64),
        #[error("epoch seconds must be finite, got {0}")]
        NonFinite(f64),
    }

    /// A single instant, stored as UTC seconds since 1970-01-01T00:00:00.
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    pub struct Epoch(f64);

    impl Epoch {
        pub fn from_unix_seconds(seconds: f64) -> Result<Self, TimeError> {
            if seconds.is_finite() {
                Ok(Epoch(seconds))
            } else {
                Err(TimeError::NonFinite(seconds))
            }
        }

        pub fn unix_seconds(self) -> f64 {
            self.0
        }

        /// Build an epoch from calendar fields (UTC).
        pub fn from_calendar(
            year: i32,
            month: u32,
            day: u32,
            hour: u32,
            minute: u32,
            second: u32,
        ) -> Result<Self, TimeError> {
            let naive = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(hour, minute, second))
                .ok_or_else(|| {
                    TimeError::InvalidCalendar(format!(
                        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                    ))
                })?;
            Ok(Self::from_naive(naive))
        }

        /// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or
        /// day-of-year `YYYY:DDD:HH:MM:SS` timestamps (all UTC), or a bare
        /// number of seconds.
        pub fn parse(text: &str) -> Result<Self, TimeError> {
            let text = text.trim();
            if let Ok(seconds) = text.parse::<f64>() {
                return Self::from_unix_seconds(seconds);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Ok(Self::from_naive(dt.with_timezone(&Utc).naive_utc()));
            }
            ACCEPTED_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(Self::from_naive)
                .ok_or_else(|| TimeError::Unparseable(text.to_string()))
        }

        pub fn to_utc(self) -> Result<DateTime<Utc>, TimeError> {
            let whole = self.0.floor();
            let nanos = ((self.0 - whole) * 1.0e9).round().min(999_999_999.0) as u32;
            DateTime::<Utc>::from_timestamp(whole as i64, nanos).ok_or(TimeError::OutOfRange(self.0))
        }

        /// Format as `YYYY-MM-DDTHH:MM:SS` (UTC).
        pub fn format_utc(self) -> Result<String, TimeError> {
            Ok(self.to_utc()?.format(OUTPUT_FORMAT).to_string())
        }

        fn from_naive(naive: NaiveDateTime) -> Self {
            let utc = naive.and_utc();
            Epoch(utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1.0e-9)
        }
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D Cartesian vector.
    pub type Vector3 = [f64; 3];
    /// Row-major 3×3 matrix.
    pub type Matrix3 = [[f64; 3]; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`, or `None` when `v` has zero or non-finite length.
    #[inline]
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > 0.0 && n.is_finite() {
            Some(scale(v, 1.0 / n))
        } else {
            None
        }
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// `m · v`.
    #[inline]
    pub fn mat_mul(m: &Matrix3, v: &Vector3) -> Vector3 {
        [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
    }

    /// `mᵀ · v`; the inverse of `mat_mul` for orthonormal `m`.
    #[inline]
    pub fn mat_t_mul(m: &Matrix3, v: &Vector3) -> Vector3 {
        [
            m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
            m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
            m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::time::{Epoch, TimeError};

    #[test]
    fn epoch_formats_round_trip() {
        let epoch = Epoch::from_calendar(2021, 3, 16, 12, 30, 5).unwrap();
        assert_eq!(epoch.format_utc().unwrap(), "2021-03-16T12:30:05");
        let doy = Epoch::parse("2021:075:12:30:05").unwrap();
        assert_eq!(doy, epoch);
        let rfc = Epoch::parse("2021-03-16T12:30:05Z").unwrap();
        assert_eq!(rfc, epoch);
    }

    #[test]
    fn epoch_rejects_bad_calendar() {
        assert!(Epoch::from_calendar(2021, 2, 30, 0, 0, 0).is_err());
        assert!(Epoch::parse("yesterday").is_err());
    }

    #[test]
    fn epoch_rejects_non_finite_seconds() {
        for text in ["nan", "NaN", "inf", "-infinity"] {
            assert!(
                matches!(Epoch::parse(text), Err(TimeError::NonFinite(_))),
                "{text} was accepted"
            );
        }
        assert!(Epoch::from_unix_seconds(f64::NAN).is_err());
        assert_eq!(Epoch::parse(" 86400 ").unwrap().format_utc().unwrap(), "1970-01-02T00:00:00");
    }
}
