//! Immutable Cartesian positions carrying their frame and length unit.

use std::fmt;

use radmon_core::units::{km_to_re, re_to_km};
use radmon_core::vector::{self, Vector3};

use crate::FrameError;

/// Coordinate frame a [`Position`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Earth-centred inertial (GEI).
    Inertial,
    /// Earth-centred, Earth-fixed (GEO).
    Geographic,
    /// Geocentric solar magnetospheric.
    Gsm,
    /// Geocentric solar ecliptic.
    Gse,
    /// GSM rotated about the magnetotail hinge by the aberration angle.
    BowShockAligned,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frame::Inertial => "GEI",
            Frame::Geographic => "GEO",
            Frame::Gsm => "GSM",
            Frame::Gse => "GSE",
            Frame::BowShockAligned => "bow-shock aligned",
        };
        f.write_str(name)
    }
}

/// Length unit of a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    Kilometres,
    EarthRadii,
}

/// A 3-vector tagged with its frame and units.
///
/// Components are validated finite on construction and never mutated; every
/// transform or conversion returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    frame: Frame,
    units: Units,
    xyz: Vector3,
}

impl Position {
    pub fn new(frame: Frame, units: Units, xyz: Vector3) -> Result<Self, FrameError> {
        if !vector::is_finite(&xyz) {
            return Err(FrameError::degenerate(format!(
                "non-finite {frame} component in {xyz:?}"
            )));
        }
        Ok(Position { frame, units, xyz })
    }

    /// GSM position in Earth radii, the frame the region classifier consumes.
    pub fn gsm_re(x: f64, y: f64, z: f64) -> Result<Self, FrameError> {
        Position::new(Frame::Gsm, Units::EarthRadii, [x, y, z])
    }

    /// Inertial position in kilometres, as delivered by ephemeris sources.
    pub fn inertial_km(x: f64, y: f64, z: f64) -> Result<Self, FrameError> {
        Position::new(Frame::Inertial, Units::Kilometres, [x, y, z])
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn x(&self) -> f64 {
        self.xyz[0]
    }

    pub fn y(&self) -> f64 {
        self.xyz[1]
    }

    pub fn z(&self) -> f64 {
        self.xyz[2]
    }

    pub fn components(&self) -> Vector3 {
        self.xyz
    }

    /// Distance from the origin, in this position's units.
    pub fn radius(&self) -> f64 {
        vector::norm(&self.xyz)
    }

    /// Distance from the x axis, `sqrt(y² + z²)`.
    pub fn cylindrical_radius(&self) -> f64 {
        self.xyz[1].hypot(self.xyz[2])
    }

    pub fn in_earth_radii(&self) -> Position {
        match self.units {
            Units::EarthRadii => *self,
            Units::Kilometres => Position {
                units: Units::EarthRadii,
                xyz: self.xyz.map(km_to_re),
                ..*self
            },
        }
    }

    pub fn in_kilometres(&self) -> Position {
        match self.units {
            Units::Kilometres => *self,
            Units::EarthRadii => Position {
                units: Units::Kilometres,
                xyz: self.xyz.map(re_to_km),
                ..*self
            },
        }
    }

    /// Fails with `FrameMismatch` unless this position is in `expected`.
    pub fn require(&self, expected: Frame) -> Result<(), FrameError> {
        if self.frame == expected {
            Ok(())
        } else {
            Err(FrameError::FrameMismatch {
                expected,
                found: self.frame,
            })
        }
    }

    /// Same units, new frame and components. Components are re-validated.
    pub(crate) fn with_frame(&self, frame: Frame, xyz: Vector3) -> Result<Position, FrameError> {
        Position::new(frame, self.units, xyz)
    }
}
