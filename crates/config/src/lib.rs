//! Configuration models and loaders for radmon runs.
//!
//! A configuration source is a YAML file, a single TOML file, or a directory
//! of TOML files. Directory entries are applied in sorted file-name order,
//! later files overriding the keys they set.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_KP: f64 = 1.0;
pub const DEFAULT_TOLERANCE_KM_S: f64 = 0.01;
pub const DEFAULT_BISECTION_ITERATIONS: usize = 200;
pub const DEFAULT_STEPPED_ITERATIONS: usize = 100_000;

/// Root search used by the fast magnetosonic solver.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    #[default]
    Bisection,
    Stepped,
}

/// Frame of the positions in a sample file. GSM and GSE samples are in
/// Earth radii; geographic and inertial samples are in kilometres.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputFrame {
    #[default]
    Gsm,
    Gse,
    Geographic,
    Inertial,
}

/// Frame rotations for one instant, as supplied by an external dipole-field
/// model. All angles in degrees.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    /// Greenwich sidereal angle.
    pub gst_deg: f64,
    pub sun_ra_deg: f64,
    pub sun_dec_deg: f64,
    /// Dipole pole colatitude and east longitude in GEO.
    pub dipole_colat_deg: f64,
    pub dipole_lon_deg: f64,
    pub obliquity_deg: f64,
}

impl RotationConfig {
    fn angles(&self) -> [f64; 6] {
        [
            self.gst_deg,
            self.sun_ra_deg,
            self.sun_dec_deg,
            self.dipole_colat_deg,
            self.dipole_lon_deg,
            self.obliquity_deg,
        ]
    }
}

/// Resolved solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub method: SolverMethod,
    /// km/s
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            method: SolverMethod::Bisection,
            tolerance: DEFAULT_TOLERANCE_KM_S,
            max_iterations: DEFAULT_BISECTION_ITERATIONS,
        }
    }
}

/// Resolved classifier configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    pub solver: SolverConfig,
    pub earth_radius_km: f64,
    /// Kp applied to samples that carry none.
    pub default_kp: f64,
    pub input_frame: InputFrame,
    /// Required for any input frame other than GSM.
    pub rotation: Option<RotationConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            solver: SolverConfig::default(),
            earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
            default_kp: DEFAULT_KP,
            input_frame: InputFrame::Gsm,
            rotation: None,
        }
    }
}

/// One configuration source as written on disk; unset keys keep the value
/// from earlier layers.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub solver: Option<SolverLayer>,
    #[serde(default)]
    pub earth_radius_km: Option<f64>,
    #[serde(default)]
    pub default_kp: Option<f64>,
    #[serde(default)]
    pub input_frame: Option<InputFrame>,
    /// Replaces any rotation set by earlier layers as a whole.
    #[serde(default)]
    pub rotation: Option<RotationConfig>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SolverLayer {
    #[serde(default)]
    pub method: Option<SolverMethod>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ClassifierConfig {
    /// Apply `layers` in order on top of the defaults and validate the result.
    pub fn from_layers<I>(layers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ConfigLayer>,
    {
        let mut method = None;
        let mut tolerance = None;
        let mut max_iterations = None;
        let mut config = ClassifierConfig::default();

        for layer in layers {
            if let Some(solver) = layer.solver {
                method = solver.method.or(method);
                tolerance = solver.tolerance.or(tolerance);
                max_iterations = solver.max_iterations.or(max_iterations);
            }
            if let Some(radius) = layer.earth_radius_km {
                config.earth_radius_km = radius;
            }
            if let Some(kp) = layer.default_kp {
                config.default_kp = kp;
            }
            if let Some(frame) = layer.input_frame {
                config.input_frame = frame;
            }
            if layer.rotation.is_some() {
                config.rotation = layer.rotation;
            }
        }

        let method = method.unwrap_or_default();
        config.solver = SolverConfig {
            method,
            tolerance: tolerance.unwrap_or(DEFAULT_TOLERANCE_KM_S),
            max_iterations: max_iterations.unwrap_or(match method {
                SolverMethod::Bisection => DEFAULT_BISECTION_ITERATIONS,
                SolverMethod::Stepped => DEFAULT_STEPPED_ITERATIONS,
            }),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "solver.tolerance must be positive, got {}",
                self.solver.tolerance
            )));
        }
        if self.solver.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "solver.max_iterations must be at least 1".into(),
            ));
        }
        if !(self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "earth_radius_km must be positive, got {}",
                self.earth_radius_km
            )));
        }
        if !self.default_kp.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "default_kp must be finite, got {}",
                self.default_kp
            )));
        }
        if let Some(rotation) = &self.rotation {
            if !rotation.angles().iter().all(|a| a.is_finite()) {
                return Err(ConfigError::Invalid(
                    "rotation angles must be finite".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Load a classifier configuration from a YAML file, a TOML file, or a
/// directory of TOML files.
pub fn load_classifier_config<P: AsRef<Path>>(path: P) -> Result<ClassifierConfig, ConfigError> {
    ClassifierConfig::from_layers(load_layers(path)?)
}

fn load_layers<P: AsRef<Path>>(path: P) -> Result<Vec<ConfigLayer>, ConfigError> {
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_layers(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(vec![toml::from_str(&contents)?])
    } else {
        let reader = File::open(path)?;
        Ok(vec![serde_yaml::from_reader(reader)?])
    }
}

fn read_dir_layers(dir: &Path) -> Result<Vec<ConfigLayer>, ConfigError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    let mut layers = Vec::with_capacity(entries.len());
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        layers.push(toml::from_str(&contents)?);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepped_method_gets_its_own_budget() {
        let layer: ConfigLayer = toml::from_str("[solver]\nmethod = \"stepped\"\n").unwrap();
        let config = ClassifierConfig::from_layers([layer]).unwrap();
        assert_eq!(config.solver.method, SolverMethod::Stepped);
        assert_eq!(config.solver.max_iterations, DEFAULT_STEPPED_ITERATIONS);
        assert_eq!(config.default_kp, DEFAULT_KP);
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        let first: ConfigLayer =
            toml::from_str("default_kp = 3.0\n[solver]\ntolerance = 0.5\n").unwrap();
        let second: ConfigLayer = toml::from_str("default_kp = 5.0\n").unwrap();
        let config = ClassifierConfig::from_layers([first, second]).unwrap();
        assert_eq!(config.default_kp, 5.0);
        assert_eq!(config.solver.tolerance, 0.5);
    }

    #[test]
    fn unknown_method_is_a_parse_error() {
        assert!(toml::from_str::<ConfigLayer>("[solver]\nmethod = \"newton\"\n").is_err());
        assert!(serde_yaml::from_str::<ConfigLayer>("solver:\n  method: secant\n").is_err());
    }

    #[test]
    fn rotation_section_is_replaced_whole() {
        let first: ConfigLayer = toml::from_str(
            "input_frame = \"inertial\"\n[rotation]\ngst_deg = 10.0\nsun_ra_deg = 0.0\nsun_dec_deg = 0.0\ndipole_colat_deg = 9.4\ndipole_lon_deg = 287.4\nobliquity_deg = 23.44\n",
        )
        .unwrap();
        let second: ConfigLayer = serde_yaml::from_str(
            "rotation:\n  gst_deg: 20.0\n  sun_ra_deg: 90.0\n  sun_dec_deg: 23.44\n  dipole_colat_deg: 9.4\n  dipole_lon_deg: 287.4\n  obliquity_deg: 23.44\n",
        )
        .unwrap();
        let config = ClassifierConfig::from_layers([first, second]).unwrap();
        assert_eq!(config.input_frame, InputFrame::Inertial);
        let rotation = config.rotation.unwrap();
        assert_eq!(rotation.gst_deg, 20.0);
        assert_eq!(rotation.sun_ra_deg, 90.0);
    }

    #[test]
    fn partial_rotation_section_is_a_parse_error() {
        assert!(toml::from_str::<ConfigLayer>("[rotation]\ngst_deg = 10.0\n").is_err());
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let layer: ConfigLayer = serde_yaml::from_str("solver:\n  tolerance: 0.0\n").unwrap();
        assert!(matches!(
            ClassifierConfig::from_layers([layer]),
            Err(ConfigError::Invalid(_))
        ));
    }
}
