//! Celestial body capabilities
//!
//! The atmosphere model only needs a handful of read-only facts about the body
//! it flies through. `AtmosphericBody` names them; `CelestialBody` is a
//! serde-loadable implementation backed by float curves and ideal-gas laws.

use std::path::Path;

use aero_core::{normalize_or_zero, ConfigError, Curve, FloatCurve, Vec3};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Universal gas constant [J/(mol·K)].
pub const IDEAL_GAS_CONSTANT: f64 = 8.314_459_8;

/// Read-only body model consumed by the atmosphere and force models.
///
/// Pressures are in kPa, temperatures in K, densities in kg/m^3, lengths in m.
pub trait AtmosphericBody {
    fn has_atmosphere(&self) -> bool;
    fn atmosphere_depth(&self) -> f64;
    fn radius(&self) -> f64;
    fn position(&self) -> Vec3;
    /// Unit rotation axis ("up" through the north pole).
    fn rotation_axis(&self) -> Vec3;
    /// Sidereal rotation period [s]; only its sign is used here.
    fn rotation_period(&self) -> f64;
    /// Position of the primary star lighting the body.
    fn sun_position(&self) -> Vec3;

    fn pressure(&self, altitude: f64) -> f64;
    fn base_temperature(&self, altitude: f64) -> f64;
    fn density(&self, pressure: f64, temperature: f64) -> f64;
    fn speed_of_sound(&self, pressure: f64, density: f64) -> f64;

    fn latitude_temperature_bias_curve(&self) -> &dyn Curve;
    fn latitude_temperature_sun_mult_curve(&self) -> &dyn Curve;
    fn axial_temperature_sun_mult_curve(&self) -> &dyn Curve;
    fn atmosphere_temperature_sun_mult_curve(&self) -> &dyn Curve;

    /// Height above the body's surface.
    fn altitude(&self, position: &Vec3) -> f64 {
        (position - self.position()).norm() - self.radius()
    }

    /// Latitude of `position` in radians, measured against the rotation axis.
    fn latitude(&self, position: &Vec3) -> f64 {
        let up = normalize_or_zero(&(position - self.position()));
        let axis = normalize_or_zero(&self.rotation_axis());
        up.dot(&axis).clamp(-1.0, 1.0).asin()
    }
}

/// Reference body: curve-driven pressure and temperature, ideal-gas density.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: String,
    pub radius: f64,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_rotation_axis")]
    pub rotation_axis: Vec3,
    #[serde(default = "default_rotation_period")]
    pub rotation_period: f64,
    pub sun_position: Vec3,

    #[serde(default)]
    pub atmosphere: bool,
    #[serde(default)]
    pub atmosphere_depth: f64,
    /// Molar mass of the atmosphere [kg/mol].
    #[serde(default = "default_molar_mass")]
    pub atmosphere_molar_mass: f64,
    #[serde(default = "default_adiabatic_index")]
    pub adiabatic_index: f64,

    /// Static pressure [kPa] by altitude.
    #[serde(default)]
    pub pressure_curve: FloatCurve,
    /// Base temperature [K] by altitude.
    #[serde(default)]
    pub temperature_curve: FloatCurve,

    #[serde(default)]
    pub latitude_temperature_bias_curve: FloatCurve,
    #[serde(default)]
    pub latitude_temperature_sun_mult_curve: FloatCurve,
    #[serde(default)]
    pub axial_temperature_sun_mult_curve: FloatCurve,
    #[serde(default)]
    pub atmosphere_temperature_sun_mult_curve: FloatCurve,
}

fn default_rotation_axis() -> Vec3 {
    Vec3::z()
}

fn default_rotation_period() -> f64 {
    21_549.425
}

fn default_molar_mass() -> f64 {
    0.028_964_4
}

fn default_adiabatic_index() -> f64 {
    1.4
}

impl CelestialBody {
    /// A body with no atmosphere at the origin, lit from +x.
    pub fn airless(name: impl Into<String>, radius: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            position: Vec3::zeros(),
            rotation_axis: default_rotation_axis(),
            rotation_period: default_rotation_period(),
            sun_position: Vec3::new(1.36e10, 0.0, 0.0),
            atmosphere: false,
            atmosphere_depth: 0.0,
            atmosphere_molar_mass: default_molar_mass(),
            adiabatic_index: default_adiabatic_index(),
            pressure_curve: FloatCurve::default(),
            temperature_curve: FloatCurve::default(),
            latitude_temperature_bias_curve: FloatCurve::default(),
            latitude_temperature_sun_mult_curve: FloatCurve::default(),
            axial_temperature_sun_mult_curve: FloatCurve::default(),
            atmosphere_temperature_sun_mult_curve: FloatCurve::default(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let body: Self = serde_json::from_str(text)?;
        body.validate()?;
        Ok(body)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading body definition from {}", path.display()))?;
        let body = Self::from_json_str(&text)
            .with_context(|| format!("parsing body definition from {}", path.display()))?;
        Ok(body)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::NotPositive { field: "radius", value: self.radius });
        }
        if self.atmosphere {
            if !(self.atmosphere_depth > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "atmosphere_depth",
                    value: self.atmosphere_depth,
                });
            }
            if !(self.atmosphere_molar_mass > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "atmosphere_molar_mass",
                    value: self.atmosphere_molar_mass,
                });
            }
            if !(self.adiabatic_index > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "adiabatic_index",
                    value: self.adiabatic_index,
                });
            }
        }
        Ok(())
    }
}

impl AtmosphericBody for CelestialBody {
    fn has_atmosphere(&self) -> bool {
        self.atmosphere
    }

    fn atmosphere_depth(&self) -> f64 {
        self.atmosphere_depth
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation_axis(&self) -> Vec3 {
        normalize_or_zero(&self.rotation_axis)
    }

    fn rotation_period(&self) -> f64 {
        self.rotation_period
    }

    fn sun_position(&self) -> Vec3 {
        self.sun_position
    }

    fn pressure(&self, altitude: f64) -> f64 {
        if !self.atmosphere || altitude > self.atmosphere_depth {
            return 0.0;
        }
        self.pressure_curve.eval(altitude).max(0.0)
    }

    fn base_temperature(&self, altitude: f64) -> f64 {
        self.temperature_curve.eval(altitude)
    }

    fn density(&self, pressure: f64, temperature: f64) -> f64 {
        if pressure <= 0.0 || temperature <= 0.0 {
            return 0.0;
        }
        pressure * 1000.0 * self.atmosphere_molar_mass / (IDEAL_GAS_CONSTANT * temperature)
    }

    fn speed_of_sound(&self, pressure: f64, density: f64) -> f64 {
        if density <= 0.0 || pressure <= 0.0 {
            return 0.0;
        }
        (self.adiabatic_index * pressure * 1000.0 / density).sqrt()
    }

    fn latitude_temperature_bias_curve(&self) -> &dyn Curve {
        &self.latitude_temperature_bias_curve
    }

    fn latitude_temperature_sun_mult_curve(&self) -> &dyn Curve {
        &self.latitude_temperature_sun_mult_curve
    }

    fn axial_temperature_sun_mult_curve(&self) -> &dyn Curve {
        &self.axial_temperature_sun_mult_curve
    }

    fn atmosphere_temperature_sun_mult_curve(&self) -> &dyn Curve {
        &self.atmosphere_temperature_sun_mult_curve
    }
}
