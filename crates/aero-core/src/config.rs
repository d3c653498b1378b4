//! Physics configuration
//!
//! The global multipliers and curves the force models read. They are passed
//! explicitly into every force query; nothing here is process-wide state.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::curve::FloatCurve;
use crate::error::ConfigError;

/// Hard ceiling on the Mach number any curve is evaluated at.
pub const MAX_MACH: f64 = 25.0;

/// Read-only physics constants consumed by the atmosphere and force models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsGlobals {
    /// Temperature reported outside any atmosphere [K].
    pub space_temperature: f64,
    /// Applied to every cube-drag force.
    pub drag_multiplier: f64,
    /// Applied to the interpolated cube area-drag.
    pub drag_cube_multiplier: f64,
    /// Applied to every element's body lift.
    pub body_lift_multiplier: f64,
    /// Lifting-surface lift multiplier.
    pub lift_multiplier: f64,
    /// Lifting-surface induced drag multiplier.
    pub lift_drag_multiplier: f64,
    /// q = factor * rho * |v|^2 (0.0005 yields kPa from kg/m^3 and m/s).
    pub dynamic_pressure_factor: f64,
    /// Upper clamp for the Mach number fed to every curve, at most `MAX_MACH`.
    pub mach_limit: f64,
    /// Drag multiplier keyed on the pseudo-Reynolds number rho * |v|.
    pub drag_curve_pseudo_reynolds: FloatCurve,
    /// Body-lift multiplier keyed on Mach.
    pub body_lift_mach_curve: FloatCurve,
}

impl Default for PhysicsGlobals {
    fn default() -> Self {
        Self {
            space_temperature: 4.0,
            drag_multiplier: 8.0,
            drag_cube_multiplier: 0.1,
            body_lift_multiplier: 1.0,
            lift_multiplier: 0.036,
            lift_drag_multiplier: 0.015,
            dynamic_pressure_factor: 0.0005,
            mach_limit: MAX_MACH,
            drag_curve_pseudo_reynolds: FloatCurve::linear(&[
                (0.0, 4.0),
                (0.0001, 3.0),
                (0.01, 2.0),
                (0.1, 1.2),
                (1.0, 1.0),
                (100.0, 1.0),
            ]),
            body_lift_mach_curve: FloatCurve::linear(&[
                (0.0, 0.0),
                (0.3, 0.167),
                (0.8, 0.167),
                (1.0, 0.125),
                (5.0, 0.0625),
                (25.0, 0.05),
            ]),
        }
    }
}

impl PhysicsGlobals {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let globals: Self = serde_json::from_str(text)?;
        globals.validate()?;
        Ok(globals)
    }

    /// Read and parse a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading physics globals from {}", path.display()))?;
        let globals = Self::from_json_str(&text)
            .with_context(|| format!("parsing physics globals from {}", path.display()))?;
        Ok(globals)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("space_temperature", self.space_temperature),
            ("drag_multiplier", self.drag_multiplier),
            ("drag_cube_multiplier", self.drag_cube_multiplier),
            ("body_lift_multiplier", self.body_lift_multiplier),
            ("lift_multiplier", self.lift_multiplier),
            ("lift_drag_multiplier", self.lift_drag_multiplier),
            ("dynamic_pressure_factor", self.dynamic_pressure_factor),
            ("mach_limit", self.mach_limit),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.mach_limit <= 0.0 {
            return Err(ConfigError::NotPositive { field: "mach_limit", value: self.mach_limit });
        }
        if self.mach_limit > MAX_MACH {
            return Err(ConfigError::AboveMaximum {
                field: "mach_limit",
                value: self.mach_limit,
                max: MAX_MACH,
            });
        }
        Ok(())
    }

    /// `mach_limit`, capped at `MAX_MACH` even when the struct was built by hand.
    pub fn effective_mach_limit(&self) -> f64 {
        self.mach_limit.min(MAX_MACH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let g = PhysicsGlobals::default();
        g.validate().unwrap();
        assert_eq!(g.mach_limit, 25.0);
        assert_eq!(g.dynamic_pressure_factor, 0.0005);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let g = PhysicsGlobals::from_json_str(r#"{ "drag_multiplier": 2.0 }"#).unwrap();
        assert_eq!(g.drag_multiplier, 2.0);
        assert_eq!(g.lift_multiplier, PhysicsGlobals::default().lift_multiplier);
        assert_eq!(g.body_lift_mach_curve, PhysicsGlobals::default().body_lift_mach_curve);
    }

    #[test]
    fn rejects_bad_mach_limit() {
        let err = PhysicsGlobals::from_json_str(r#"{ "mach_limit": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "mach_limit", .. }));

        let err = PhysicsGlobals::from_json_str(r#"{ "mach_limit": 40.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AboveMaximum { field: "mach_limit", value, max } if value == 40.0 && max == MAX_MACH
        ));

        // a lower limit is fine
        let g = PhysicsGlobals::from_json_str(r#"{ "mach_limit": 10.0 }"#).unwrap();
        assert_eq!(g.effective_mach_limit(), 10.0);
    }

    #[test]
    fn hand_built_limit_is_still_capped() {
        let g = PhysicsGlobals { mach_limit: 40.0, ..PhysicsGlobals::default() };
        assert_eq!(g.effective_mach_limit(), MAX_MACH);
    }

    #[test]
    fn load_reports_the_path() {
        let err = PhysicsGlobals::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join("aero-core-physics-globals-test.json");
        std::fs::write(&path, r#"{ "lift_multiplier": 0.5 }"#).unwrap();
        let g = PhysicsGlobals::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(g.lift_multiplier, 0.5);
    }
}
