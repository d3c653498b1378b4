//! aero-atmosphere
//!
//! Empirical atmosphere model: temperature, pressure and density at a point
//! (or an altitude) around a celestial body, computed from the body's curves
//! without needing a live vessel at that location.
//!
//! Temperature is layered on the base profile:
//!
//!   T = T_base(alt) + atmSunMult(alt) * (latBias(lat) + latSunMult(lat) * sunDot + axialSunMult(sunAxialDot))
//!
//! where `sunDot` is the day/night exposure normalized into [0, 1] over the
//! range reachable by rotation at that latitude. Positions are taken in the
//! body's current frame, so the result stays accurate for a few weeks of
//! predicted flight.
//!
//! Exports:
//!   - `temperature(position, body, globals)`
//!   - `density_at_altitude(altitude, body)` (day/night averaged at the equator)
//!   - `density_at_position(position, body)`
//!   - `atmosphere_state(position, body, globals)`

mod body;

pub use body::{AtmosphericBody, CelestialBody, IDEAL_GAS_CONSTANT};

use std::f64::consts::FRAC_PI_2;

use aero_core::{normalize_or_zero, rotate_about, sign, PhysicsGlobals, Vec3};

/// Sun exposure used by the altitude-only approximation (half day, half night).
const AVERAGE_SUN_DOT: f64 = 0.5;
/// Axial sun alignment used by the altitude-only approximation.
const AVERAGE_SUN_AXIAL_DOT: f64 = 0.0;

/// Temperature, pressure and density at one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereState {
    pub altitude: f64,
    /// [K]
    pub temperature: f64,
    /// [kPa]
    pub pressure: f64,
    /// [kg/m^3]
    pub density: f64,
}

/// -------------------------
/// Temperature
/// -------------------------

/// Full positional temperature [K], including latitude and sun exposure.
pub fn temperature<B: AtmosphericBody + ?Sized>(
    position: &Vec3,
    body: &B,
    globals: &PhysicsGlobals,
) -> f64 {
    if !body.has_atmosphere() {
        return globals.space_temperature;
    }

    let altitude = body.altitude(position);
    if altitude > body.atmosphere_depth() {
        return globals.space_temperature;
    }

    let offset = temperature_offset(position, body);
    altitude_temperature(altitude, offset, body)
}

/// Latitude/sun dependent offset added on top of the base temperature profile.
fn temperature_offset<B: AtmosphericBody + ?Sized>(position: &Vec3, body: &B) -> f64 {
    let axis = body.rotation_axis();
    let up = normalize_or_zero(&(position - body.position()));

    let body_polar = axis.dot(&up).clamp(-1.0, 1.0).acos();
    // latitude in degrees, folded into one hemisphere
    let polar = if body_polar > FRAC_PI_2 { std::f64::consts::PI - body_polar } else { body_polar };
    let time = (FRAC_PI_2 - polar).to_degrees();

    let sun = normalize_or_zero(&(body.sun_position() - position));
    let sun_axial_dot = sun.dot(&axis);
    let sun_polar = sun_axial_dot.clamp(-1.0, 1.0).acos();

    // Extremes of the sun alignment reachable by spinning the body at this latitude.
    let sun_body_max_dot = (1.0 + (sun_polar - body_polar).cos()) * 0.5;
    let sun_body_min_dot = (1.0 + (sun_polar + body_polar).cos()) * 0.5;

    // Shift the local noon by 45° against the spin so the hottest point trails the sun.
    let lagged_up = rotate_about(&up, &axis, 45.0 * sign(body.rotation_period()));
    let sun_dot_corrected = (1.0 + sun.dot(&lagged_up)) * 0.5;

    let range = sun_body_max_dot - sun_body_min_dot;
    let sun_dot_normalized = if range.abs() < 1e-12 {
        AVERAGE_SUN_DOT
    } else {
        ((sun_dot_corrected - sun_body_min_dot) / range).clamp(0.0, 1.0)
    };

    body.latitude_temperature_bias_curve().evaluate(time)
        + body.latitude_temperature_sun_mult_curve().evaluate(time) * sun_dot_normalized
        + body.axial_temperature_sun_mult_curve().evaluate(sun_axial_dot)
}

/// Equator offset averaged over a day.
fn average_temperature_offset<B: AtmosphericBody + ?Sized>(body: &B) -> f64 {
    body.latitude_temperature_bias_curve().evaluate(0.0)
        + body.latitude_temperature_sun_mult_curve().evaluate(0.0) * AVERAGE_SUN_DOT
        + body.axial_temperature_sun_mult_curve().evaluate(AVERAGE_SUN_AXIAL_DOT)
}

fn altitude_temperature<B: AtmosphericBody + ?Sized>(altitude: f64, offset: f64, body: &B) -> f64 {
    body.base_temperature(altitude)
        + body.atmosphere_temperature_sun_mult_curve().evaluate(altitude) * offset
}

/// Day/night averaged equatorial temperature [K] at `altitude`.
pub fn average_temperature<B: AtmosphericBody + ?Sized>(
    altitude: f64,
    body: &B,
    globals: &PhysicsGlobals,
) -> f64 {
    if !body.has_atmosphere() || altitude > body.atmosphere_depth() {
        return globals.space_temperature;
    }
    altitude_temperature(altitude, average_temperature_offset(body), body)
}

/// -------------------------
/// Density
/// -------------------------

/// Air density [kg/m^3] at `altitude`.
///
/// Sun exposure needs an actual point on the body, so this uses the equatorial
/// day/night average. The error shrinks with altitude, which is where
/// trajectory prediction spends most of its samples.
pub fn density_at_altitude<B: AtmosphericBody + ?Sized>(altitude: f64, body: &B) -> f64 {
    if !body.has_atmosphere() || altitude > body.atmosphere_depth() {
        return 0.0;
    }

    let pressure = body.pressure(altitude);
    let temperature = altitude_temperature(altitude, average_temperature_offset(body), body);
    body.density(pressure, temperature)
}

/// Air density [kg/m^3] at `position`, using the full positional temperature.
pub fn density_at_position<B: AtmosphericBody + ?Sized>(position: &Vec3, body: &B) -> f64 {
    if !body.has_atmosphere() {
        return 0.0;
    }

    let altitude = body.altitude(position);
    if altitude > body.atmosphere_depth() {
        return 0.0;
    }

    let pressure = body.pressure(altitude);
    let temperature = altitude_temperature(altitude, temperature_offset(position, body), body);
    body.density(pressure, temperature)
}

/// Temperature, pressure and density at `position` in one pass.
pub fn atmosphere_state<B: AtmosphericBody + ?Sized>(
    position: &Vec3,
    body: &B,
    globals: &PhysicsGlobals,
) -> AtmosphereState {
    let altitude = body.altitude(position);
    if !body.has_atmosphere() || altitude > body.atmosphere_depth() {
        return AtmosphereState {
            altitude,
            temperature: globals.space_temperature,
            pressure: 0.0,
            density: 0.0,
        };
    }

    let pressure = body.pressure(altitude);
    let temperature = altitude_temperature(altitude, temperature_offset(position, body), body);
    AtmosphereState { altitude, temperature, pressure, density: body.density(pressure, temperature) }
}

/* -------------------------------- tests -------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::FloatCurve;
    use approx::assert_relative_eq;

    /// Flat 250 K atmosphere with a +10 K latitude bias and no sun terms.
    fn flat_body() -> CelestialBody {
        let mut body = CelestialBody::airless("Flat", 600_000.0);
        body.atmosphere = true;
        body.atmosphere_depth = 70_000.0;
        body.pressure_curve = FloatCurve::linear(&[(0.0, 100.0), (70_000.0, 0.0)]);
        body.temperature_curve = FloatCurve::constant(250.0);
        body.latitude_temperature_bias_curve = FloatCurve::constant(10.0);
        body.atmosphere_temperature_sun_mult_curve = FloatCurve::constant(1.0);
        body
    }

    #[test]
    fn airless_body_is_space() {
        let body = CelestialBody::airless("Mun", 200_000.0);
        let globals = PhysicsGlobals::default();
        let p = Vec3::new(210_000.0, 0.0, 0.0);
        assert_eq!(temperature(&p, &body, &globals), globals.space_temperature);
        assert_eq!(density_at_position(&p, &body), 0.0);
        assert_eq!(density_at_altitude(10.0, &body), 0.0);
        assert_eq!(average_temperature(10.0, &body, &globals), globals.space_temperature);
    }

    #[test]
    fn above_ceiling_is_space() {
        let body = flat_body();
        let globals = PhysicsGlobals::default();
        let p = Vec3::new(600_000.0 + 70_001.0, 0.0, 0.0);
        assert_eq!(temperature(&p, &body, &globals), globals.space_temperature);
        assert_eq!(density_at_position(&p, &body), 0.0);
        assert_eq!(density_at_altitude(70_001.0, &body), 0.0);

        let state = atmosphere_state(&p, &body, &globals);
        assert_eq!(state.density, 0.0);
        assert_eq!(state.pressure, 0.0);
        assert_relative_eq!(state.altitude, 70_001.0, epsilon = 1e-6);
    }

    #[test]
    fn bias_only_body_matches_closed_form() {
        let body = flat_body();
        let globals = PhysicsGlobals::default();
        let p = Vec3::new(0.0, 610_000.0, 0.0);
        assert_relative_eq!(temperature(&p, &body, &globals), 260.0, epsilon = 1e-9);

        let pressure = body.pressure(10_000.0);
        let expected = body.density(pressure, 260.0);
        assert_relative_eq!(density_at_altitude(10_000.0, &body), expected, epsilon = 1e-12);
        assert_relative_eq!(density_at_position(&p, &body), expected, epsilon = 1e-12);
    }

    #[test]
    fn day_side_is_warmer_than_night_side() {
        let mut body = flat_body();
        body.latitude_temperature_bias_curve = FloatCurve::default();
        body.latitude_temperature_sun_mult_curve = FloatCurve::constant(20.0);
        let globals = PhysicsGlobals::default();

        let r = 610_000.0;
        // sun sits far along +x; rotation is about +z
        let day = Vec3::new(r, 0.0, 0.0);
        let night = Vec3::new(-r, 0.0, 0.0);
        let t_day = temperature(&day, &body, &globals);
        let t_night = temperature(&night, &body, &globals);
        assert!(t_day > t_night, "day {t_day} should exceed night {t_night}");
        assert!((250.0..=270.0).contains(&t_day));
        assert!((250.0..=270.0).contains(&t_night));
    }

    /// Point at `lat_deg` north and `lon_deg` east of the sub-solar meridian.
    fn surface_point(r: f64, lat_deg: f64, lon_deg: f64) -> Vec3 {
        let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
        Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()) * r
    }

    #[test]
    fn mid_latitude_matches_hand_computed_exposure() {
        let mut body = flat_body();
        // sun effectively at infinity along +x, in the equatorial plane
        body.sun_position = Vec3::new(1.0e18, 0.0, 0.0);
        body.latitude_temperature_bias_curve = FloatCurve::linear(&[(0.0, 0.0), (90.0, 9.0)]);
        body.latitude_temperature_sun_mult_curve = FloatCurve::constant(20.0);
        let globals = PhysicsGlobals::default();

        // At latitude 30 the reachable alignment spans (1 +- cos 30) / 2, so the
        // normalised exposure reduces to (1 + cos(lon + lag)) / 2 with lag = 45.
        let expected = |lon_after_lag: f64| 250.0 + 3.0 + 20.0 * (1.0 + lon_after_lag.to_radians().cos()) * 0.5;

        let p = surface_point(610_000.0, 30.0, -20.0);
        assert_relative_eq!(temperature(&p, &body, &globals), expected(25.0), epsilon = 1e-6);

        // the southern hemisphere folds onto the northern one
        let south = surface_point(610_000.0, -30.0, -20.0);
        assert_relative_eq!(temperature(&south, &body, &globals), expected(25.0), epsilon = 1e-6);

        // retrograde spin lags the other way
        body.rotation_period = -body.rotation_period;
        assert_relative_eq!(temperature(&p, &body, &globals), expected(-65.0), epsilon = 1e-6);
    }

    #[test]
    fn pole_uses_average_exposure() {
        let mut body = flat_body();
        body.latitude_temperature_bias_curve = FloatCurve::default();
        body.latitude_temperature_sun_mult_curve = FloatCurve::constant(20.0);
        let globals = PhysicsGlobals::default();

        // at the pole the reachable sun alignment collapses to a point
        let pole = Vec3::new(0.0, 0.0, 610_000.0);
        let t = temperature(&pole, &body, &globals);
        assert!(t.is_finite());
        assert_relative_eq!(t, 260.0, epsilon = 1e-6);
    }
}
