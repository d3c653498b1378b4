use aero_atmosphere::{density_at_altitude, AtmosphericBody};
use aero_core::{normalize_or_zero, PhysicsGlobals, Vec3};

/// Free-stream quantities shared by every element during one force query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowConditions {
    pub altitude: f64,
    /// [rad]
    pub latitude: f64,
    /// [kg/m^3]
    pub density: f64,
    /// [kPa]
    pub pressure: f64,
    /// [m/s]
    pub speed_of_sound: f64,
    pub speed: f64,
    /// Clamped to [0, `PhysicsGlobals::effective_mach_limit`], never above 25.
    pub mach: f64,
    /// [kPa]
    pub dynamic_pressure: f64,
    /// Drag multiplier from the pseudo-Reynolds curve (rho * |v|).
    pub pseudo_reynolds_multiplier: f64,
    /// Unit direction of travel (zero when at rest).
    pub direction: Vec3,
}

impl FlowConditions {
    /// Resolve the flow at `altitude`, or `None` when there is no air to act.
    ///
    /// Density uses the day/night averaged temperature, so `latitude` is only
    /// carried along for the caller.
    pub fn resolve<B: AtmosphericBody + ?Sized>(
        velocity: &Vec3,
        altitude: f64,
        latitude: f64,
        body: &B,
        globals: &PhysicsGlobals,
    ) -> Option<Self> {
        let density = density_at_altitude(altitude, body);
        if !(density > 0.0) {
            return None;
        }

        let pressure = body.pressure(altitude);
        let speed = velocity.norm();
        let speed_of_sound = body.speed_of_sound(pressure, density);

        let mach_limit = globals.effective_mach_limit();
        let mach = if speed_of_sound > 0.0 {
            speed / speed_of_sound
        } else if speed > 0.0 {
            mach_limit
        } else {
            0.0
        };
        let mach = mach.clamp(0.0, mach_limit);

        let dynamic_pressure = globals.dynamic_pressure_factor * density * speed * speed;
        let pseudo_reynolds_multiplier = globals.drag_curve_pseudo_reynolds.eval(density * speed);

        Some(Self {
            altitude,
            latitude,
            density,
            pressure,
            speed_of_sound,
            speed,
            mach,
            dynamic_pressure,
            pseudo_reynolds_multiplier,
            direction: normalize_or_zero(velocity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_atmosphere::CelestialBody;
    use aero_core::FloatCurve;
    use approx::assert_relative_eq;

    fn body() -> CelestialBody {
        let mut body = CelestialBody::airless("Test", 600_000.0);
        body.atmosphere = true;
        body.atmosphere_depth = 70_000.0;
        body.pressure_curve = FloatCurve::constant(101.325);
        body.temperature_curve = FloatCurve::constant(288.15);
        body
    }

    #[test]
    fn subsonic_flow_numbers() {
        let globals = PhysicsGlobals::default();
        let b = body();
        let v = Vec3::new(0.0, 100.0, 0.0);
        let flow = FlowConditions::resolve(&v, 1_000.0, 0.2, &b, &globals).unwrap();

        assert_relative_eq!(flow.density, 1.225, epsilon = 1e-3);
        assert_relative_eq!(flow.mach, 100.0 / flow.speed_of_sound, epsilon = 1e-12);
        assert_relative_eq!(flow.dynamic_pressure, 0.0005 * flow.density * 1.0e4, epsilon = 1e-12);
        assert_eq!(flow.direction, Vec3::y());
        assert_eq!(flow.latitude, 0.2);
    }

    #[test]
    fn mach_is_clamped() {
        let globals = PhysicsGlobals::default();
        let b = body();
        let v = Vec3::new(20_000.0, 0.0, 0.0);
        let flow = FlowConditions::resolve(&v, 1_000.0, 0.0, &b, &globals).unwrap();
        assert_eq!(flow.mach, 25.0);
    }

    #[test]
    fn oversized_limit_cannot_lift_the_mach_cap() {
        // bypasses validate(), as a struct literal would
        let globals = PhysicsGlobals { mach_limit: 40.0, ..PhysicsGlobals::default() };
        let v = Vec3::new(20_000.0, 0.0, 0.0);
        let flow = FlowConditions::resolve(&v, 1_000.0, 0.0, &body(), &globals).unwrap();
        assert!(v.norm() / flow.speed_of_sound > 40.0);
        assert_eq!(flow.mach, 25.0);

        let slower = PhysicsGlobals { mach_limit: 5.0, ..PhysicsGlobals::default() };
        let flow = FlowConditions::resolve(&v, 1_000.0, 0.0, &body(), &slower).unwrap();
        assert_eq!(flow.mach, 5.0);
    }

    #[test]
    fn at_rest_has_no_direction() {
        let globals = PhysicsGlobals::default();
        let flow = FlowConditions::resolve(&Vec3::zeros(), 1_000.0, 0.0, &body(), &globals).unwrap();
        assert_eq!(flow.direction, Vec3::zeros());
        assert_eq!(flow.mach, 0.0);
        assert_eq!(flow.dynamic_pressure, 0.0);
    }

    #[test]
    fn vacuum_resolves_to_none() {
        let globals = PhysicsGlobals::default();
        let b = body();
        assert!(FlowConditions::resolve(&Vec3::x(), 71_000.0, 0.0, &b, &globals).is_none());
        let airless = CelestialBody::airless("Mun", 200_000.0);
        assert!(FlowConditions::resolve(&Vec3::x(), 0.0, 0.0, &airless, &globals).is_none());
    }
}
