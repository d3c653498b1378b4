//! aero-forces
//!
//! Net aerodynamic force on a craft made of several aerodynamic elements,
//! sampled at an arbitrary velocity and altitude (or position) so that a
//! trajectory predictor can query it repeatedly along a simulated path.
//!
//! One query:
//!   1. resolve the free stream once: density (averaged atmosphere), pressure,
//!      speed of sound, Mach (clamped), q = k·ρ·|v|², pseudo-Reynolds multiplier;
//!   2. for every exposed element, add its parasitic drag (cube, spherical,
//!      cylindrical, conic or none), its body lift (elements without lifting
//!      surfaces) and the lift/drag of each lifting surface;
//!   3. return total lift + total drag, in the frame of the input velocity.
//!
//! No atmosphere means no force: the query short-circuits to zero before any
//! element is touched. Queries keep no state between calls.

mod drag;
mod error;
mod flow;
mod lift;

pub use error::AeroError;
pub use flow::FlowConditions;

use aero_atmosphere::AtmosphericBody;
use aero_core::{is_finite_vec, PhysicsGlobals, Vec3};
use aero_craft::AeroElement;
use log::trace;

/// Lift and drag contributed by one element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementForces {
    pub lift: Vec3,
    pub drag: Vec3,
}

impl ElementForces {
    pub fn total(&self) -> Vec3 {
        self.lift + self.drag
    }
}

/// Per-element view of one force query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceBreakdown {
    pub total_lift: Vec3,
    pub total_drag: Vec3,
    /// Same order as the input elements; skipped elements are zero.
    pub elements: Vec<ElementForces>,
    /// `None` when the query short-circuited (no air).
    pub flow: Option<FlowConditions>,
}

impl ForceBreakdown {
    pub fn total(&self) -> Vec3 {
        self.total_lift + self.total_drag
    }
}

/// -------------------------
/// Force queries
/// -------------------------

/// Net aerodynamic force at `altitude`/`latitude` (radians).
pub fn aero_force<B: AtmosphericBody + ?Sized>(
    elements: &[AeroElement],
    velocity: &Vec3,
    altitude: f64,
    latitude: f64,
    body: &B,
    globals: &PhysicsGlobals,
) -> Result<Vec3, AeroError> {
    check_inputs(velocity, altitude, latitude)?;

    let Some(flow) = FlowConditions::resolve(velocity, altitude, latitude, body, globals) else {
        return Ok(Vec3::zeros());
    };
    trace_flow(&flow);

    let mut total_lift = Vec3::zeros();
    let mut total_drag = Vec3::zeros();
    for element in elements.iter().filter(|e| e.is_exposed()) {
        let f = element_forces(element, &flow, globals)?;
        total_lift += f.lift;
        total_drag += f.drag;
    }
    Ok(total_lift + total_drag)
}

/// Net aerodynamic force at a point; altitude and latitude come from the body.
pub fn aero_force_at_position<B: AtmosphericBody + ?Sized>(
    elements: &[AeroElement],
    velocity: &Vec3,
    position: &Vec3,
    body: &B,
    globals: &PhysicsGlobals,
) -> Result<Vec3, AeroError> {
    if !is_finite_vec(position) {
        return Err(AeroError::NonFiniteInput { what: "position" });
    }
    let altitude = body.altitude(position);
    let latitude = body.latitude(position);
    aero_force(elements, velocity, altitude, latitude, body, globals)
}

/// Same computation as `aero_force`, keeping each element's contribution.
pub fn aero_force_breakdown<B: AtmosphericBody + ?Sized>(
    elements: &[AeroElement],
    velocity: &Vec3,
    altitude: f64,
    latitude: f64,
    body: &B,
    globals: &PhysicsGlobals,
) -> Result<ForceBreakdown, AeroError> {
    check_inputs(velocity, altitude, latitude)?;

    let Some(flow) = FlowConditions::resolve(velocity, altitude, latitude, body, globals) else {
        return Ok(ForceBreakdown {
            elements: vec![ElementForces::default(); elements.len()],
            ..Default::default()
        });
    };
    trace_flow(&flow);

    let mut out = ForceBreakdown { flow: Some(flow), ..Default::default() };
    out.elements.reserve(elements.len());
    for element in elements {
        let f = if element.is_exposed() {
            element_forces(element, &flow, globals)?
        } else {
            ElementForces::default()
        };
        out.total_lift += f.lift;
        out.total_drag += f.drag;
        out.elements.push(f);
    }
    Ok(out)
}

fn check_inputs(velocity: &Vec3, altitude: f64, latitude: f64) -> Result<(), AeroError> {
    if !is_finite_vec(velocity) {
        return Err(AeroError::NonFiniteInput { what: "velocity" });
    }
    if !altitude.is_finite() {
        return Err(AeroError::NonFiniteInput { what: "altitude" });
    }
    if !latitude.is_finite() {
        return Err(AeroError::NonFiniteInput { what: "latitude" });
    }
    Ok(())
}

fn trace_flow(flow: &FlowConditions) {
    trace!(
        "aero query: alt={:.1} rho={:.5} mach={:.3} q={:.4} re_mult={:.3}",
        flow.altitude,
        flow.density,
        flow.mach,
        flow.dynamic_pressure,
        flow.pseudo_reynolds_multiplier
    );
}

/// Drag, body lift and lifting-surface forces of one exposed element.
fn element_forces(
    element: &AeroElement,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> Result<ElementForces, AeroError> {
    let parasitic = drag::element_drag(element, flow, globals)?;
    let mut out = ElementForces { lift: Vec3::zeros(), drag: parasitic.drag };

    if !element.has_lift_module() {
        out.lift += lift::body_lift(element, &parasitic.cube_lift, flow, globals);
    }

    for surface in &element.lifting_surfaces {
        let f = lift::surface_forces(element, surface, flow, globals);
        out.lift += f.lift;
        out.drag += f.drag;
    }
    Ok(out)
}

/// -------------------------
/// Bound model
/// -------------------------

/// Aerodynamic force provider sampled by a trajectory integrator.
pub trait AeroModel {
    fn aero_force(&self, velocity: &Vec3, altitude: f64, latitude: f64) -> Result<Vec3, AeroError>;

    fn aero_force_at_position(&self, velocity: &Vec3, position: &Vec3) -> Result<Vec3, AeroError>;
}

/// A craft, the body it flies through and the physics constants, bound together.
pub struct CraftAeroModel<'a, B: AtmosphericBody + ?Sized> {
    pub elements: &'a [AeroElement],
    pub body: &'a B,
    pub globals: &'a PhysicsGlobals,
}

impl<'a, B: AtmosphericBody + ?Sized> CraftAeroModel<'a, B> {
    pub fn new(elements: &'a [AeroElement], body: &'a B, globals: &'a PhysicsGlobals) -> Self {
        Self { elements, body, globals }
    }

    pub fn breakdown(
        &self,
        velocity: &Vec3,
        altitude: f64,
        latitude: f64,
    ) -> Result<ForceBreakdown, AeroError> {
        aero_force_breakdown(self.elements, velocity, altitude, latitude, self.body, self.globals)
    }
}

impl<B: AtmosphericBody + ?Sized> AeroModel for CraftAeroModel<'_, B> {
    fn aero_force(&self, velocity: &Vec3, altitude: f64, latitude: f64) -> Result<Vec3, AeroError> {
        aero_force(self.elements, velocity, altitude, latitude, self.body, self.globals)
    }

    fn aero_force_at_position(&self, velocity: &Vec3, position: &Vec3) -> Result<Vec3, AeroError> {
        aero_force_at_position(self.elements, velocity, position, self.body, self.globals)
    }
}
