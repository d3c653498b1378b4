//! Body lift and lifting-surface forces.

use aero_core::{project_on_plane, sign, PhysicsGlobals, Vec3};
use aero_craft::{AeroElement, LiftingSurface};

use crate::flow::FlowConditions;
use crate::ElementForces;

/// Lift from the element's hull, perpendicular to the flow.
///
/// `cube_lift` is the element-frame lift vector sampled from the drag cubes.
pub(crate) fn body_lift(
    element: &AeroElement,
    cube_lift: &Vec3,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> Vec3 {
    let scalar = element.body_lift_multiplier
        * globals.body_lift_multiplier
        * flow.dynamic_pressure
        * globals.body_lift_mach_curve.eval(flow.mach);
    let lift = element.to_world(&(cube_lift * scalar));
    project_on_plane(&lift, &flow.direction)
}

/// Lift and drag of one lifting surface: the fixed share, plus the actuated
/// share for control surfaces.
pub(crate) fn surface_forces(
    element: &AeroElement,
    surface: &LiftingSurface,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> ElementForces {
    let fixed_axis = element.to_world(&surface.forward_axis);
    let mut out = panel_forces(surface, &fixed_axis, 1.0 - surface.control_fraction(), flow, globals);

    if let Some(control) = surface.control {
        let actuated_axis = element.to_world(&control.actuated_forward);
        let actuated = panel_forces(surface, &actuated_axis, control.area_fraction, flow, globals);
        out.lift += actuated.lift;
        out.drag += actuated.drag;
    }
    out
}

/// `share` of the surface acting as a flat panel with normal `axis`.
fn panel_forces(
    surface: &LiftingSurface,
    axis: &Vec3,
    share: f64,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> ElementForces {
    let lift_q = flow.dynamic_pressure * 1000.0;
    let lift_vector = axis * surface.transform_sign;
    let lift_dot = flow.direction.dot(&lift_vector);
    let abs_dot = lift_dot.abs();

    let lift = -lift_vector
        * (share
            * sign(lift_dot)
            * surface.lift_curve.eval(abs_dot)
            * surface.lift_mach_curve.eval(flow.mach)
            * surface.deflection_lift_coeff
            * lift_q
            * globals.lift_multiplier);

    let drag = -flow.direction
        * (share
            * surface.drag_curve.eval(abs_dot)
            * surface.drag_mach_curve.eval(flow.mach)
            * surface.deflection_lift_coeff
            * lift_q
            * globals.lift_drag_multiplier);

    ElementForces { lift, drag }
}
