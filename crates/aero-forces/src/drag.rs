//! Parasitic drag per drag model.

use aero_core::{angle_deg, lerp, PhysicsGlobals, Vec3};
use aero_craft::{AeroElement, CubeSample, DragCubeSource, DragModel};
use log::{debug, warn};

use crate::error::AeroError;
use crate::flow::FlowConditions;

/// Drag on one element plus the cube lift it carries into the body-lift model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ElementDrag {
    pub drag: Vec3,
    /// Element frame, per unit dynamic pressure.
    pub cube_lift: Vec3,
}

pub(crate) fn element_drag(
    element: &AeroElement,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> Result<ElementDrag, AeroError> {
    let dir = flow.direction;

    let out = match element.drag_model {
        DragModel::Default | DragModel::Cube => cube_drag(element, flow, globals)?,

        // Raw coefficient, without q.
        DragModel::Spherical => ElementDrag { drag: -dir * element.maximum_drag, ..Default::default() },

        DragModel::Cylindrical => {
            let reference = element.to_world(&element.drag_reference);
            let t = reference.dot(&dir).abs();
            let cd = lerp(element.minimum_drag, element.maximum_drag, t);
            ElementDrag { drag: -dir * cd, ..Default::default() }
        }

        DragModel::Conic => {
            let reference = element.to_world(&element.drag_reference);
            let t = angle_deg(&reference, &dir) / 180.0;
            let cd = lerp(element.minimum_drag, element.maximum_drag, t);
            ElementDrag { drag: -dir * cd, ..Default::default() }
        }

        DragModel::None => ElementDrag::default(),
    };
    Ok(out)
}

fn cube_drag(
    element: &AeroElement,
    flow: &FlowConditions,
    globals: &PhysicsGlobals,
) -> Result<ElementDrag, AeroError> {
    // Parts without cubes (struts, fuel lines) fall back to their scalar drag.
    let (drag, cube_lift) = if element.drag_cubes.is_empty() {
        (element.maximum_drag, Vec3::zeros())
    } else {
        let local_dir = element.to_local(&flow.direction);
        let sample = lookup_with_rebuild(element, &local_dir, flow.mach)?;
        let drag =
            sample.area_drag * globals.drag_cube_multiplier * flow.pseudo_reynolds_multiplier;
        (drag, sample.lift_force)
    };

    let scalar = flow.dynamic_pressure * drag * globals.drag_multiplier;
    Ok(ElementDrag { drag: -flow.direction * scalar, cube_lift })
}

/// One lookup, then at most one rebuild and a second lookup.
fn lookup_with_rebuild(
    element: &AeroElement,
    local_dir: &Vec3,
    mach: f64,
) -> Result<CubeSample, AeroError> {
    let cubes: &dyn DragCubeSource = element.drag_cubes.as_ref();
    match cubes.try_lookup(local_dir, mach) {
        Ok(sample) => Ok(sample),
        Err(first) => {
            debug!("drag cube lookup for `{}` failed ({first}), rebuilding", element.name);
            cubes.rebuild_for(local_dir, mach);
            cubes.try_lookup(local_dir, mach).map_err(|source| {
                warn!("drag cube lookup for `{}` failed again after rebuild: {source}", element.name);
                AeroError::DragCube { element: element.name.clone(), source }
            })
        }
    }
}
