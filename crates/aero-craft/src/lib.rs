//! aero-craft
//!
//! Read-only snapshots of a craft's aerodynamic elements, as the force
//! aggregator consumes them:
//!
//!   - `AeroElement`: one per part. Orientation, drag model, drag cubes,
//!     body lift, and any lifting surfaces the part carries.
//!   - `LiftingSurface`: wing-like lift/drag keyed on the cosine between the
//!     flow and the surface normal, scaled by Mach curves.
//!   - `ControlSurfaceExtra`: the actuated share of a lifting surface and the
//!     direction its deflected panel currently faces.
//!
//! Axes follow the element frame: +Z is the element's "forward" (the surface
//! normal for wings), +Y is the drag reference default.

mod cubes;
mod error;

pub use cubes::{
    CubeSample, DragCube, DragCubeList, DragCubeListDef, DragCubeSource, DragFace, FACE_NORMALS,
};
pub use error::CubeLookupError;

use std::sync::Arc;

use aero_core::{FloatCurve, Rotation, Vec3};
use serde::{Deserialize, Serialize};

/// How an element's parasitic drag is modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragModel {
    /// Same as `Cube`.
    #[default]
    Default,
    Cube,
    Spherical,
    Cylindrical,
    Conic,
    None,
}

/// -------------------------
/// Lifting surfaces
/// -------------------------

/// Actuated part of a control surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlSurfaceExtra {
    /// Share of the surface area that deflects, in [0, 1].
    pub area_fraction: f64,
    /// Forward axis of the deflected panel, element frame.
    pub actuated_forward: Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiftingSurface {
    /// +1 or -1: which side of the panel counts as its lifting face.
    pub transform_sign: f64,
    /// Surface normal, element frame.
    pub forward_axis: Vec3,
    /// Lift coefficient by |cos| between flow and normal.
    pub lift_curve: FloatCurve,
    /// Drag coefficient by |cos| between flow and normal.
    pub drag_curve: FloatCurve,
    pub lift_mach_curve: FloatCurve,
    pub drag_mach_curve: FloatCurve,
    pub deflection_lift_coeff: f64,
    #[serde(default)]
    pub control: Option<ControlSurfaceExtra>,
}

impl LiftingSurface {
    /// A fixed wing panel with generic subsonic/supersonic curves.
    pub fn wing(deflection_lift_coeff: f64) -> Self {
        Self {
            transform_sign: 1.0,
            forward_axis: Vec3::z(),
            lift_curve: FloatCurve::linear(&[
                (0.0, 0.0),
                (0.258_819, 0.8),
                (0.5, 1.4),
                (0.707_107, 1.0),
                (1.0, 0.0),
            ]),
            drag_curve: FloatCurve::linear(&[(0.0, 0.01), (0.5, 0.35), (1.0, 1.0)]),
            lift_mach_curve: FloatCurve::linear(&[
                (0.0, 1.0),
                (0.8, 1.0),
                (1.0, 0.8),
                (2.0, 0.5),
                (25.0, 0.15),
            ]),
            drag_mach_curve: FloatCurve::linear(&[
                (0.0, 1.0),
                (0.85, 1.0),
                (1.1, 1.6),
                (2.0, 1.2),
                (25.0, 0.6),
            ]),
            deflection_lift_coeff,
            control: None,
        }
    }

    /// Turn this surface into a control surface.
    pub fn with_control(mut self, area_fraction: f64, actuated_forward: Vec3) -> Self {
        self.control = Some(ControlSurfaceExtra { area_fraction, actuated_forward });
        self
    }

    /// Actuated share of the area, 0 for plain wings.
    pub fn control_fraction(&self) -> f64 {
        self.control.map_or(0.0, |c| c.area_fraction)
    }
}

/// -------------------------
/// Elements
/// -------------------------

/// One aerodynamic part of a craft.
#[derive(Clone, Debug)]
pub struct AeroElement {
    pub name: String,
    /// Element-to-world rotation.
    pub orientation: Rotation,
    pub drag_model: DragModel,
    /// Hidden behind another part (fairing, cargo bay).
    pub shielded: bool,
    /// Parts without a physical body receive no force.
    pub has_rigidbody: bool,
    pub minimum_drag: f64,
    pub maximum_drag: f64,
    /// Axis used by the cylindrical and conic models, element frame.
    pub drag_reference: Vec3,
    pub drag_cubes: Arc<dyn DragCubeSource>,
    pub body_lift_multiplier: f64,
    pub lifting_surfaces: Vec<LiftingSurface>,
}

impl AeroElement {
    /// Unshielded cube-drag element with an empty cube list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orientation: Rotation::identity(),
            drag_model: DragModel::Cube,
            shielded: false,
            has_rigidbody: true,
            minimum_drag: 0.0,
            maximum_drag: 0.0,
            drag_reference: Vec3::y(),
            drag_cubes: Arc::new(DragCubeList::empty()),
            body_lift_multiplier: 1.0,
            lifting_surfaces: Vec::new(),
        }
    }

    pub fn with_orientation(mut self, orientation: Rotation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_drag_model(mut self, drag_model: DragModel) -> Self {
        self.drag_model = drag_model;
        self
    }

    pub fn with_drag_range(mut self, minimum_drag: f64, maximum_drag: f64) -> Self {
        self.minimum_drag = minimum_drag;
        self.maximum_drag = maximum_drag;
        self
    }

    pub fn with_drag_reference(mut self, drag_reference: Vec3) -> Self {
        self.drag_reference = drag_reference;
        self
    }

    pub fn with_drag_cubes(mut self, drag_cubes: Arc<dyn DragCubeSource>) -> Self {
        self.drag_cubes = drag_cubes;
        self
    }

    pub fn with_body_lift_multiplier(mut self, multiplier: f64) -> Self {
        self.body_lift_multiplier = multiplier;
        self
    }

    pub fn with_lifting_surface(mut self, surface: LiftingSurface) -> Self {
        self.lifting_surfaces.push(surface);
        self
    }

    pub fn shielded(mut self, shielded: bool) -> Self {
        self.shielded = shielded;
        self
    }

    /// Wings and control surfaces replace body lift.
    pub fn has_lift_module(&self) -> bool {
        !self.lifting_surfaces.is_empty()
    }

    /// Whether the airstream acts on this element at all.
    pub fn is_exposed(&self) -> bool {
        !self.shielded && self.has_rigidbody
    }

    /// Element-frame vector expressed in world space.
    pub fn to_world(&self, local: &Vec3) -> Vec3 {
        self.orientation * local
    }

    /// World vector expressed in the element frame.
    pub fn to_local(&self, world: &Vec3) -> Vec3 {
        self.orientation.inverse_transform_vector(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::UnitQuaternion;
    use approx::assert_abs_diff_eq;

    #[test]
    fn frames_round_trip() {
        let el = AeroElement::new("tail").with_orientation(UnitQuaternion::from_euler_angles(
            0.3, -0.2, 1.1,
        ));
        let v = Vec3::new(1.0, 2.0, -3.0);
        let back = el.to_local(&el.to_world(&v));
        assert_abs_diff_eq!((back - v).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn exposure_and_lift_module_flags() {
        let wing = AeroElement::new("wing").with_lifting_surface(LiftingSurface::wing(1.0));
        assert!(wing.has_lift_module());
        assert!(wing.is_exposed());
        assert!(!wing.clone().shielded(true).is_exposed());

        let mut ghost = AeroElement::new("ghost");
        ghost.has_rigidbody = false;
        assert!(!ghost.is_exposed());
        assert!(!ghost.has_lift_module());
    }

    #[test]
    fn control_fraction_defaults_to_zero() {
        let plain = LiftingSurface::wing(0.5);
        assert_eq!(plain.control_fraction(), 0.0);
        let flap = plain.with_control(0.3, Vec3::z());
        assert_eq!(flap.control_fraction(), 0.3);
    }
}
