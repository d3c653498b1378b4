//! Drag cubes
//!
//! A drag cube summarises an element's shape as six axis-aligned faces, each
//! with an exposed area, a drag coefficient and a lift coefficient. An element
//! can carry several named cubes (e.g. stowed and deployed) that are blended by
//! weight into the cube actually sampled.
//!
//! The blend is cached. Changing a weight invalidates the cache and lookups
//! then fail with `CubeLookupError::NotBuilt` until `rebuild_for` runs, which is
//! what the force aggregator's rebuild-and-retry path recovers from. Weights and
//! the cache share one lock, so a list can be re-weighted while elements hold it
//! behind an `Arc`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use aero_core::{normalize_or_zero, FloatCurve, Vec3};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::CubeLookupError;

/// Outward face normals in element space, in `DragCube::faces` order.
pub const FACE_NORMALS: [[f64; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// Result of sampling a cube for one flow direction and Mach number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubeSample {
    /// Exposed area times drag coefficient [m^2].
    pub area_drag: f64,
    /// Body-lift force per unit dynamic pressure, element frame.
    pub lift_force: Vec3,
}

/// Interpolated drag/lift lookup with an explicit rebuild step.
///
/// `direction` is the element-frame direction of travel through the air.
/// Implementations must serialise concurrent rebuilds of the same table.
pub trait DragCubeSource: Send + Sync + std::fmt::Debug {
    /// True when the element carries no cube at all (struts, fuel lines).
    fn is_empty(&self) -> bool;

    fn try_lookup(&self, direction: &Vec3, mach: f64) -> Result<CubeSample, CubeLookupError>;

    /// Rebuild the cached table so the next lookup for this flow succeeds.
    fn rebuild_for(&self, direction: &Vec3, mach: f64);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DragFace {
    /// [m^2]
    pub area: f64,
    pub drag_coefficient: f64,
    #[serde(default)]
    pub lift_coefficient: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragCube {
    pub name: String,
    /// Initial blend weight; `DragCubeList::set_weight` changes the live one.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// +X, -X, +Y, -Y, +Z, -Z
    pub faces: [DragFace; 6],
}

fn default_weight() -> f64 {
    1.0
}

fn default_mach_drag() -> FloatCurve {
    FloatCurve::constant(1.0)
}

impl DragCube {
    /// Every face identical: a crude box/sphere stand-in.
    pub fn uniform(name: impl Into<String>, area: f64, drag_coefficient: f64) -> Self {
        let face = DragFace { area, drag_coefficient, lift_coefficient: 0.0 };
        Self { name: name.into(), weight: 1.0, faces: [face; 6] }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BlendedCube {
    faces: [DragFace; 6],
}

/// Live weights (one per cube) and the blend built from them.
#[derive(Debug)]
struct CubeTable {
    weights: Vec<f64>,
    blended: Option<BlendedCube>,
}

/// The reference `DragCubeSource`: weighted named cubes plus a Mach drag curve.
#[derive(Debug)]
pub struct DragCubeList {
    cubes: Vec<DragCube>,
    mach_drag: FloatCurve,
    table: RwLock<CubeTable>,
}

/// On-disk form of a cube list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DragCubeListDef {
    #[serde(default)]
    pub cubes: Vec<DragCube>,
    #[serde(default = "default_mach_drag")]
    pub mach_drag: FloatCurve,
}

impl From<DragCubeListDef> for DragCubeList {
    fn from(def: DragCubeListDef) -> Self {
        Self::new(def.cubes, def.mach_drag)
    }
}

impl Default for DragCubeList {
    fn default() -> Self {
        Self::empty()
    }
}

impl DragCubeList {
    /// Build a list and blend it immediately.
    pub fn new(cubes: Vec<DragCube>, mach_drag: FloatCurve) -> Self {
        let weights: Vec<f64> = cubes.iter().map(|c| c.weight).collect();
        let blended = blend(&cubes, &weights);
        Self { cubes, mach_drag, table: RwLock::new(CubeTable { weights, blended }) }
    }

    pub fn single(cube: DragCube) -> Self {
        Self::new(vec![cube], default_mach_drag())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), default_mach_drag())
    }

    /// Cube shapes, carrying their initial weights.
    pub fn cubes(&self) -> &[DragCube] {
        &self.cubes
    }

    /// Current blend weight of a named cube.
    pub fn weight(&self, name: &str) -> Option<f64> {
        let idx = self.index_of(name)?;
        Some(self.read_table().weights[idx])
    }

    /// Change a named cube's blend weight. Returns false if no cube has that name.
    /// The cached blend is dropped; lookups fail until the next rebuild.
    pub fn set_weight(&self, name: &str, weight: f64) -> bool {
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        let mut table = self.write_table();
        table.weights[idx] = weight;
        table.blended = None;
        true
    }

    /// Drop the cached blend.
    pub fn invalidate(&self) {
        self.write_table().blended = None;
    }

    pub fn is_built(&self) -> bool {
        self.read_table().blended.is_some()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.cubes.iter().position(|c| c.name == name)
    }

    fn read_table(&self) -> RwLockReadGuard<'_, CubeTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, CubeTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DragCubeSource for DragCubeList {
    fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    fn try_lookup(&self, direction: &Vec3, mach: f64) -> Result<CubeSample, CubeLookupError> {
        if self.cubes.is_empty() {
            return Err(CubeLookupError::Empty);
        }
        if !direction.iter().all(|c| c.is_finite()) || !mach.is_finite() {
            return Err(CubeLookupError::NonFiniteSample);
        }

        let table = self.read_table();
        let cube = table.blended.as_ref().ok_or(CubeLookupError::NotBuilt)?;

        let d = normalize_or_zero(direction);
        let mach_mult = self.mach_drag.eval(mach);

        let mut sample = CubeSample::default();
        for (face, n) in cube.faces.iter().zip(FACE_NORMALS) {
            let n = Vec3::new(n[0], n[1], n[2]);
            // Only faces turned into the oncoming air see it.
            let exposure = n.dot(&d).max(0.0);
            if exposure <= 0.0 {
                continue;
            }
            sample.area_drag += exposure * face.area * face.drag_coefficient * mach_mult;
            // Oblique incidence pushes the face back along its normal; keep the
            // part across the flow.
            let across = n - d * n.dot(&d);
            sample.lift_force -= across * (exposure * face.area * face.lift_coefficient);
        }
        Ok(sample)
    }

    fn rebuild_for(&self, direction: &Vec3, mach: f64) {
        let mut table = self.write_table();
        trace!(
            "rebuilding {} drag cube(s) for direction {:?} at mach {mach:.3}",
            self.cubes.len(),
            direction.as_slice()
        );
        table.blended = blend(&self.cubes, &table.weights);
    }
}

/// Weighted average of all cubes; equal weights when none are positive.
fn blend(cubes: &[DragCube], weights: &[f64]) -> Option<BlendedCube> {
    if cubes.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    let weight_of = |w: f64| -> f64 {
        if total > 0.0 {
            w.max(0.0) / total
        } else {
            1.0 / cubes.len() as f64
        }
    };

    let mut faces = [DragFace::default(); 6];
    for (cube, &raw) in cubes.iter().zip(weights) {
        let w = weight_of(raw);
        for (acc, face) in faces.iter_mut().zip(cube.faces.iter()) {
            acc.area += w * face.area;
            acc.drag_coefficient += w * face.drag_coefficient;
            acc.lift_coefficient += w * face.lift_coefficient;
        }
    }
    Some(BlendedCube { faces })
}

/* -------------------------------- tests -------------------------------- */
