//! Response curves
//!
//! Every empirical curve the atmosphere and force models consume is a pure
//! `f(x) -> y` lookup. `FloatCurve` is the keyframed implementation used by the
//! reference body and the physics configuration: cubic Hermite segments between
//! keys, clamped to the end values outside the key range.

use serde::{Deserialize, Serialize};

/// A pure scalar response curve.
pub trait Curve: Send + Sync {
    fn evaluate(&self, x: f64) -> f64;
}

impl<F> Curve for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}

/// One key of a `FloatCurve`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub in_tangent: f64,
    #[serde(default)]
    pub out_tangent: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value, in_tangent: 0.0, out_tangent: 0.0 }
    }

    pub fn with_tangents(time: f64, value: f64, in_tangent: f64, out_tangent: f64) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }
}

/// Keyframed Hermite curve. Keys are kept sorted by time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveRepr", into = "Vec<Keyframe>")]
pub struct FloatCurve {
    keys: Vec<Keyframe>,
}

/// On disk a curve is either full keyframes or `[time, value]` pairs (linear).
#[derive(Deserialize)]
#[serde(untagged)]
enum CurveRepr {
    // Tried first: a bare pair would otherwise parse as a flat-tangent keyframe.
    Points(Vec<(f64, f64)>),
    Keys(Vec<Keyframe>),
}

impl From<CurveRepr> for FloatCurve {
    fn from(repr: CurveRepr) -> Self {
        match repr {
            CurveRepr::Keys(keys) => Self::new(keys),
            CurveRepr::Points(points) => Self::linear(&points),
        }
    }
}

impl From<Vec<Keyframe>> for FloatCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<FloatCurve> for Vec<Keyframe> {
    fn from(curve: FloatCurve) -> Self {
        curve.keys
    }
}

impl FloatCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Single-key curve: `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self { keys: vec![Keyframe::new(0.0, value)] }
    }

    /// Piecewise-linear curve through `points` (tangents set to the segment slopes).
    pub fn linear(points: &[(f64, f64)]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let slope = |i: usize| -> f64 {
            let (t0, v0) = sorted[i];
            let (t1, v1) = sorted[i + 1];
            let dt = t1 - t0;
            if dt.abs() < f64::EPSILON { 0.0 } else { (v1 - v0) / dt }
        };

        let n = sorted.len();
        let keys = (0..n)
            .map(|i| {
                let in_tangent = if i > 0 { slope(i - 1) } else { 0.0 };
                let out_tangent = if i + 1 < n { slope(i) } else { 0.0 };
                Keyframe::with_tangents(sorted[i].0, sorted[i].1, in_tangent, out_tangent)
            })
            .collect();
        Self { keys }
    }

    pub fn add(&mut self, key: Keyframe) {
        let idx = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(idx, key);
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate the curve at `x`. Empty curves are 0.
    pub fn eval(&self, x: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if x.is_nan() {
            return f64::NAN;
        }
        if x <= first.time {
            return first.value;
        }
        if x >= last.time {
            return last.value;
        }

        // First key strictly after x; x is inside the range so 1 <= idx < len.
        let idx = self.keys.partition_point(|k| k.time <= x);
        hermite(&self.keys[idx - 1], &self.keys[idx], x)
    }
}

impl Curve for FloatCurve {
    fn evaluate(&self, x: f64) -> f64 {
        self.eval(x)
    }
}

#[inline]
fn hermite(k0: &Keyframe, k1: &Keyframe, x: f64) -> f64 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k1.value;
    }
    let s = (x - k0.time) / dt;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
}

/* -------------------------------- tests -------------------------------- */
