extern crate nalgebra as na;
use na::{Point2, Rotation2, Vector2};

pub mod listeners;

pub use listeners::*;

pub type Float = f64;
pub type P2 = Point2<Float>;
pub type V2 = Vector2<Float>;
pub const EPSILON: Float = 0.000_001;

pub fn between(num: Float, a: Float, b: Float) -> bool {
    (num >= a) && (num <= b)
}

/// rotates `p` around `center` by `angle` radians
pub fn rotate_around(p: &P2, center: &P2, angle: Float) -> P2 {
    if angle == 0.0 {
        return *p;
    }
    center + Rotation2::new(angle) * (p - center)
}

/// per axis absolute distance between two points
pub fn axis_distance(a: &P2, b: &P2) -> V2 {
    (b - a).abs()
}

/// projects all points onto `axis` and returns (min, max) of the projections
pub fn min_max_projection(axis: &V2, points: &[P2]) -> (Float, Float) {
    let mut min = Float::MAX;
    let mut max = Float::MIN;
    for p in points {
        let projection = p.coords.dot(axis);
        min = min.min(projection);
        max = max.max(projection);
    }
    (min, max)
}
