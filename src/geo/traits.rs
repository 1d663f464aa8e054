extern crate nalgebra as na;

use super::*;

pub trait HasOrigin {
    fn get_origin(&self) -> P2;
    fn set_origin(&mut self, origin: P2);
}

impl HasOrigin for P2 {
    fn get_origin(&self) -> P2 {
        *self
    }
    fn set_origin(&mut self, origin: P2) {
        self.x = origin.x;
        self.y = origin.y;
    }
}

/// rotation in radians, always about the shape's own origin
pub trait Rotate
where
    Self: HasOrigin,
{
    fn get_rotation(&self) -> Float;
    fn set_rotation(&mut self, rotation: Float);
    fn look_at(&mut self, p: &P2) {
        let dir = p - self.get_origin();
        self.set_rotation(dir.y.atan2(dir.x));
    }
    /// tranformation from local (unrotated) to global
    fn rotate_point_around_origin(&self, p: &P2) -> P2 {
        rotate_around(p, &self.get_origin(), self.get_rotation())
    }
    /// tranformation from global to local (unrotated)
    fn to_local(&self, p: &P2) -> P2 {
        rotate_around(p, &self.get_origin(), -self.get_rotation())
    }
}

pub trait Scale {
    fn scale_position(&mut self, scale_x: Float, scale_y: Float);
    fn scale(&mut self, scale_x: Float, scale_y: Float);
}

impl Scale for P2 {
    fn scale(&mut self, _scale_x: Float, _scale_y: Float) {}
    fn scale_position(&mut self, scale_x: Float, scale_y: Float) {
        self.x *= scale_x;
        self.y *= scale_y;
    }
}

/// wether a shape contains a point
pub trait ContainsPoint {
    fn contains_point(&self, p: &P2) -> bool;
}

/// wether a shape completely contains another shape
pub trait Contains<T> {
    fn contains(&self, other: &T) -> bool;
}

pub trait Intersect<T> {
    type Intersection;

    fn intersect(&self, other: &T) -> Option<Self::Intersection>;

    fn does_collide(&self, other: &T) -> bool {
        self.intersect(other).is_some()
    }
}

pub trait HasGeometry {
    fn get_geometry(&self) -> Geo;
}
