pub mod circle;
pub mod rect;
pub mod traits;

extern crate nalgebra as na;

pub use crate::utils::*;
pub use circle::*;
pub use na::{distance, distance_squared, Rotation2};
pub use rand::distributions::{Distribution, Standard};
pub use rand::Rng;
pub use rect::*;
pub use traits::*;
use serde::*;

/// Closed set of bounding shapes. Every predicate over a pair of shapes is a
/// single match on both variants.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Geo {
    GeoCircle(Circle),
    GeoRect(Rect),
}

impl Geo {
    pub fn intersects(&self, other: &Geo) -> bool {
        match (self, other) {
            (Geo::GeoCircle(c1), Geo::GeoCircle(c2)) => c1.does_collide(c2),
            (Geo::GeoCircle(c), Geo::GeoRect(r)) | (Geo::GeoRect(r), Geo::GeoCircle(c)) => {
                c.does_collide(r)
            }
            (Geo::GeoRect(r1), Geo::GeoRect(r2)) => r1.does_collide(r2),
        }
    }
}

impl Intersect<Geo> for Geo {
    type Intersection = ();
    fn intersect(&self, other: &Geo) -> Option<()> {
        if self.intersects(other) {
            Some(())
        } else {
            None
        }
    }
}

impl Contains<Geo> for Geo {
    fn contains(&self, other: &Geo) -> bool {
        match (self, other) {
            (Geo::GeoCircle(c1), Geo::GeoCircle(c2)) => c1.contains(c2),
            (Geo::GeoCircle(c), Geo::GeoRect(r)) => c.contains(r),
            (Geo::GeoRect(r), Geo::GeoCircle(c)) => r.contains(c),
            (Geo::GeoRect(r1), Geo::GeoRect(r2)) => r1.contains(r2),
        }
    }
}

impl ContainsPoint for Geo {
    fn contains_point(&self, p: &P2) -> bool {
        match self {
            Geo::GeoCircle(geo) => geo.contains_point(p),
            Geo::GeoRect(geo) => geo.contains_point(p),
        }
    }
}

impl Scale for Geo {
    fn scale(&mut self, scale_x: Float, scale_y: Float) {
        match self {
            Geo::GeoCircle(g) => g.scale(scale_x, scale_y),
            Geo::GeoRect(g) => g.scale(scale_x, scale_y),
        }
    }

    fn scale_position(&mut self, scale_x: Float, scale_y: Float) {
        match self {
            Geo::GeoCircle(g) => g.scale_position(scale_x, scale_y),
            Geo::GeoRect(g) => g.scale_position(scale_x, scale_y),
        }
    }
}

impl HasOrigin for Geo {
    fn get_origin(&self) -> P2 {
        match self {
            Geo::GeoCircle(circle) => circle.origin,
            Geo::GeoRect(rect) => rect.origin,
        }
    }

    fn set_origin(&mut self, origin: P2) {
        match self {
            Geo::GeoCircle(circle) => circle.origin = origin,
            Geo::GeoRect(rect) => rect.origin = origin,
        }
    }
}

impl Rotate for Geo {
    fn get_rotation(&self) -> Float {
        match self {
            Geo::GeoCircle(geo) => geo.get_rotation(),
            Geo::GeoRect(geo) => geo.get_rotation(),
        }
    }

    fn set_rotation(&mut self, rotation: Float) {
        match self {
            Geo::GeoCircle(geo) => geo.set_rotation(rotation),
            Geo::GeoRect(geo) => geo.set_rotation(rotation),
        }
    }
}

impl HasGeometry for Geo {
    fn get_geometry(&self) -> Geo {
        *self
    }
}

impl Distribution<Geo> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Geo {
        match rng.next_u32() % 2 {
            0 => Geo::GeoRect(rng.gen()),
            _ => Geo::GeoCircle(rng.gen()),
        }
    }
}

impl From<Rect> for Geo {
    fn from(rect: Rect) -> Self {
        Geo::GeoRect(rect)
    }
}
impl From<Circle> for Geo {
    fn from(circle: Circle) -> Self {
        Geo::GeoCircle(circle)
    }
}
