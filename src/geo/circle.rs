extern crate nalgebra as na;
use super::rect::Rect;
use super::traits::*;
use super::Geo;
use crate::utils::*;
use na::distance;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Circle {
    pub origin: P2,
    /// carried for symmetry with `Rect`, has no effect on any predicate
    pub rotation: Float,
    pub radius: Float,
}

impl Circle {
    pub fn new(origin: P2, radius: Float) -> Circle {
        Circle {
            origin,
            rotation: 0.0,
            radius,
        }
    }

    pub fn area(&self) -> Float {
        PI * self.radius * self.radius
    }

    pub fn circumference(&self) -> Float {
        2.0 * PI * self.radius
    }
}

impl Intersect<Circle> for Circle {
    // distance between the centers
    type Intersection = Float;
    fn intersect(&self, other: &Circle) -> Option<Float> {
        let dist: Float = distance(&self.origin, &other.origin);
        if dist < (self.radius + other.radius) {
            Some(dist)
        } else {
            None
        }
    }
}

impl Intersect<Rect> for Circle {
    type Intersection = ();

    fn intersect(&self, rect: &Rect) -> Option<()> {
        let local = rect.to_local(&self.origin);
        let circle_distance = axis_distance(&local, &rect.origin);
        let half_width = rect.half_width();
        let half_height = rect.half_height();

        if circle_distance.x > half_width + self.radius
            || circle_distance.y > half_height + self.radius
        {
            return None;
        }
        if circle_distance.x <= half_width || circle_distance.y <= half_height {
            return Some(());
        }

        let corner_distance_sq =
            (circle_distance.x - half_width).powi(2) + (circle_distance.y - half_height).powi(2);
        if corner_distance_sq <= self.radius * self.radius {
            Some(())
        } else {
            None
        }
    }
}

impl ContainsPoint for Circle {
    fn contains_point(&self, p: &P2) -> bool {
        distance(&self.origin, p) < self.radius
    }
}

impl Contains<Circle> for Circle {
    fn contains(&self, other: &Circle) -> bool {
        distance(&self.origin, &other.origin) + other.radius <= self.radius
    }
}

impl Contains<Rect> for Circle {
    fn contains(&self, rect: &Rect) -> bool {
        rect.corners().iter().all(|corner| self.contains_point(corner))
    }
}

impl HasOrigin for Circle {
    fn get_origin(&self) -> P2 {
        self.origin
    }
    fn set_origin(&mut self, origin: P2) {
        self.origin = origin;
    }
}

impl Rotate for Circle {
    fn get_rotation(&self) -> Float {
        self.rotation
    }
    fn set_rotation(&mut self, rotation: Float) {
        self.rotation = rotation;
    }
}

impl Scale for Circle {
    /// only `scale_x` applies to the radius
    fn scale(&mut self, scale_x: Float, _scale_y: Float) {
        self.radius *= scale_x;
    }
    fn scale_position(&mut self, scale_x: Float, scale_y: Float) {
        self.origin.x *= scale_x;
        self.origin.y *= scale_y;
    }
}

impl Distribution<Circle> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Circle {
        Circle {
            origin: rng.gen(),
            rotation: 0.0,
            radius: rng.gen(),
        }
    }
}

impl HasGeometry for Circle {
    fn get_geometry(&self) -> Geo {
        Geo::GeoCircle(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_circumference() {
        let circle = Circle::new(P2::origin(), 10.0);
        assert_eq!(circle.area().round(), 314.0);
        assert_eq!(circle.circumference().round(), 63.0);
    }

    #[test]
    fn circle_circle_boundary_is_exclusive() {
        let circle1 = Circle::new(P2::new(10.0, 5.0), 10.0);
        let mut circle2 = Circle::new(P2::new(17.0, 5.0), 6.0);
        assert!(circle1.does_collide(&circle2));

        circle2.origin.x = -5.0;
        assert!(circle1.does_collide(&circle2));

        circle2.origin.x = -6.0;
        assert!(!circle1.does_collide(&circle2));
    }

    #[test]
    fn circle_rect() {
        let mut rect = Rect::new(P2::new(5.0, 3.0), 0.0, 10.0, 6.0);
        let mut circle = Circle::new(P2::new(14.0, 3.0), 3.0);
        assert!(!circle.does_collide(&rect));

        circle.origin.x -= 1.0;
        assert!(circle.does_collide(&rect));

        rect.rotation = PI * 0.5;
        rect.origin = P2::new(3.0, 5.0);
        circle.origin = P2::new(8.0, 12.0);
        assert!(circle.does_collide(&rect));

        let mut circle = Circle::new(P2::new(156.0, 165.0), 50.0);
        let rect = Rect::new(P2::new(300.0, 200.0), 0.0, 200.0, 100.0);
        assert!(circle.does_collide(&rect));

        circle.origin = P2::new(300.0, 350.0);
        assert!(!circle.does_collide(&rect));
    }

    #[test]
    fn circle_rect_corner_region() {
        let rect = Rect::new(P2::origin(), 0.0, 2.0, 2.0);
        // diagonal distance from corner (1, 1) is sqrt(2) ~ 1.414
        assert!(Circle::new(P2::new(2.0, 2.0), 1.5).does_collide(&rect));
        assert!(!Circle::new(P2::new(2.0, 2.0), 1.4).does_collide(&rect));
    }

    #[test]
    fn contains_point_is_strict() {
        let circle = Circle::new(P2::new(10.0, 5.0), 10.0);
        assert!(!circle.contains_point(&P2::origin()));
        assert!(circle.contains_point(&P2::new(3.0, 3.0)));
        assert!(!circle.contains_point(&P2::new(20.0, 5.0)));
    }

    #[test]
    fn contains_circle() {
        let circle = Circle::new(P2::new(1.0, 1.0), 5.0);
        assert!(circle.contains(&circle));
        assert!(circle.contains(&Circle::new(P2::new(3.0, 1.0), 3.0)));
        assert!(!circle.contains(&Circle::new(P2::new(3.0, 1.0), 3.1)));
        assert!(!Circle::new(P2::new(1.0, 1.0), 1.0).contains(&circle));
    }

    #[test]
    fn contains_rect() {
        let circle = Circle::new(P2::origin(), 2.0);
        assert!(circle.contains(&Rect::new(P2::origin(), 0.0, 2.0, 2.0)));
        assert!(circle.contains(&Rect::new(P2::origin(), PI * 0.25, 2.0, 2.0)));
        assert!(!circle.contains(&Rect::new(P2::origin(), 0.0, 3.0, 3.0)));
    }

    #[test]
    fn scale_ignores_y() {
        let mut circle = Circle::new(P2::origin(), 2.0);
        circle.scale(3.0, 100.0);
        assert_eq!(circle.radius, 6.0);
    }
}
