extern crate nalgebra as na;

use super::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Oriented rectangle. `origin` is the center, y grows downwards so "top"
/// is the smaller y value.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rect {
    pub origin: P2,
    pub rotation: Float,
    pub width: Float,
    pub height: Float,
}

/// [TopLeft, TopRight, BotLeft, BotRight]
pub type RectPoints = [P2; 4];

impl Rect {
    pub fn new(origin: P2, rotation: Float, width: Float, height: Float) -> Rect {
        Rect {
            origin,
            rotation,
            width,
            height,
        }
    }

    pub fn from_tlbr(top: Float, left: Float, bottom: Float, right: Float) -> Self {
        Rect {
            origin: P2::new((left + right) * 0.5, (top + bottom) * 0.5),
            rotation: 0.0,
            width: (right - left).abs(),
            height: (bottom - top).abs(),
        }
    }

    pub fn half_width(&self) -> Float {
        self.width * 0.5
    }

    pub fn half_height(&self) -> Float {
        self.height * 0.5
    }

    /// radius of the circle passing through all four corners
    pub fn bounding_radius(&self) -> Float {
        0.5 * (self.width * self.width + self.height * self.height).sqrt()
    }

    fn corner(&self, x_sign: Float, y_sign: Float) -> P2 {
        let unrotated = P2::new(
            self.origin.x + x_sign * self.half_width(),
            self.origin.y + y_sign * self.half_height(),
        );
        self.rotate_point_around_origin(&unrotated)
    }

    pub fn top_left(&self) -> P2 {
        self.corner(-1.0, -1.0)
    }

    pub fn top_right(&self) -> P2 {
        self.corner(1.0, -1.0)
    }

    pub fn bot_left(&self) -> P2 {
        self.corner(-1.0, 1.0)
    }

    pub fn bot_right(&self) -> P2 {
        self.corner(1.0, 1.0)
    }

    pub fn corners(&self) -> RectPoints {
        [
            self.top_left(),
            self.top_right(),
            self.bot_left(),
            self.bot_right(),
        ]
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.rotation == 0.0
    }

    /// the two edge directions, used as separating axis candidates
    pub fn edge_axes(&self) -> [V2; 2] {
        [
            self.top_right() - self.top_left(),
            self.top_right() - self.bot_right(),
        ]
    }

    /// true if one of the edge directions of `self` or `other` separates them
    pub fn separated_from(&self, other: &Rect) -> bool {
        let [a, b] = self.edge_axes();
        let [c, d] = other.edge_axes();
        let axes = [a, b, c, d];
        let mine = self.corners();
        let theirs = other.corners();
        axes.iter().any(|axis| {
            let (my_min, my_max) = min_max_projection(axis, &mine);
            let (their_min, their_max) = min_max_projection(axis, &theirs);
            their_max < my_min || my_max < their_min
        })
    }
}

impl Intersect<Rect> for Rect {
    type Intersection = ();

    fn intersect(&self, other: &Rect) -> Option<()> {
        let hit = if self.is_axis_aligned() && other.is_axis_aligned() {
            let (my_tl, my_br) = (self.top_left(), self.bot_right());
            let (their_tl, their_br) = (other.top_left(), other.bot_right());
            their_tl.x <= my_br.x
                && their_br.x >= my_tl.x
                && their_tl.y <= my_br.y
                && their_br.y >= my_tl.y
        } else if distance(&self.origin, &other.origin)
            <= self.bounding_radius() + other.bounding_radius()
        {
            !self.separated_from(other)
        } else {
            false
        };
        if hit {
            Some(())
        } else {
            None
        }
    }
}

impl Intersect<Circle> for Rect {
    type Intersection = ();

    fn intersect(&self, circle: &Circle) -> Option<()> {
        circle.intersect(self)
    }
}

impl ContainsPoint for Rect {
    fn contains_point(&self, p: &P2) -> bool {
        let local = self.to_local(p);
        between(
            local.x,
            self.origin.x - self.half_width(),
            self.origin.x + self.half_width(),
        ) && between(
            local.y,
            self.origin.y - self.half_height(),
            self.origin.y + self.half_height(),
        )
    }
}

impl Contains<Rect> for Rect {
    fn contains(&self, other: &Rect) -> bool {
        other.corners().iter().all(|corner| self.contains_point(corner))
    }
}

impl Contains<Circle> for Rect {
    /// samples the four cardinal points of the circle only
    fn contains(&self, circle: &Circle) -> bool {
        let (c, r) = (circle.origin, circle.radius);
        [
            P2::new(c.x - r, c.y),
            P2::new(c.x, c.y - r),
            P2::new(c.x + r, c.y),
            P2::new(c.x, c.y + r),
        ]
        .iter()
        .all(|p| self.contains_point(p))
    }
}

impl HasOrigin for Rect {
    fn get_origin(&self) -> P2 {
        self.origin
    }
    fn set_origin(&mut self, origin: P2) {
        self.origin = origin;
    }
}

impl Rotate for Rect {
    fn get_rotation(&self) -> Float {
        self.rotation
    }
    fn set_rotation(&mut self, rotation: Float) {
        self.rotation = rotation
    }
}

impl Scale for Rect {
    fn scale(&mut self, scale_x: Float, scale_y: Float) {
        self.width *= scale_x;
        self.height *= scale_y;
    }
    fn scale_position(&mut self, scale_x: Float, scale_y: Float) {
        self.origin.x *= scale_x;
        self.origin.y *= scale_y;
    }
}

impl Distribution<Rect> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rect {
        // keep the axis aligned fast path in the mix
        let rotation = if rng.gen_bool(0.5) {
            0.0
        } else {
            rng.gen::<Float>() * TAU
        };
        Rect {
            origin: rng.gen(),
            rotation,
            width: rng.gen(),
            height: rng.gen(),
        }
    }
}

impl HasGeometry for Rect {
    fn get_geometry(&self) -> Geo {
        Geo::GeoRect(*self)
    }
}
