//! Segment geometry and signed distances
//!
//! Obstacle segments are one of three primitives, described in the
//! obstacle's local frame (origin at the obstacle centre):
//! - an annular arc band (rings)
//! - a convex polygon (square and triangle walls)
//! - a disc (dotted variants)
//!
//! Overlap tests use signed distance functions: negative inside, positive
//! outside, zero on the boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::rotate_vec;

/// An annular sector between two radii
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcBand {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle (radians, counter-clockwise from +x)
    pub start: f32,
    /// Angular span (radians, 0..=TAU)
    pub span: f32,
}

impl ArcBand {
    pub fn new(inner_radius: f32, outer_radius: f32, start: f32, span: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start: start.rem_euclid(TAU),
            span: span.clamp(0.0, TAU),
        }
    }

    #[inline]
    pub fn mid_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) * 0.5
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.outer_radius - self.inner_radius
    }

    /// Check if an angle lies inside the span (handles wraparound)
    pub fn contains_angle(&self, theta: f32) -> bool {
        (theta - self.start).rem_euclid(TAU) <= self.span
    }

    /// Same band turned by `angle`
    pub fn rotated(&self, angle: f32) -> Self {
        Self::new(self.inner_radius, self.outer_radius, self.start + angle, self.span)
    }

    /// Signed distance from `p` (band centred at origin)
    pub fn distance(&self, p: Vec2) -> f32 {
        let r = p.length();
        let theta = p.y.atan2(p.x);
        let half_thick = self.thickness() * 0.5;

        if self.contains_angle(theta) {
            (r - self.mid_radius()).abs() - half_thick
        } else {
            // Outside the span: distance to the nearer end cap
            let end = self.start + self.span;
            let cap_a = sd_segment(
                p,
                Vec2::from_angle(self.start) * self.inner_radius,
                Vec2::from_angle(self.start) * self.outer_radius,
            );
            let cap_b = sd_segment(
                p,
                Vec2::from_angle(end) * self.inner_radius,
                Vec2::from_angle(end) * self.outer_radius,
            );
            cap_a.min(cap_b)
        }
    }
}

/// Primitive collidable shape of a segment (obstacle-local coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentShape {
    Arc(ArcBand),
    /// Convex polygon, counter-clockwise
    Polygon(Vec<Vec2>),
    Disc { center: Vec2, radius: f32 },
}

impl SegmentShape {
    /// Same shape turned by `angle` around the local origin
    pub fn rotated(&self, angle: f32) -> Self {
        match self {
            SegmentShape::Arc(band) => SegmentShape::Arc(band.rotated(angle)),
            SegmentShape::Polygon(points) => {
                SegmentShape::Polygon(points.iter().map(|&p| rotate_vec(p, angle)).collect())
            }
            SegmentShape::Disc { center, radius } => SegmentShape::Disc {
                center: rotate_vec(*center, angle),
                radius: *radius,
            },
        }
    }

    /// Same shape moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            // Arc bands are always centred on the obstacle
            SegmentShape::Arc(band) => SegmentShape::Arc(band.clone()),
            SegmentShape::Polygon(points) => {
                SegmentShape::Polygon(points.iter().map(|&p| p + offset).collect())
            }
            SegmentShape::Disc { center, radius } => SegmentShape::Disc {
                center: *center + offset,
                radius: *radius,
            },
        }
    }

    /// Signed distance from a local-frame point
    pub fn distance(&self, p: Vec2) -> f32 {
        match self {
            SegmentShape::Arc(band) => band.distance(p),
            SegmentShape::Polygon(points) => sd_convex_polygon(p, points),
            SegmentShape::Disc { center, radius } => sd_circle(p, *center, *radius),
        }
    }

    /// Whether a circle at local `p` with `radius` touches this shape
    #[inline]
    pub fn overlaps_circle(&self, p: Vec2, radius: f32) -> bool {
        self.distance(p) < radius
    }

    /// Representative point (for effects and debugging)
    pub fn centroid(&self) -> Vec2 {
        match self {
            SegmentShape::Arc(band) => {
                Vec2::from_angle(band.start + band.span * 0.5) * band.mid_radius()
            }
            SegmentShape::Polygon(points) => {
                if points.is_empty() {
                    Vec2::ZERO
                } else {
                    points.iter().copied().sum::<Vec2>() / points.len() as f32
                }
            }
            SegmentShape::Disc { center, .. } => *center,
        }
    }
}

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Unsigned distance to a line segment
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Signed distance to a convex polygon (either winding)
pub fn sd_convex_polygon(p: Vec2, points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return f32::MAX;
    }
    let mut edge_dist = f32::MAX;
    let mut inside = true;
    let mut sign = 0.0_f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        edge_dist = edge_dist.min(sd_segment(p, a, b));
        let cross = (b - a).perp_dot(p - a);
        if cross.abs() > 1e-6 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                inside = false;
            }
        }
    }
    if inside { -edge_dist } else { edge_dist }
}

/// Closed polyline used as a travel path for dotted markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPath {
    pub points: Vec<Vec2>,
}

impl ClosedPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Total perimeter length
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| (self.points[(i + 1) % n] - self.points[i]).length())
            .sum()
    }

    /// Point at `fraction` (wrapped into [0, 1)) of the perimeter
    pub fn point_at(&self, fraction: f32) -> Vec2 {
        let n = self.points.len();
        if n == 0 {
            return Vec2::ZERO;
        }
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return self.points[0];
        }
        let mut remaining = crate::wrap_unit(fraction) * perimeter;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let len = (b - a).length();
            if remaining <= len {
                let t = if len > 0.0 { remaining / len } else { 0.0 };
                return a + (b - a) * t;
            }
            remaining -= len;
        }
        self.points[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_arc_contains_angle_wraparound() {
        let band = ArcBand::new(90.0, 110.0, 170.0_f32.to_radians(), 20.0_f32.to_radians());
        assert!(band.contains_angle(PI));
        assert!(band.contains_angle(-PI + 0.01));
        assert!(!band.contains_angle(0.0));
    }

    #[test]
    fn test_arc_distance() {
        let band = ArcBand::new(90.0, 110.0, 0.0, FRAC_PI_2);
        let mid = Vec2::from_angle(PI / 4.0) * 100.0;
        assert!(band.distance(mid) < 0.0);
        let outside = Vec2::from_angle(PI / 4.0) * 130.0;
        assert!((band.distance(outside) - 20.0).abs() < 0.01);
        // Opposite side of the ring is far away
        assert!(band.distance(Vec2::new(-100.0, -1.0)) > 50.0);
    }

    #[test]
    fn test_polygon_distance() {
        let square = vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ];
        assert!((sd_convex_polygon(Vec2::ZERO, &square) + 10.0).abs() < 0.001);
        assert!((sd_convex_polygon(Vec2::new(15.0, 0.0), &square) - 5.0).abs() < 0.001);
        // Clockwise winding gives the same answer
        let mut cw = square.clone();
        cw.reverse();
        assert!(sd_convex_polygon(Vec2::new(1.0, 2.0), &cw) < 0.0);
    }

    #[test]
    fn test_rotated_disc() {
        let disc = SegmentShape::Disc { center: Vec2::new(50.0, 0.0), radius: 5.0 };
        let turned = disc.rotated(FRAC_PI_2);
        assert!(turned.overlaps_circle(Vec2::new(0.0, 50.0), 1.0));
        assert!(!turned.overlaps_circle(Vec2::new(50.0, 0.0), 1.0));
    }

    #[test]
    fn test_closed_path_walk() {
        let path = ClosedPath::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]);
        assert!((path.perimeter() - 40.0).abs() < 0.001);
        assert!((path.point_at(0.125) - Vec2::new(5.0, 0.0)).length() < 0.001);
        assert!((path.point_at(0.5) - Vec2::new(10.0, 10.0)).length() < 0.001);
        assert!((path.point_at(1.125) - Vec2::new(5.0, 0.0)).length() < 0.001);
    }
}
