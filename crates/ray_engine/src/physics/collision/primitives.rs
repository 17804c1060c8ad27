//! Primitive collision shapes and segment intersection algorithms
//!
//! All intersection tests here are bounded-segment tests: hits are reported
//! as a fraction in `[0, 1]` along the segment from start toward end, so the
//! closest hit is simply the smallest fraction. Directions are deliberately
//! left unnormalized; the math works directly on the segment delta.

use crate::foundation::math::Vec3;

/// Squared-length threshold below which a segment is treated as degenerate
const DEGENERATE_EPSILON_SQ: f32 = 1e-12;

/// A bounded line segment for closest-hit casting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point in world space
    pub start: Vec3,
    /// End point in world space
    pub end: Vec3,
}

impl Segment {
    /// Creates a new segment between two points
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// The unnormalized direction from start to end
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Get the point at a fraction along the segment (0 = start, 1 = end)
    pub fn point_at(&self, fraction: f32) -> Vec3 {
        self.start + self.delta() * fraction
    }

    /// Whether the segment is too short to cast
    ///
    /// Zero-length segments have no direction; every intersection test in
    /// this module reports "no hit" for them by convention.
    pub fn is_degenerate(&self) -> bool {
        self.delta().magnitude_squared() < DEGENERATE_EPSILON_SQ
    }
}

/// A bounding sphere collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test segment intersection with this sphere
    ///
    /// Returns `(fraction, hit_point, normal)` for the nearest intersection
    /// within the segment bounds, `None` otherwise. A segment starting inside
    /// the sphere reports the exit point.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<(f32, Vec3, Vec3)> {
        if segment.is_degenerate() {
            return None;
        }

        // Solve |start + t*delta - center|^2 = radius^2 for t in [0, 1]
        let delta = segment.delta();
        let oc = segment.start - self.center;

        let a = delta.dot(&delta);
        let b = 2.0 * oc.dot(&delta);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        // Nearest root inside the segment bounds
        let t = if (0.0..=1.0).contains(&t1) {
            t1
        } else if (0.0..=1.0).contains(&t2) {
            t2
        } else {
            return None;
        };

        let hit_point = segment.point_at(t);
        let normal = (hit_point - self.center).normalize();

        Some((t, hit_point, normal))
    }
}

/// A triangle collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Möller-Trumbore segment-triangle intersection
    ///
    /// Returns `(fraction, hit_point, normal)` if the segment crosses the
    /// triangle, `None` otherwise. The returned normal faces the segment
    /// start (front or back hits both count).
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by
    /// Möller & Trumbore.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<(f32, Vec3, Vec3)> {
        const EPSILON: f32 = 0.000001;

        if segment.is_degenerate() {
            return None;
        }

        let delta = segment.delta();
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = delta.cross(&edge2);
        let a = edge1.dot(&h);

        // Segment parallel to triangle plane?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = segment.start - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * delta.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if !(0.0..=1.0).contains(&t) {
            return None; // Beyond the segment bounds
        }

        let hit_point = segment.point_at(t);
        let mut normal = self.normal();
        if normal.dot(&delta) > 0.0 {
            normal = -normal;
        }

        Some((t, hit_point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_sphere_closest_hit() {
        let sphere = BoundingSphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0);
        let segment = Segment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));

        let (fraction, point, normal) = sphere.intersect_segment(&segment).expect("should hit");
        assert_relative_eq!(fraction, 0.4, epsilon = 1e-5);
        assert_relative_eq!(point.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn segment_sphere_stops_short() {
        // Sphere lies beyond the segment end
        let sphere = BoundingSphere::new(Vec3::new(20.0, 0.0, 0.0), 1.0);
        let segment = Segment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));
        assert!(sphere.intersect_segment(&segment).is_none());
    }

    #[test]
    fn segment_starting_inside_sphere_reports_exit() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 2.0);
        let segment = Segment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));

        let (fraction, point, _) = sphere.intersect_segment(&segment).expect("should hit");
        assert_relative_eq!(fraction, 0.2, epsilon = 1e-5);
        assert_relative_eq!(point.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn segment_triangle_hit_and_miss() {
        let triangle = Triangle::new(
            Vec3::new(5.0, -10.0, -10.0),
            Vec3::new(5.0, 10.0, -10.0),
            Vec3::new(5.0, 0.0, 10.0),
        );

        let crossing = Segment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));
        let (fraction, point, normal) = triangle.intersect_segment(&crossing).expect("should hit");
        assert_relative_eq!(fraction, 0.5, epsilon = 1e-5);
        assert_relative_eq!(point.x, 5.0, epsilon = 1e-5);
        assert!(normal.x < 0.0, "normal must face the segment start");

        let short = Segment::new(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        assert!(triangle.intersect_segment(&short).is_none());
    }

    #[test]
    fn degenerate_segment_never_hits() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let segment = Segment::new(origin, origin);
        assert!(segment.is_degenerate());

        // Even from inside a shape
        let sphere = BoundingSphere::new(origin, 5.0);
        assert!(sphere.intersect_segment(&segment).is_none());
    }
}
