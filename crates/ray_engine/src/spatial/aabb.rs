//! Axis-Aligned Bounding Box for spatial queries

use crate::foundation::math::Vec3;
use crate::physics::collision::Segment;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Test segment intersection using the slab method
    ///
    /// Returns the entry fraction in `[0, 1]` if the segment intersects,
    /// `None` otherwise. A segment starting inside reports the exit fraction.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<f32> {
        self.intersect_segment_detailed(segment).map(|(fraction, _)| fraction)
    }

    /// Slab test that also reports the outward normal of the hit face
    ///
    /// A segment starting inside the box reports the exit point with the
    /// outward normal of the exit face, matching the sphere convention. A
    /// segment fully enclosed by the box crosses no surface and misses.
    pub fn intersect_segment_detailed(&self, segment: &Segment) -> Option<(f32, Vec3)> {
        if segment.is_degenerate() {
            return None;
        }

        let start = segment.start;
        let delta = segment.delta();

        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;
        let mut entry_face: Option<(usize, f32)> = None;
        let mut exit_face: Option<(usize, f32)> = None;

        for axis in 0..3 {
            if delta[axis].abs() < f32::EPSILON {
                // Parallel to this slab; must already be inside it
                if start[axis] < self.min[axis] || start[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / delta[axis];
            let mut t_near = (self.min[axis] - start[axis]) * inv;
            let mut t_far = (self.max[axis] - start[axis]) * inv;
            // Entering through the min face leaves the normal pointing -axis
            let mut sign = -1.0_f32;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
                sign = 1.0;
            }

            if t_near > t_enter {
                t_enter = t_near;
                entry_face = Some((axis, sign));
            }
            if t_far < t_exit {
                t_exit = t_far;
                // Leaving through the opposite face of the slab pair
                exit_face = Some((axis, -sign));
            }

            if t_enter > t_exit {
                return None;
            }
        }

        let face_normal = |(axis, sign): (usize, f32)| {
            let mut normal = Vec3::zeros();
            normal[axis] = sign;
            normal
        };

        match (entry_face, exit_face) {
            (Some(face), _) => Some((t_enter, face_normal(face))),
            // Started inside: report where the segment leaves the box
            (None, Some(face)) => Some((t_exit, face_normal(face))),
            (None, None) => None,
        }
    }
}
