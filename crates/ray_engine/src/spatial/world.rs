//! Per-step collision world snapshot and its closest-hit cast primitive
//!
//! The world is a flat array of static colliders; the executor borrows it
//! read-only for one step and never retains or mutates it. The snapshot is
//! produced fresh each step by a [`CollisionWorldSource`], which keeps the
//! borrow window explicit: nothing else may rebuild the world while a step
//! is casting against it.

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, CollisionFilter, Segment, Triangle};
use crate::spatial::AABB;

/// Result of a closest-hit segment cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Index of the collider that was hit, within the snapshot it came from
    pub collider: u32,
    /// Fraction along the segment at which the hit occurred (0 = start)
    pub fraction: f32,
    /// The point of intersection in world space
    pub position: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// Geometric shape of one static collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// A spherical collider
    Sphere(BoundingSphere),
    /// A single triangle
    Triangle(Triangle),
    /// An axis-aligned box
    Box(AABB),
}

impl ColliderShape {
    /// Test segment intersection with this shape
    ///
    /// Returns `(fraction, hit_point, normal)` for the nearest intersection
    /// within the segment bounds, `None` otherwise.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<(f32, Vec3, Vec3)> {
        match self {
            Self::Sphere(sphere) => sphere.intersect_segment(segment),
            Self::Triangle(triangle) => triangle.intersect_segment(segment),
            Self::Box(aabb) => aabb
                .intersect_segment_detailed(segment)
                .map(|(fraction, normal)| (fraction, segment.point_at(fraction), normal)),
        }
    }
}

/// One static collider in the snapshot: a shape plus its filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// World-space collision shape
    pub shape: ColliderShape,
    /// Which casts this collider responds to
    pub filter: CollisionFilter,
}

impl Collider {
    /// Create a collider that responds to every cast
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            filter: CollisionFilter::MATCH_ALL,
        }
    }

    /// Create a collider with an explicit filter
    pub fn with_filter(shape: ColliderShape, filter: CollisionFilter) -> Self {
        Self { shape, filter }
    }
}

/// Read-only snapshot of all collidable geometry for one step
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    /// Create an empty world (every cast misses)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world from a prepared collider array
    pub fn from_colliders(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    /// Add a collider to the snapshot while it is being built
    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Number of colliders in the snapshot
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the snapshot holds no geometry
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Closest-hit cast of the segment from `start` toward `end`
    ///
    /// Returns the nearest intersection along the segment, or `None` when
    /// nothing was hit. Two conventions apply, both treated as clean misses
    /// rather than errors:
    ///
    /// - degenerate (zero-length) segments never hit
    /// - hits must lie strictly between the endpoints; a surface touching
    ///   the start or end point belongs to the endpoint entity itself and
    ///   does not break the sight line
    pub fn cast_segment(
        &self,
        start: Vec3,
        end: Vec3,
        filter: &CollisionFilter,
    ) -> Option<RaycastHit> {
        // Fraction-space margin for the open-interval endpoint rule
        const ENDPOINT_EPSILON: f32 = 1e-4;

        let segment = Segment::new(start, end);
        if segment.is_degenerate() {
            return None;
        }

        let mut closest: Option<RaycastHit> = None;
        for (index, collider) in self.colliders.iter().enumerate() {
            if !filter.should_collide(&collider.filter) {
                continue;
            }

            if let Some((fraction, position, normal)) = collider.shape.intersect_segment(&segment) {
                if fraction <= ENDPOINT_EPSILON || fraction >= 1.0 - ENDPOINT_EPSILON {
                    continue;
                }
                let nearer = closest.map_or(true, |hit| fraction < hit.fraction);
                if nearer {
                    closest = Some(RaycastHit {
                        collider: index as u32,
                        fraction,
                        position,
                        normal,
                    });
                }
            }
        }

        closest
    }
}

/// Boundary to the external system that rebuilds the collision world
///
/// Called once per step; returning `None` means no snapshot is available yet
/// and the step must be skipped cleanly.
pub trait CollisionWorldSource {
    /// Build a fresh read-only snapshot for the coming step
    fn build(&mut self) -> Option<CollisionWorld>;
}
