//! Spatial structures: bounding volumes and the per-step collision world
//!
//! The collision world is a read-only snapshot rebuilt by an external source
//! each step; everything in this module is immutable once built.

pub mod aabb;
pub mod world;

pub use aabb::AABB;
pub use world::{Collider, ColliderShape, CollisionWorld, CollisionWorldSource, RaycastHit};
