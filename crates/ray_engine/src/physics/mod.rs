//! Physics module for collision queries
//!
//! Provides the geometric primitives and filtering rules used by the
//! collision world's closest-hit segment casts.

pub mod collision;

pub use collision::{BoundingSphere, CollisionFilter, Segment, Triangle};
