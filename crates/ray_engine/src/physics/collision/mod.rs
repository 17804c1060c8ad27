//! Collision primitives and filtering

pub mod filter;
pub mod primitives;

pub use filter::CollisionFilter;
pub use primitives::{BoundingSphere, Segment, Triangle};
