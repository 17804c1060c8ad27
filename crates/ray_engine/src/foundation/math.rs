//! Math utilities and types
//!
//! Provides fundamental math types for 3D spatial queries.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;
