//! # Ray Engine
//!
//! A batched pairwise raycast engine: every ordered pair of pooled entities
//! becomes one closest-hit segment query against a per-step collision world
//! snapshot, executed by a data-parallel worker pool.
//!
//! ## Architecture
//!
//! - **Entity Pool**: template-instantiated entities scattered uniformly
//!   inside a bounded cube, one RNG stream per worker
//! - **Query Set**: the frozen N×(N-1) ordered-pair segment queries with a
//!   fixed row-major slot contract
//! - **Parallel Executor**: rayon worker pool over disjoint result chunks
//! - **Lifecycle Manager**: allocates the query and result buffers once at
//!   start, overwrites results each step, releases everything on stop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ray_engine::prelude::*;
//!
//! # struct Templates;
//! # impl TemplateSource for Templates {
//! #     fn resolve_template(&self) -> Option<TemplateHandle> { Some(TemplateHandle::new(0)) }
//! #     fn instantiate(&mut self, _: TemplateHandle, count: usize) -> Vec<Entity> {
//! #         (0..count as u32).map(Entity::new).collect()
//! #     }
//! #     fn destroy(&mut self, _: &[Entity]) {}
//! # }
//! # struct Scene;
//! # impl CollisionWorldSource for Scene {
//! #     fn build(&mut self) -> Option<CollisionWorld> { Some(CollisionWorld::default()) }
//! # }
//! fn main() -> Result<(), InitError> {
//!     let config = RaycastConfig::default();
//!     let mut system = RaycastSystem::new(config, Box::new(Templates));
//!     system.start()?;
//!
//!     let mut scene = Scene;
//!     system.step(&mut scene);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod pool;
pub mod raycast;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, RaycastConfig, StepRate},
        error::InitError,
        foundation::math::Vec3,
        physics::collision::{CollisionFilter, Segment},
        pool::{Entity, EntityPool, TemplateHandle, TemplateSource},
        raycast::{
            pair_for_slot, slot_for_pair, QuerySet, RaycastExecutor, RaycastQuery, RaycastSystem,
            StepOutcome,
        },
        spatial::{Collider, ColliderShape, CollisionWorld, CollisionWorldSource, RaycastHit, AABB},
    };
}
