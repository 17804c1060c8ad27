//! Batched pairwise raycasting
//!
//! The core of the engine: building the N×(N-1) ordered-pair query set,
//! executing it in parallel against a collision world snapshot, and managing
//! the lifetime of the pre-sized query and result buffers.

pub mod executor;
pub mod query;
pub mod system;

pub use executor::{RaycastExecutor, DEFAULT_BATCH_SIZE};
pub use query::{pair_for_slot, query_count, slot_for_pair, QueryBuffer, QuerySet, RaycastQuery};
pub use system::{RaycastSystem, StepOutcome};
