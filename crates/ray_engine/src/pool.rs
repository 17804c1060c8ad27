//! Entity pool: bulk template instantiation and randomized placement
//!
//! The pool owns N position-bearing entities duplicated from a single
//! template. Placement parallelizes over the pool with one random generator
//! per worker; each worker gets an exclusive `&mut` borrow of its own
//! generator slot, so stream independence is enforced by the type system
//! rather than by convention. Generator state persists inside the pool, so
//! repeated scatters continue the streams instead of repeating them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::InitError;
use crate::foundation::math::Vec3;

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create a new entity with the given ID
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Opaque handle to a resolved entity template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateHandle {
    id: u32,
}

impl TemplateHandle {
    /// Create a handle with the given ID
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the template ID
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Boundary to the external system that owns entity templates
///
/// The handle is resolved once and passed by value into the pool; there is
/// no ambient global template state.
pub trait TemplateSource {
    /// Resolve the template to duplicate, or `None` if it is unregistered
    fn resolve_template(&self) -> Option<TemplateHandle>;

    /// Bulk-duplicate the template `count` times
    fn instantiate(&mut self, template: TemplateHandle, count: usize) -> Vec<Entity>;

    /// Destroy previously instantiated entities
    fn destroy(&mut self, entities: &[Entity]);
}

/// Fixed pool of template-instantiated entities with mutable positions
pub struct EntityPool {
    entities: Vec<Entity>,
    positions: Vec<Vec3>,
    worker_rngs: Vec<SmallRng>,
}

impl EntityPool {
    /// Instantiate `count` entities from the source's template
    ///
    /// Fails with [`InitError::TemplateUnresolved`] when no template is
    /// registered; the system cannot run without a valid entity shape. A
    /// failed position buffer destroys the freshly instantiated entities
    /// before reporting [`InitError::BufferAllocation`].
    /// Positions start at the origin until [`Self::scatter_positions`] runs.
    pub fn from_template(
        source: &mut dyn TemplateSource,
        count: usize,
        seed: u64,
    ) -> Result<Self, InitError> {
        let template = source.resolve_template().ok_or(InitError::TemplateUnresolved)?;
        let entities = source.instantiate(template, count);

        // The entities exist from here on; a failed position buffer hands
        // them back to the source instead of stranding them
        let mut positions: Vec<Vec3> = Vec::new();
        if let Err(error) = positions.try_reserve_exact(count) {
            source.destroy(&entities);
            return Err(InitError::BufferAllocation {
                what: "position buffer",
                capacity: count,
                source: error,
            });
        }
        positions.resize(count, Vec3::zeros());

        let workers = rayon::current_num_threads().max(1);
        let worker_rngs = (0..workers as u64)
            .map(|worker| SmallRng::seed_from_u64(seed.wrapping_add(worker)))
            .collect();

        Ok(Self {
            entities,
            positions,
            worker_rngs,
        })
    }

    /// Scatter every position uniformly within `[-half_extent, half_extent]`
    /// per axis
    ///
    /// Runs data-parallel over disjoint position chunks, one generator per
    /// chunk. Generator state advances in place, so calling this again
    /// produces a fresh layout.
    pub fn scatter_positions(&mut self, half_extent: f32) {
        if self.positions.is_empty() {
            return;
        }

        let chunk_len = self.positions.len().div_ceil(self.worker_rngs.len()).max(1);

        self.positions
            .par_chunks_mut(chunk_len)
            .zip(self.worker_rngs.par_iter_mut())
            .for_each(|(chunk, rng)| {
                for position in chunk {
                    *position = Vec3::new(
                        rng.gen_range(-half_extent..=half_extent),
                        rng.gen_range(-half_extent..=half_extent),
                        rng.gen_range(-half_extent..=half_extent),
                    );
                }
            });
    }

    /// The pooled entities
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Current entity positions, indexed like [`Self::entities`]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Number of entities in the pool
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy the pooled entities through the source and consume the pool
    pub fn release(self, source: &mut dyn TemplateSource) {
        source.destroy(&self.entities);
    }
}
