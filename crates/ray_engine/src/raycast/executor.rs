//! Data-parallel closest-hit executor
//!
//! Dispatches the whole query buffer against one collision world snapshot.
//! Queries and results are split into matching contiguous chunks; each rayon
//! worker reads its own query chunk and writes only its own result chunk, so
//! the partitioning itself is the concurrency-safety mechanism — no locks,
//! no atomics. The call joins the full pool before returning, so results are
//! valid as soon as it does.

use rayon::prelude::*;

use crate::raycast::query::RaycastQuery;
use crate::spatial::{CollisionWorld, RaycastHit};

/// Default number of queries handed to a worker at a time
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Batched parallel executor over a read-only query buffer
#[derive(Debug, Clone, Copy)]
pub struct RaycastExecutor {
    batch_size: usize,
}

impl RaycastExecutor {
    /// Create an executor with the given batching granularity
    ///
    /// Granularity is a performance tunable only; results are identical for
    /// any batch size. Zero is clamped to one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// The configured batching granularity
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Cast every query against the snapshot, overwriting `results`
    ///
    /// Each slot receives the closest hit for the query at the same index,
    /// or `None` for a miss. Blocks until every worker has finished.
    ///
    /// # Panics
    /// Panics when the buffers differ in length; the lifecycle manager
    /// allocates both from the same entity count.
    pub fn execute(
        &self,
        queries: &[RaycastQuery],
        world: &CollisionWorld,
        results: &mut [Option<RaycastHit>],
    ) {
        assert_eq!(
            queries.len(),
            results.len(),
            "query and result buffers must be sized identically"
        );

        queries
            .par_chunks(self.batch_size)
            .zip(results.par_chunks_mut(self.batch_size))
            .for_each(|(queries, results)| {
                for (query, slot) in queries.iter().zip(results.iter_mut()) {
                    *slot = world.cast_segment(query.start, query.end, &query.filter);
                }
            });
    }
}

impl Default for RaycastExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::{BoundingSphere, CollisionFilter};
    use crate::raycast::query::QuerySet;
    use crate::spatial::{Collider, ColliderShape};

    fn line_of_entities(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)).collect()
    }

    fn sentinel_hit() -> RaycastHit {
        RaycastHit {
            collider: u32::MAX,
            fraction: -1.0,
            position: Vec3::zeros(),
            normal: Vec3::zeros(),
        }
    }

    #[test]
    fn every_slot_is_written_for_any_batch_size() {
        let set = QuerySet::build(&line_of_entities(7)).expect("build");
        let world = CollisionWorld::new();

        // Sizes that divide the buffer evenly, sizes that do not, and sizes
        // larger than the whole buffer
        for batch_size in [1, 3, 4, 7, set.len(), set.len() + 5] {
            let executor = RaycastExecutor::new(batch_size);
            let mut results = vec![Some(sentinel_hit()); set.len()];
            executor.execute(set.queries(), &world, &mut results);

            // Empty world: a slot still holding the sentinel was never written
            assert!(
                results.iter().all(Option::is_none),
                "unwritten slot with batch_size={batch_size}"
            );
        }
    }

    #[test]
    fn execution_is_idempotent_for_fixed_inputs() {
        let set = QuerySet::build(&line_of_entities(5)).expect("build");
        let world = CollisionWorld::from_colliders(vec![Collider::new(ColliderShape::Sphere(
            BoundingSphere::new(Vec3::new(15.0, 0.0, 0.0), 2.0),
        ))]);

        let executor = RaycastExecutor::default();
        let mut first = vec![None; set.len()];
        let mut second = vec![None; set.len()];
        executor.execute(set.queries(), &world, &mut first);
        executor.execute(set.queries(), &world, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn batch_size_does_not_change_results() {
        let set = QuerySet::build(&line_of_entities(6)).expect("build");
        let world = CollisionWorld::from_colliders(vec![Collider::new(ColliderShape::Sphere(
            BoundingSphere::new(Vec3::new(25.0, 0.0, 0.0), 3.0),
        ))]);

        let mut reference = vec![None; set.len()];
        RaycastExecutor::new(1).execute(set.queries(), &world, &mut reference);

        for batch_size in [2, 5, 64] {
            let mut results = vec![None; set.len()];
            RaycastExecutor::new(batch_size).execute(set.queries(), &world, &mut results);
            assert_eq!(results, reference, "batch_size={batch_size}");
        }
    }

    #[test]
    fn empty_query_set_is_a_no_op() {
        let executor = RaycastExecutor::default();
        let world = CollisionWorld::new();
        let mut results: Vec<Option<RaycastHit>> = Vec::new();
        executor.execute(&[], &world, &mut results);
        assert!(results.is_empty());
    }

    #[test]
    fn misses_overwrite_stale_hits() {
        // A second step against emptier geometry must clear old results
        let positions = line_of_entities(3);
        let set = QuerySet::build(&positions).expect("build");
        let blocking = CollisionWorld::from_colliders(vec![Collider::new(
            ColliderShape::Sphere(BoundingSphere::new(Vec3::new(10.0, 0.0, 0.0), 1.0)),
        )]);
        let executor = RaycastExecutor::default();

        let mut results = vec![None; set.len()];
        executor.execute(set.queries(), &blocking, &mut results);
        assert!(results.iter().any(Option::is_some));

        executor.execute(set.queries(), &CollisionWorld::new(), &mut results);
        assert!(results.iter().all(Option::is_none));
    }

    #[test]
    fn query_filter_is_honored_per_query() {
        let positions = line_of_entities(2);
        let mut set_queries = QuerySet::build(&positions).expect("build").queries().to_vec();
        // First query opts out of everything
        set_queries[0].filter = CollisionFilter::NONE;

        let world = CollisionWorld::from_colliders(vec![Collider::new(ColliderShape::Sphere(
            BoundingSphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0),
        ))]);

        let mut results = vec![None; set_queries.len()];
        RaycastExecutor::default().execute(&set_queries, &world, &mut results);

        assert!(results[0].is_none());
        assert!(results[1].is_some());
    }
}
