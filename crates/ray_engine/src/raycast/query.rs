//! Pairwise query construction and the row-major slot contract
//!
//! Every ordered pair (i, j) of distinct entity indices owns exactly one
//! query slot, assigned row-major: i outer, j inner, with the self pair
//! skipped. The mapping is a fixed external contract — result consumers may
//! compute `slot_for_pair` themselves to read a specific pair's outcome.

use crate::error::InitError;
use crate::foundation::math::Vec3;
use crate::physics::collision::CollisionFilter;

/// One closest-hit segment query between two entity positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    /// Segment start in world space
    pub start: Vec3,
    /// Segment end in world space
    pub end: Vec3,
    /// Which colliders this query tests against
    pub filter: CollisionFilter,
}

/// Total query count for a pool of `entity_count` entities: N×(N-1)
pub fn query_count(entity_count: usize) -> usize {
    entity_count * entity_count.saturating_sub(1)
}

/// Flat buffer slot for the ordered pair (i, j)
///
/// # Panics
/// Panics when `i == j` or either index is out of range; the self pair has
/// no slot.
pub fn slot_for_pair(entity_count: usize, i: usize, j: usize) -> usize {
    assert!(i != j, "the self pair (i == j) has no query slot");
    assert!(i < entity_count && j < entity_count, "entity index out of range");

    // Row i holds N-1 slots; j skips over the missing self column
    i * (entity_count - 1) + if j < i { j } else { j - 1 }
}

/// Inverse of [`slot_for_pair`]
///
/// # Panics
/// Panics when `slot >= query_count(entity_count)`.
pub fn pair_for_slot(entity_count: usize, slot: usize) -> (usize, usize) {
    assert!(slot < query_count(entity_count), "query slot out of range");

    let row_len = entity_count - 1;
    let i = slot / row_len;
    let column = slot % row_len;
    let j = if column < i { column } else { column + 1 };
    (i, j)
}

/// The frozen set of all pairwise queries for one entity pool
///
/// Built exactly once at startup: endpoints are copied by value from the
/// positions passed in and never re-read afterwards, even if the pool moves.
/// The workload is fixed by design so that every step measures the same
/// batch; this is deliberate, not a missing refresh.
#[derive(Debug)]
pub struct QuerySet {
    queries: Vec<RaycastQuery>,
    entity_count: usize,
}

/// Query storage reserved ahead of entity instantiation
///
/// Startup reserves its buffers before the template source duplicates
/// anything, so an allocation failure surfaces while there is still nothing
/// to clean up. The reserved buffer is filled once the pool's positions
/// exist.
#[derive(Debug)]
pub struct QueryBuffer {
    queries: Vec<RaycastQuery>,
    entity_count: usize,
}

impl QueryBuffer {
    /// Reserve one slot per ordered pair of `entity_count` entities
    ///
    /// The buffer is reserved fallibly: an allocation failure surfaces as
    /// [`InitError::BufferAllocation`] instead of aborting.
    pub fn reserve(entity_count: usize) -> Result<Self, InitError> {
        let capacity = query_count(entity_count);

        let mut queries = Vec::new();
        queries
            .try_reserve_exact(capacity)
            .map_err(|source| InitError::BufferAllocation {
                what: "query buffer",
                capacity,
                source,
            })?;

        Ok(Self {
            queries,
            entity_count,
        })
    }

    /// Number of slots reserved (N×(N-1))
    pub fn capacity(&self) -> usize {
        query_count(self.entity_count)
    }

    /// Freeze the query set from a snapshot of entity positions
    ///
    /// Every query carries [`CollisionFilter::MATCH_ALL`].
    ///
    /// # Panics
    /// Panics when `positions.len()` differs from the reserved entity count.
    pub fn fill(mut self, positions: &[Vec3]) -> QuerySet {
        assert_eq!(
            positions.len(),
            self.entity_count,
            "position snapshot does not match the reserved entity count"
        );

        for (i, &start) in positions.iter().enumerate() {
            for (j, &end) in positions.iter().enumerate() {
                // No self casts
                if j == i {
                    continue;
                }
                self.queries.push(RaycastQuery {
                    start,
                    end,
                    filter: CollisionFilter::MATCH_ALL,
                });
            }
        }

        QuerySet {
            queries: self.queries,
            entity_count: self.entity_count,
        }
    }
}

impl QuerySet {
    /// Build the N×(N-1) query set from a snapshot of entity positions
    ///
    /// Reserve-then-fill in one call, for callers that already hold the
    /// positions.
    pub fn build(positions: &[Vec3]) -> Result<Self, InitError> {
        Ok(QueryBuffer::reserve(positions.len())?.fill(positions))
    }

    /// All queries, indexed by the row-major slot contract
    pub fn queries(&self) -> &[RaycastQuery] {
        &self.queries
    }

    /// Number of queries (N×(N-1))
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the set holds no queries (pools of 0 or 1 entities)
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Entity count the set was built for
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// The query for the ordered pair (i, j)
    ///
    /// # Panics
    /// Panics when `i == j` or either index is out of range.
    pub fn query_for_pair(&self, i: usize, j: usize) -> &RaycastQuery {
        &self.queries[slot_for_pair(self.entity_count, i, j)]
    }
}
