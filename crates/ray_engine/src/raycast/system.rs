//! Lifecycle manager for the batched raycast pipeline
//!
//! Owns the entity pool and the pre-sized query and result buffers. Start
//! allocates everything from the configured entity count, each step
//! overwrites the result buffer against a fresh world snapshot, and stop
//! releases the lot. `Drop` routes through stop, so early-exit paths cannot
//! leak entities.

use crate::config::RaycastConfig;
use crate::error::InitError;
use crate::foundation::math::Vec3;
use crate::pool::{EntityPool, TemplateSource};
use crate::raycast::executor::RaycastExecutor;
use crate::raycast::query::{slot_for_pair, QueryBuffer, QuerySet};
use crate::spatial::{CollisionWorldSource, RaycastHit};

/// What a call to [`RaycastSystem::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every query was cast; the result buffer is valid until the next step
    Completed {
        /// Number of queries that intersected geometry
        hit_count: usize,
    },
    /// The world source produced no snapshot; the result buffer is untouched
    SkippedNoSnapshot,
    /// The system has not been started
    NotStarted,
}

/// Buffers and pool that exist only between start and stop
struct RunningState {
    pool: EntityPool,
    queries: QuerySet,
    results: Vec<Option<RaycastHit>>,
}

/// The batched pairwise raycast system
///
/// Construction is cheap; [`Self::start`] performs all allocation and
/// entity instantiation, sized exactly for the configured entity count.
pub struct RaycastSystem {
    config: RaycastConfig,
    templates: Box<dyn TemplateSource>,
    executor: RaycastExecutor,
    state: Option<RunningState>,
}

impl RaycastSystem {
    /// Create a stopped system
    pub fn new(config: RaycastConfig, templates: Box<dyn TemplateSource>) -> Self {
        let executor = RaycastExecutor::new(config.batch_size);
        Self {
            config,
            templates,
            executor,
            state: None,
        }
    }

    /// Allocate both buffers, instantiate the pool, and scatter positions
    ///
    /// A system that is already running is stopped and restarted, releasing
    /// the previous allocation first. Errors are fatal: an unresolved
    /// template or a failed buffer allocation leaves the system stopped,
    /// with no entities instantiated.
    pub fn start(&mut self) -> Result<(), InitError> {
        self.stop();

        // Buffers first, entities second: once the template source has
        // instantiated the pool, nothing left in the sequence can fail, so
        // a failed start never strands live entities
        let query_buffer = QueryBuffer::reserve(self.config.entity_count)?;
        let capacity = query_buffer.capacity();

        let mut results: Vec<Option<RaycastHit>> = Vec::new();
        results
            .try_reserve_exact(capacity)
            .map_err(|source| InitError::BufferAllocation {
                what: "result buffer",
                capacity,
                source,
            })?;
        results.resize(capacity, None);

        let mut pool = EntityPool::from_template(
            self.templates.as_mut(),
            self.config.entity_count,
            self.config.rng_seed,
        )?;
        pool.scatter_positions(self.config.spawn_half_extent);

        let queries = query_buffer.fill(pool.positions());

        log::info!(
            "raycast system started: {} raycasts per step across {} entities",
            queries.len(),
            pool.len()
        );

        self.state = Some(RunningState {
            pool,
            queries,
            results,
        });
        Ok(())
    }

    /// Cast the frozen query set against a fresh snapshot from `source`
    ///
    /// Blocks until every worker has finished; the result buffer is valid
    /// from return until the next step overwrites it. A missing snapshot or
    /// a stopped system skips cleanly without touching results.
    pub fn step(&mut self, source: &mut dyn CollisionWorldSource) -> StepOutcome {
        let Some(state) = self.state.as_mut() else {
            log::warn!("raycast step requested before start; skipping");
            return StepOutcome::NotStarted;
        };

        let Some(world) = source.build() else {
            log::warn!("collision world snapshot unavailable; skipping step");
            return StepOutcome::SkippedNoSnapshot;
        };

        self.executor
            .execute(state.queries.queries(), &world, &mut state.results);

        let hit_count = state.results.iter().flatten().count();
        log::trace!(
            "step complete: {hit_count}/{} queries hit geometry",
            state.results.len()
        );
        StepOutcome::Completed { hit_count }
    }

    /// Release the buffers and destroy the pooled entities
    ///
    /// Safe to call repeatedly; a stopped system stays stopped.
    pub fn stop(&mut self) {
        if let Some(state) = self.state.take() {
            let released = state.results.len();
            drop(state.queries);
            drop(state.results);
            state.pool.release(self.templates.as_mut());
            log::info!("raycast system stopped; released {released} query slots");
        }
    }

    /// Whether start has run and stop has not
    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// The result buffer, indexed by the row-major slot contract
    ///
    /// `None` while stopped. Slots are only meaningful after a completed
    /// step and before the next one overwrites them.
    pub fn results(&self) -> Option<&[Option<RaycastHit>]> {
        self.state.as_ref().map(|state| state.results.as_slice())
    }

    /// The hit recorded for the ordered pair (i, j), if any
    ///
    /// Returns `None` while stopped, for the self pair, and for misses.
    pub fn hit_for_pair(&self, i: usize, j: usize) -> Option<&RaycastHit> {
        let state = self.state.as_ref()?;
        if i == j || i >= self.config.entity_count || j >= self.config.entity_count {
            return None;
        }
        state.results[slot_for_pair(self.config.entity_count, i, j)].as_ref()
    }

    /// The frozen query set, while running
    pub fn queries(&self) -> Option<&QuerySet> {
        self.state.as_ref().map(|state| &state.queries)
    }

    /// The scattered entity positions, while running
    pub fn positions(&self) -> Option<&[Vec3]> {
        self.state.as_ref().map(|state| state.pool.positions())
    }

    /// The startup configuration
    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }
}

impl Drop for RaycastSystem {
    fn drop(&mut self) {
        self.stop();
    }
}
