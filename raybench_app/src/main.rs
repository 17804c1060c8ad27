//! Pairwise raycast benchmark
//!
//! Scatters a pool of entities inside a cube, builds the full N×(N-1)
//! sight-line query set once, then steps the parallel executor against a
//! static cube field, reporting throughput. Pass a `.toml` or `.ron` config
//! path as the first argument to override the defaults.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ray_engine::prelude::*;

/// Half-size of each scattered cube collider
const CUBE_HALF_SIZE: f32 = 5.0;

/// Benchmark configuration: the engine config plus the run shape
///
/// `colliders_per_entity` scales the static cube field with the pool, so
/// denser fields are a config edit rather than a rebuild. The flat snapshot
/// makes every collider a candidate for every ray; dial this up with care.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct BenchConfig {
    /// Engine configuration
    raycast: RaycastConfig,
    /// Static colliders scattered per pooled entity
    colliders_per_entity: usize,
    /// Steps executed before the run is summarized
    steps: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            raycast: RaycastConfig::default(),
            colliders_per_entity: 10,
            steps: 100,
        }
    }
}

impl Config for BenchConfig {}

/// Template source for the benchmark's cube entities
///
/// The cube template is always registered here; a missing template is an
/// integration failure this binary cannot recover from anyway.
struct CubeTemplates {
    next_id: u32,
}

impl CubeTemplates {
    fn new() -> Self {
        Self { next_id: 0 }
    }
}

impl TemplateSource for CubeTemplates {
    fn resolve_template(&self) -> Option<TemplateHandle> {
        Some(TemplateHandle::new(0))
    }

    fn instantiate(&mut self, _template: TemplateHandle, count: usize) -> Vec<Entity> {
        let first = self.next_id;
        self.next_id += count as u32;
        (first..first + count as u32).map(Entity::new).collect()
    }

    fn destroy(&mut self, entities: &[Entity]) {
        log::debug!("destroyed {} benchmark entities", entities.len());
    }
}

/// Static cube field the rays are cast against
///
/// The geometry itself never moves; the source still hands out a fresh
/// snapshot every step, the same way a live physics world would.
struct CubeFieldScene {
    colliders: Vec<Collider>,
}

impl CubeFieldScene {
    fn generate(count: usize, half_extent: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let colliders = (0..count)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-half_extent..=half_extent),
                    rng.gen_range(-half_extent..=half_extent),
                    rng.gen_range(-half_extent..=half_extent),
                );
                let extents = Vec3::new(CUBE_HALF_SIZE, CUBE_HALF_SIZE, CUBE_HALF_SIZE);
                Collider::new(ColliderShape::Box(AABB::from_center_extents(center, extents)))
            })
            .collect();
        Self { colliders }
    }
}

impl CollisionWorldSource for CubeFieldScene {
    fn build(&mut self) -> Option<CollisionWorld> {
        Some(CollisionWorld::from_colliders(self.colliders.clone()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => BenchConfig::load_from_file(&path)?,
        None => BenchConfig::default(),
    };
    let step_interval = config.raycast.step_rate.interval();

    let mut scene = CubeFieldScene::generate(
        config.raycast.entity_count * config.colliders_per_entity,
        config.raycast.spawn_half_extent,
        config.raycast.rng_seed ^ 0xC0_11_1D_E5,
    );
    log::info!(
        "cube field ready: {} colliders within ±{}",
        scene.colliders.len(),
        config.raycast.spawn_half_extent
    );

    let mut system = RaycastSystem::new(config.raycast.clone(), Box::new(CubeTemplates::new()));
    system.start()?;

    let mut total_hits = 0_usize;
    let mut casting_time = Duration::ZERO;
    let run_started = Instant::now();

    for _ in 0..config.steps {
        let step_started = Instant::now();

        match system.step(&mut scene) {
            StepOutcome::Completed { hit_count } => total_hits += hit_count,
            StepOutcome::SkippedNoSnapshot => log::warn!("scene produced no snapshot"),
            StepOutcome::NotStarted => unreachable!("system started above"),
        }
        casting_time += step_started.elapsed();

        if let Some(interval) = step_interval {
            let elapsed = step_started.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
    }

    let rays_per_step = system.results().map_or(0, |results| results.len());
    let total_rays = rays_per_step * config.steps;
    let rays_per_second = total_rays as f64 / casting_time.as_secs_f64().max(f64::EPSILON);
    log::info!(
        "{} steps in {:.2?} ({:.2?} casting): {total_rays} rays total, {total_hits} hits, {rays_per_second:.0} rays/s",
        config.steps,
        run_started.elapsed(),
        casting_time
    );

    system.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_the_default_field_scale() {
        let parsed: BenchConfig = toml::from_str("[raycast]\nentity_count = 10\n").expect("parse");
        assert_eq!(parsed.raycast.entity_count, 10);
        assert_eq!(parsed.colliders_per_entity, 10);
        assert_eq!(parsed.steps, 100);
    }

    #[test]
    fn field_scale_overrides_apply() {
        let parsed: BenchConfig =
            toml::from_str("colliders_per_entity = 1450\nsteps = 5\n").expect("parse");
        assert_eq!(parsed.colliders_per_entity, 1450);
        assert_eq!(parsed.steps, 5);
    }
}
