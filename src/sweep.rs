use log::debug;
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    clock::FrameClock,
    config::SimulationConfig,
    consts::FRAMES_PER_SECOND,
    error::ConfigError,
    simulation::Simulation,
    simulation_manager::SimulationManager,
};

/// Result of one run of a substrate sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub substrate_count: usize,
    pub average_rate: f64,
    pub empirical_vmax: f64,
    pub products: usize,
    /// Michaelis-Menten rate predicted for `substrate_count`.
    pub theoretical_rate: f64,
}

/// Runs one headless simulation per substrate count, in parallel, and
/// returns the points in the order of `substrate_counts`.
///
/// Run `i` is seeded with `seed + i`, so a sweep is reproducible.
pub fn substrate_sweep(
    base: &SimulationConfig,
    substrate_counts: &[usize],
    seed: u64,
) -> Result<Vec<SweepPoint>, ConfigError> {
    let configs = substrate_counts
        .iter()
        .map(|&substrate_count| -> Result<SimulationConfig, ConfigError> {
            let config = SimulationConfig {
                substrate_count,
                ..base.clone()
            };
            config.validate()?;
            Ok(config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    configs
        .par_iter()
        .enumerate()
        .map(|(i, config)| -> Result<SweepPoint, ConfigError> {
            let rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let simulation = Simulation::new(config, rng)?;
            let outcome = SimulationManager::headless(
                simulation,
                FrameClock::with_fps(FRAMES_PER_SECOND),
                config.duration,
            )
            .run();
            debug!(
                "sweep run {} ({} substrates) done: {} products",
                i, config.substrate_count, outcome.total_products
            );

            Ok(SweepPoint {
                substrate_count: config.substrate_count,
                average_rate: outcome.average_rate,
                empirical_vmax: outcome.vmax,
                products: outcome.total_products,
                theoretical_rate: config.rate_state().rate(config.substrate_count),
            })
        })
        .collect()
}
