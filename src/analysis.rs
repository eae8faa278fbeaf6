//! Post-run reduction of the reaction-rate series.

use serde::{Deserialize, Serialize};

use crate::{kinetics::RateState, simulation::Simulation};

/// Highest observed rate, 0 for an empty series.
pub fn empirical_vmax(series: &[f64]) -> f64 {
    series.iter().copied().fold(0., f64::max)
}

/// Frame index at which the rate first reaches half of `vmax`.
pub fn empirical_km(series: &[f64], vmax: f64) -> Option<usize> {
    if vmax <= 0. {
        return None;
    }
    let half_vmax = vmax / 2.;
    series.iter().position(|rate| *rate >= half_vmax)
}

pub fn average_rate(series: &[f64]) -> f64 {
    if series.is_empty() {
        0.
    } else {
        series.iter().sum::<f64>() / series.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub total_products: usize,
    pub total_reactions: usize,
    pub average_rate: f64,
    pub vmax: f64,
    /// `None` when the rate never reached half of `vmax`.
    pub km: Option<usize>,
    pub reaction_rates: Vec<f64>,
    /// Rates the run was configured with.
    pub model: RateState,
    pub stopped_early: bool,
}

impl SimulationOutcome {
    pub fn from_simulation<R>(simulation: &Simulation<R>, stopped_early: bool) -> Self {
        let reaction_rates = simulation.reaction_rates.clone();
        let vmax = empirical_vmax(&reaction_rates);
        Self {
            total_products: simulation.products.len(),
            total_reactions: simulation.reaction_count,
            average_rate: average_rate(&reaction_rates),
            vmax,
            km: empirical_km(&reaction_rates, vmax),
            reaction_rates,
            model: simulation.rate_state,
            stopped_early,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.reaction_rates.len()
    }
}

#[cfg(test)]
mod test {
    use super::{average_rate, empirical_km, empirical_vmax};

    #[test]
    fn empty_series_has_sentinel_results() {
        assert_eq!(empirical_vmax(&[]), 0.);
        assert_eq!(empirical_km(&[], 0.), None);
        assert_eq!(average_rate(&[]), 0.);
    }

    #[test]
    fn vmax_is_the_maximum() {
        assert_eq!(empirical_vmax(&[3., 1., 5., 2.]), 5.);
    }

    #[test]
    fn km_is_first_index_reaching_half_vmax() {
        assert_eq!(empirical_km(&[1., 2., 3., 4., 5.], 5.), Some(2));
        assert_eq!(empirical_km(&[0., 2.5, 1.], 5.), Some(1));
    }

    #[test]
    fn km_is_undetermined_without_rate() {
        assert_eq!(empirical_km(&[0., 0., 0.], 0.), None);
        assert_eq!(empirical_km(&[1., 1.], 10.), None);
    }

    #[test]
    fn average_is_the_mean() {
        assert_eq!(average_rate(&[1., 2., 3., 6.]), 3.);
    }

    #[test]
    fn analysis_is_repeatable() {
        let series = [0.4, 7.5, 3.25, 9., 1.];
        let first = (empirical_vmax(&series), empirical_km(&series, 9.));
        let second = (empirical_vmax(&series), empirical_km(&series, 9.));
        assert_eq!(first, second);
        assert_eq!(first, (9., Some(1)));
    }
}
