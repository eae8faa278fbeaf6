//! Rate model: Arrhenius rate constant and Michaelis-Menten rates.

use serde::{Deserialize, Serialize};

use crate::consts::{GAS_CONSTANT, PRE_EXPONENTIAL_SCALE};

/// Temperature-dependent rate constant (Arrhenius equation).
///
/// `activation_energy` is in kJ/mol, `temperature` in kelvin and
/// `pre_exponential_factor` in units of 10⁷. The caller guarantees
/// `temperature > 0`.
pub fn rate_constant(activation_energy: f64, temperature: f64, pre_exponential_factor: f64) -> f64 {
    let activation_energy = activation_energy * 1000.;
    pre_exponential_factor * PRE_EXPONENTIAL_SCALE
        * (-activation_energy / (GAS_CONSTANT * temperature)).exp()
}

pub fn vmax(rate_constant: f64, enzyme_count: usize) -> f64 {
    rate_constant * enzyme_count as f64
}

/// Michaelis-Menten rate for `substrate_count` substrates.
pub fn instantaneous_rate(substrate_count: usize, vmax: f64, km: f64) -> f64 {
    if substrate_count == 0 {
        return 0.;
    }
    let s = substrate_count as f64;
    vmax * s / (km + s)
}

/// Fraction of enzymes expected to be bound, `[S] / (Km + [S])`.
pub fn binding_probability(substrate_count: usize, km: f64) -> f64 {
    if substrate_count == 0 {
        return 0.;
    }
    let s = substrate_count as f64;
    s / (km + s)
}

/// Rates fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateState {
    pub rate_constant: f64,
    pub vmax: f64,
    pub km: f64,
}

impl RateState {
    pub fn new(rate_constant: f64, enzyme_count: usize, km: f64) -> Self {
        Self {
            rate_constant,
            vmax: vmax(rate_constant, enzyme_count),
            km,
        }
    }

    pub fn rate(&self, substrate_count: usize) -> f64 {
        instantaneous_rate(substrate_count, self.vmax, self.km)
    }

    /// Chance that a substrate within reach of an enzyme reacts: the
    /// current rate normalized by Vmax. Zero when Vmax is zero.
    pub fn reaction_probability(&self, substrate_count: usize) -> f64 {
        if self.vmax > 0. {
            self.rate(substrate_count) / self.vmax
        } else {
            0.
        }
    }
}
