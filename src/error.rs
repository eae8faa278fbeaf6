use thiserror::Error;

/// Everything that can make a configuration unusable. All of these are
/// raised before a simulation is built; a running simulation has no
/// failure path.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("temperature must be a positive number of kelvin, got {0}")]
    InvalidTemperature(f64),

    #[error("Michaelis constant must be positive, got {0}")]
    InvalidKm(f64),

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("{field} must not exceed {max}, got {value}")]
    TooManyParticles {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("rate constant {rate_constant} and Vmax {vmax} must be finite")]
    NonFiniteRate { rate_constant: f64, vmax: f64 },

    #[error("unknown enzyme `{0}` (expected hexokinase, catalase or dna-polymerase)")]
    UnknownEnzyme(String),

    #[error("malformed share code: {0}")]
    ShareCode(String),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}
