use std::{fs, io::Cursor, path::Path};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::{
    consts::MAX_PARTICLE_COUNT,
    error::ConfigError,
    kinetics::{rate_constant, RateState},
    presets::EnzymePreset,
};

/// Where the Michaelis constant of a run comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KmSource {
    /// Use the selected enzyme's own constant.
    Preset,
    Custom(f64),
}

/// How a substrate sitting exactly on the reaction radius is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusBoundary {
    #[default]
    Inclusive,
    Exclusive,
}

impl RadiusBoundary {
    pub fn within(self, distance: f32, radius: f32) -> bool {
        match self {
            RadiusBoundary::Inclusive => distance <= radius,
            RadiusBoundary::Exclusive => distance < radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityScan {
    /// Test every substrate against every enzyme.
    #[default]
    BruteForce,
    /// Only test enzymes from nearby grid buckets.
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enzyme: EnzymePreset,
    pub enzyme_count: usize,
    pub substrate_count: usize,
    /// kJ/mol
    pub activation_energy: f64,
    /// K
    pub temperature: f64,
    /// In units of 10⁷.
    pub pre_exponential_factor: f64,
    pub km: KmSource,
    pub reaction_radius: f64,
    /// Simulated seconds.
    pub duration: f64,
    pub boundary: RadiusBoundary,
    pub proximity: ProximityScan,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enzyme: EnzymePreset::Hexokinase,
            enzyme_count: 20,
            substrate_count: 50,
            activation_energy: 60.,
            temperature: 298.,
            pre_exponential_factor: 7.,
            km: KmSource::Custom(30.),
            reaction_radius: 10.,
            duration: 90.,
            boundary: RadiusBoundary::Inclusive,
            proximity: ProximityScan::BruteForce,
        }
    }
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn km(&self) -> f64 {
        match self.km {
            KmSource::Preset => self.enzyme.profile().km,
            KmSource::Custom(km) => km,
        }
    }

    /// Rejects anything that would make the rate computation undefined
    /// or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.temperature.is_finite() && self.temperature > 0.) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        let km = self.km();
        if !(km.is_finite() && km > 0.) {
            return Err(ConfigError::InvalidKm(km));
        }
        for (field, value) in [
            ("activation energy", self.activation_energy),
            ("pre-exponential factor", self.pre_exponential_factor),
            ("reaction radius", self.reaction_radius),
            ("duration", self.duration),
        ] {
            if !(value.is_finite() && value >= 0.) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in [
            ("enzyme count", self.enzyme_count),
            ("substrate count", self.substrate_count),
        ] {
            if value > MAX_PARTICLE_COUNT {
                return Err(ConfigError::TooManyParticles {
                    field,
                    value,
                    max: MAX_PARTICLE_COUNT,
                });
            }
        }
        let rate_state = self.rate_state();
        if !(rate_state.rate_constant.is_finite() && rate_state.vmax.is_finite()) {
            return Err(ConfigError::NonFiniteRate {
                rate_constant: rate_state.rate_constant,
                vmax: rate_state.vmax,
            });
        }
        Ok(())
    }

    pub fn rate_state(&self) -> RateState {
        RateState::new(
            rate_constant(
                self.activation_energy,
                self.temperature,
                self.pre_exponential_factor,
            ),
            self.enzyme_count,
            self.km(),
        )
    }

    /// Compact, copy-pasteable form of the configuration.
    pub fn export_share_code(&self) -> Result<String, ConfigError> {
        self.validate()?;

        let mut bytes: Vec<u8> = Vec::new();

        let enzyme = EnzymePreset::ALL
            .iter()
            .position(|preset| *preset == self.enzyme)
            .unwrap_or(0);
        bytes.write_u8(enzyme as u8)?;
        bytes.write_u32::<LittleEndian>(self.enzyme_count as u32)?;
        bytes.write_u32::<LittleEndian>(self.substrate_count as u32)?;
        bytes.write_f64::<LittleEndian>(self.activation_energy)?;
        bytes.write_f64::<LittleEndian>(self.temperature)?;
        bytes.write_f64::<LittleEndian>(self.pre_exponential_factor)?;
        match self.km {
            KmSource::Preset => {
                bytes.write_u8(0)?;
                bytes.write_f64::<LittleEndian>(0.)?;
            }
            KmSource::Custom(km) => {
                bytes.write_u8(1)?;
                bytes.write_f64::<LittleEndian>(km)?;
            }
        }
        bytes.write_f64::<LittleEndian>(self.reaction_radius)?;
        bytes.write_f64::<LittleEndian>(self.duration)?;
        bytes.write_u8(match self.boundary {
            RadiusBoundary::Inclusive => 0,
            RadiusBoundary::Exclusive => 1,
        })?;
        bytes.write_u8(match self.proximity {
            ProximityScan::BruteForce => 0,
            ProximityScan::Grid => 1,
        })?;

        Ok(format!("@{}", base64::encode(bytes)))
    }

    pub fn from_share_code(code: &str) -> Result<Self, ConfigError> {
        let encoded = code
            .trim()
            .strip_prefix('@')
            .ok_or_else(|| ConfigError::ShareCode("missing leading `@`".to_string()))?;
        let bytes =
            base64::decode(encoded).map_err(|err| ConfigError::ShareCode(err.to_string()))?;
        let truncated = |_| ConfigError::ShareCode("code is truncated".to_string());

        let mut bytes = Cursor::new(bytes);
        let enzyme = *EnzymePreset::ALL
            .get(bytes.read_u8().map_err(truncated)? as usize)
            .ok_or_else(|| ConfigError::ShareCode("unknown enzyme".to_string()))?;
        let enzyme_count = bytes.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        let substrate_count = bytes.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        let activation_energy = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let temperature = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let pre_exponential_factor = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let km_flag = bytes.read_u8().map_err(truncated)?;
        let km_value = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let km = if km_flag == 0 {
            KmSource::Preset
        } else {
            KmSource::Custom(km_value)
        };
        let reaction_radius = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let duration = bytes.read_f64::<LittleEndian>().map_err(truncated)?;
        let boundary = if bytes.read_u8().map_err(truncated)? == 0 {
            RadiusBoundary::Inclusive
        } else {
            RadiusBoundary::Exclusive
        };
        let proximity = if bytes.read_u8().map_err(truncated)? == 0 {
            ProximityScan::BruteForce
        } else {
            ProximityScan::Grid
        };

        Ok(Self {
            enzyme,
            enzyme_count,
            substrate_count,
            activation_energy,
            temperature,
            pre_exponential_factor,
            km,
            reaction_radius,
            duration,
            boundary,
            proximity,
        })
    }
}
