use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnzymePreset {
    #[default]
    Hexokinase,
    Catalase,
    DnaPolymerase,
}

/// Physical and display properties of an enzyme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnzymeProfile {
    pub name: &'static str,
    /// μm²/s
    pub diffusion_coefficient: f32,
    /// Display radius (in pixels).
    pub radius: f32,
    /// Michaelis constant (μM).
    pub km: f64,
    /// Turnover rate (substrates/s), informational only.
    pub kcat: f64,
    pub color: [u8; 3],
    pub substrate: &'static str,
}

impl EnzymePreset {
    pub const ALL: [EnzymePreset; 3] = [
        EnzymePreset::Hexokinase,
        EnzymePreset::Catalase,
        EnzymePreset::DnaPolymerase,
    ];

    pub fn profile(self) -> EnzymeProfile {
        match self {
            EnzymePreset::Hexokinase => EnzymeProfile {
                name: "Hexokinase",
                diffusion_coefficient: 300.,
                radius: 10.,
                km: 100.,
                kcat: 100.,
                color: [0, 0, 255],
                substrate: "Glucose",
            },
            EnzymePreset::Catalase => EnzymeProfile {
                name: "Catalase",
                diffusion_coefficient: 160.,
                radius: 12.,
                km: 10.,
                kcat: 40000.,
                color: [255, 0, 0],
                substrate: "Hydrogen Peroxide",
            },
            // large and slow, but very high affinity
            EnzymePreset::DnaPolymerase => EnzymeProfile {
                name: "DNA Polymerase",
                diffusion_coefficient: 20.,
                radius: 15.,
                km: 0.1,
                kcat: 1000.,
                color: [0, 255, 0],
                substrate: "Nucleotides",
            },
        }
    }
}

impl Display for EnzymePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

impl FromStr for EnzymePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "hexokinase" => Ok(EnzymePreset::Hexokinase),
            "catalase" => Ok(EnzymePreset::Catalase),
            "dna-polymerase" => Ok(EnzymePreset::DnaPolymerase),
            _ => Err(ConfigError::UnknownEnzyme(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::EnzymePreset;

    #[test]
    fn preset_parses_loose_names() {
        assert_eq!("Hexokinase".parse::<EnzymePreset>().unwrap(), EnzymePreset::Hexokinase);
        assert_eq!(
            "DNA Polymerase".parse::<EnzymePreset>().unwrap(),
            EnzymePreset::DnaPolymerase
        );
        assert_eq!(
            "dna_polymerase".parse::<EnzymePreset>().unwrap(),
            EnzymePreset::DnaPolymerase
        );
        assert!("lactase".parse::<EnzymePreset>().is_err());
    }

    #[test]
    fn hexokinase_is_the_default() {
        assert_eq!(EnzymePreset::default(), EnzymePreset::Hexokinase);
    }

    #[test]
    fn preset_km_is_positive() {
        for preset in EnzymePreset::ALL {
            assert!(preset.profile().km > 0.);
        }
    }
}
