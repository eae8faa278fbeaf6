//! Result summary and outcome files.

use std::{fmt::Display, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use postcard::{from_bytes, to_allocvec};
use serde::Serialize;

use crate::{analysis::SimulationOutcome, sweep::SweepPoint};

impl Display for SimulationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}",
            if self.stopped_early {
                "Simulation stopped early"
            } else {
                "Simulation complete!"
            }
        )?;
        writeln!(f, "Frames: {}", self.frame_count())?;
        writeln!(f, "Total products formed: {}", self.total_products)?;
        writeln!(f, "Total reactions: {}", self.total_reactions)?;
        writeln!(
            f,
            "Average reaction rate: {:.2} reactions/sec",
            self.average_rate
        )?;
        writeln!(f, "Vmax (max reaction rate): {:.2}", self.vmax)?;
        match self.km {
            Some(km) => writeln!(f, "Km (Michaelis constant): frame {}", km)?,
            None => writeln!(f, "Km: not determined")?,
        }
        write!(
            f,
            "Model: k = {:.3e}, Vmax = {:.3e}, Km = {:.2}",
            self.model.rate_constant, self.model.vmax, self.model.km
        )
    }
}

#[derive(Debug, Serialize)]
struct RateRecord {
    frame: usize,
    reaction_rate: f64,
}

/// One row per frame.
pub fn write_time_series_csv<P: AsRef<Path>>(path: P, outcome: &SimulationOutcome) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("could not create {}", path.display()))?;
    for (frame, reaction_rate) in outcome.reaction_rates.iter().copied().enumerate() {
        writer.serialize(RateRecord {
            frame,
            reaction_rate,
        })?;
    }
    writer.flush()?;
    info!("reaction rates written to {}", path.display());
    Ok(())
}

pub fn save_outcome<P: AsRef<Path>>(path: P, outcome: &SimulationOutcome) -> Result<()> {
    let path = path.as_ref();
    let encoded = to_allocvec(outcome)?;
    fs::write(path, encoded).with_context(|| format!("could not write {}", path.display()))?;
    info!("outcome saved to {}", path.display());
    Ok(())
}

pub fn load_outcome<P: AsRef<Path>>(path: P) -> Result<SimulationOutcome> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    Ok(from_bytes(&bytes)?)
}

pub fn format_sweep(points: &[SweepPoint]) -> String {
    let mut table = format!(
        "{:>10} {:>10} {:>14} {:>14} {:>14}\n",
        "substrates", "products", "avg rate", "max rate", "theoretical"
    );
    for point in points {
        table.push_str(&format!(
            "{:>10} {:>10} {:>14.3} {:>14.3} {:>14.3e}\n",
            point.substrate_count,
            point.products,
            point.average_rate,
            point.empirical_vmax,
            point.theoretical_rate
        ));
    }
    table
}

#[cfg(test)]
mod test {
    use std::{env, fs, process};

    use crate::{analysis::SimulationOutcome, kinetics::RateState};

    use super::{load_outcome, save_outcome, write_time_series_csv};

    fn outcome(km: Option<usize>) -> SimulationOutcome {
        SimulationOutcome {
            total_products: 3,
            total_reactions: 3,
            average_rate: 1.5,
            vmax: 4.,
            km,
            reaction_rates: vec![0., 4., 1.5, 0.5],
            model: RateState::new(2e-3, 20, 30.),
            stopped_early: false,
        }
    }

    #[test]
    fn summary_mentions_undetermined_km() {
        let text = outcome(None).to_string();
        assert!(text.contains("Total products formed: 3"));
        assert!(text.contains("Km: not determined"));

        let text = outcome(Some(1)).to_string();
        assert!(text.contains("Km (Michaelis constant): frame 1"));
    }

    #[test]
    fn outcome_file_round_trips() {
        let path = env::temp_dir().join(format!("enzymes-outcome-{}.bin", process::id()));
        save_outcome(&path, &outcome(Some(1))).unwrap();
        assert_eq!(load_outcome(&path).unwrap(), outcome(Some(1)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn csv_has_one_row_per_frame() {
        let path = env::temp_dir().join(format!("enzymes-rates-{}.csv", process::id()));
        write_time_series_csv(&path, &outcome(None)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "frame,reaction_rate");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "1,4.0");
        fs::remove_file(path).unwrap();
    }
}
