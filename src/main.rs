mod analysis;
mod clock;
mod config;
mod consts;
mod error;
mod events;
mod kinetics;
mod particle;
mod presets;
mod report;
mod simulation;
mod simulation_manager;
mod spatial;
mod sweep;

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    io::{self, BufRead},
    path::PathBuf,
    sync::mpsc::{channel, RecvTimeoutError},
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use humantime::format_duration;
use log::{info, warn};
use rand::{rngs::SmallRng, SeedableRng};

use analysis::SimulationOutcome;
use clock::{FrameClock, WallClock};
use config::{KmSource, ProximityScan, RadiusBoundary, SimulationConfig};
use consts::{FRAMES_PER_SECOND, HUD_INTERVAL, PAUSED_UPDATE_INTERVAL};
use events::{Event, Recipient, Senders, StateUpdate};
use presets::EnzymePreset;
use simulation::Simulation;
use simulation_manager::SimulationManager;

#[derive(Parser, Debug)]
#[command(name = "enzymes", version, about = "Enzyme-substrate interaction simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print its kinetics
    Run(RunArgs),
    /// Run one headless simulation per substrate count, in parallel
    Sweep(SweepArgs),
    /// Print an outcome saved with `run --save`
    Show {
        path: PathBuf,
        /// Write its reaction-rate series to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the enzyme presets
    Presets,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file; missing fields take their default value
    #[arg(long, conflicts_with = "share_code")]
    config: Option<PathBuf>,
    /// Configuration exported with --print-share-code
    #[arg(long)]
    share_code: Option<String>,

    #[arg(long)]
    enzyme: Option<EnzymePreset>,
    #[arg(long)]
    enzymes: Option<usize>,
    #[arg(long)]
    substrates: Option<usize>,
    /// kJ/mol
    #[arg(long)]
    activation_energy: Option<f64>,
    /// K
    #[arg(long)]
    temperature: Option<f64>,
    /// In units of 10⁷
    #[arg(long)]
    pre_exponential_factor: Option<f64>,
    /// Michaelis constant
    #[arg(long, conflicts_with = "preset_km")]
    km: Option<f64>,
    /// Use the enzyme's own Michaelis constant
    #[arg(long)]
    preset_km: bool,
    #[arg(long)]
    reaction_radius: Option<f64>,
    /// Simulated time, e.g. `90s` or `2m`
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,
    /// Substrates exactly on the reaction radius don't react
    #[arg(long)]
    exclusive_radius: bool,
    /// Bucket enzymes in a grid instead of testing every pair
    #[arg(long)]
    grid: bool,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = match (&self.config, &self.share_code) {
            (Some(path), _) => SimulationConfig::load(path)
                .with_context(|| format!("could not load {}", path.display()))?,
            (None, Some(code)) => SimulationConfig::from_share_code(code)?,
            (None, None) => SimulationConfig::default(),
        };

        if let Some(enzyme) = self.enzyme {
            config.enzyme = enzyme;
        }
        if let Some(enzymes) = self.enzymes {
            config.enzyme_count = enzymes;
        }
        if let Some(substrates) = self.substrates {
            config.substrate_count = substrates;
        }
        if let Some(activation_energy) = self.activation_energy {
            config.activation_energy = activation_energy;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(pre_exponential_factor) = self.pre_exponential_factor {
            config.pre_exponential_factor = pre_exponential_factor;
        }
        if self.preset_km {
            config.km = KmSource::Preset;
        } else if let Some(km) = self.km {
            config.km = KmSource::Custom(km);
        }
        if let Some(reaction_radius) = self.reaction_radius {
            config.reaction_radius = reaction_radius;
        }
        if let Some(duration) = self.duration {
            config.duration = duration.as_secs_f64();
        }
        if self.exclusive_radius {
            config.boundary = RadiusBoundary::Exclusive;
        }
        if self.grid {
            config.proximity = ProximityScan::Grid;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Any word; the same seed replays the same run
    #[arg(long)]
    seed: Option<String>,
    /// Simulate as fast as possible on a fixed 60 fps clock, without
    /// keyboard control
    #[arg(long)]
    headless: bool,
    /// Write the reaction-rate series to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Save the outcome to a binary file
    #[arg(long)]
    save: Option<PathBuf>,
    #[arg(long)]
    print_share_code: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Initial substrate counts, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [10, 25, 50, 100, 200, 400])]
    counts: Vec<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => {
            let config = args.config.resolve()?;
            let points = sweep::substrate_sweep(&config, &args.counts, args.seed)?;
            print!("{}", report::format_sweep(&points));
            Ok(())
        }
        Command::Show { path, csv } => {
            let outcome = report::load_outcome(&path)?;
            println!("{}", outcome);
            if let Some(csv) = csv {
                report::write_time_series_csv(csv, &outcome)?;
            }
            Ok(())
        }
        Command::Presets => {
            for preset in EnzymePreset::ALL {
                let profile = preset.profile();
                println!(
                    "{:<16} substrate: {:<18} Km: {:>6} μM  kcat: {:>6}/s  diffusion: {:>4} μm²/s",
                    profile.name,
                    profile.substrate,
                    profile.km,
                    profile.kcat,
                    profile.diffusion_coefficient
                );
            }
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = args.config.resolve()?;
    if args.print_share_code {
        println!("{}", config.export_share_code()?);
    }

    let simulation = Simulation::new(&config, seeded_rng(args.seed.as_deref()))?;
    let outcome = if args.headless {
        SimulationManager::headless(
            simulation,
            FrameClock::with_fps(FRAMES_PER_SECOND),
            config.duration,
        )
        .run()
    } else {
        run_interactive(simulation, config.duration)?
    };

    println!("{}", outcome);

    if let Some(path) = &args.csv {
        report::write_time_series_csv(path, &outcome)?;
    }
    if let Some(path) = &args.save {
        report::save_outcome(path, &outcome)?;
    }
    Ok(())
}

fn run_interactive(simulation: Simulation<SmallRng>, duration: f64) -> Result<SimulationOutcome> {
    let (app_sender, app_receiver) = channel::<Event>();
    let (sim_sender, sim_receiver) = channel::<Event>();

    let senders = Senders::new(app_sender, sim_sender);

    let senders_clone = senders.origin(Recipient::Sim);
    let simulation_handle = thread::spawn(move || {
        SimulationManager::new(
            simulation,
            WallClock::start(),
            duration,
            senders_clone,
            sim_receiver,
        )
        .run()
    });

    let senders_clone = senders.origin(Recipient::App);
    thread::spawn(move || read_controls(senders_clone));

    println!("type `p` + enter to pause or resume, `q` + enter to stop");

    let mut next_hud = 0.;
    loop {
        match app_receiver.recv_timeout(PAUSED_UPDATE_INTERVAL) {
            Ok(Event::StateUpdate(update)) => {
                if update.elapsed >= next_hud {
                    log_hud(&update, duration);
                    next_hud = (update.elapsed / HUD_INTERVAL).floor() * HUD_INTERVAL + HUD_INTERVAL;
                }
            }
            Ok(Event::Finished) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {
                if simulation_handle.is_finished() {
                    break;
                }
            }
        }
    }

    simulation_handle
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))
}

fn log_hud(update: &StateUpdate, duration: f64) {
    info!(
        "time: {} / {} | substrates remaining: {} | products: {} | reactions: {} | binding probability: {:.2}%",
        format_duration(Duration::from_secs(update.elapsed as u64)),
        format_duration(Duration::from_secs(duration as u64)),
        update.remaining_substrates,
        update.product_count,
        update.reaction_count,
        update.binding_probability
    );
}

fn read_controls(senders: Senders) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "p" | "pause" => senders.send_sim(Event::TogglePause),
            "q" | "quit" | "stop" => {
                senders.send_sim(Event::Stop);
                break;
            }
            "" => {}
            other => warn!("unknown command `{}`", other),
        }
    }
}

fn seeded_rng(seed: Option<&str>) -> SmallRng {
    match seed {
        None | Some("") => SmallRng::from_entropy(),
        Some(seed) => {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            SmallRng::seed_from_u64(hasher.finish())
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use rand::Rng;

    use crate::{
        config::{KmSource, ProximityScan, RadiusBoundary},
        presets::EnzymePreset,
    };

    use super::{seeded_rng, Cli, Command};

    fn run_args(args: &[&str]) -> super::RunArgs {
        let cli = Cli::try_parse_from(["enzymes", "run"].iter().chain(args).copied()).unwrap();
        match cli.command {
            Command::Run(args) => args,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = run_args(&[
            "--enzyme",
            "catalase",
            "--enzymes",
            "5",
            "--duration",
            "2m",
            "--preset-km",
            "--exclusive-radius",
            "--grid",
        ]);
        let config = args.config.resolve().unwrap();
        assert_eq!(config.enzyme, EnzymePreset::Catalase);
        assert_eq!(config.enzyme_count, 5);
        assert_eq!(config.duration, 120.);
        assert_eq!(config.km, KmSource::Preset);
        assert_eq!(config.boundary, RadiusBoundary::Exclusive);
        assert_eq!(config.proximity, ProximityScan::Grid);
    }

    #[test]
    fn invalid_flags_are_reported() {
        let args = run_args(&["--temperature", "0"]);
        assert!(args.config.resolve().is_err());
    }

    #[test]
    fn km_conflicts_with_preset_km() {
        assert!(Cli::try_parse_from(["enzymes", "run", "--km", "3", "--preset-km"]).is_err());
    }

    #[test]
    fn share_code_is_accepted() {
        let code = crate::config::SimulationConfig {
            substrate_count: 42,
            ..Default::default()
        }
        .export_share_code()
        .unwrap();
        let args = run_args(&["--share-code", &code, "--enzymes", "3"]);
        let config = args.config.resolve().unwrap();
        assert_eq!(config.substrate_count, 42);
        assert_eq!(config.enzyme_count, 3);
    }

    #[test]
    fn sweep_counts_are_comma_separated() {
        let cli = Cli::try_parse_from(["enzymes", "sweep", "--counts", "5,10,20"]).unwrap();
        match cli.command {
            Command::Sweep(args) => assert_eq!(args.counts, vec![5, 10, 20]),
            other => panic!("expected sweep, got {:?}", other),
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = seeded_rng(Some("purple_enzyme"));
        let mut b = seeded_rng(Some("purple_enzyme"));
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
