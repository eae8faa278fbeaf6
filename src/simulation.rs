use egui::Vec2;
use rand::Rng;

use crate::{
    config::{ProximityScan, RadiusBoundary, SimulationConfig},
    consts::{
        FIELD_HEIGHT, FIELD_WIDTH, SUBSTRATE_COLOR, SUBSTRATE_DIFFUSION_COEFFICIENT,
        SUBSTRATE_RADIUS, TIME_EPSILON,
    },
    error::ConfigError,
    kinetics::{binding_probability, RateState},
    particle::{Particle, Species},
    spatial::EnzymeGrid,
};

/// Particles, counters and the reaction-rate series of one run.
///
/// Every random draw goes through the injected generator `R`, so a
/// seeded generator replays a run exactly.
#[derive(Debug, Clone)]
pub struct Simulation<R> {
    pub field: Vec2,

    pub enzymes: Vec<Particle>,
    pub substrates: Vec<Particle>,
    pub products: Vec<Particle>,

    pub initial_substrate_count: usize,
    pub reaction_count: usize,
    /// One `reaction_count / elapsed` sample per frame.
    pub reaction_rates: Vec<f64>,

    pub rate_state: RateState,
    pub reaction_radius: f32,
    pub boundary: RadiusBoundary,

    grid: Option<EnzymeGrid>,
    rng: R,
}

impl<R: Rng> Simulation<R> {
    /// Validates `config` and spawns enzymes and substrates.
    pub fn new(config: &SimulationConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        let profile = config.enzyme.profile();

        let enzymes = (0..config.enzyme_count)
            .map(|_| {
                Particle::spawn(
                    &mut rng,
                    field,
                    Species::Enzyme,
                    profile.diffusion_coefficient,
                    profile.radius,
                    profile.color,
                )
            })
            .collect();
        let substrates = (0..config.substrate_count)
            .map(|_| {
                Particle::spawn(
                    &mut rng,
                    field,
                    Species::Substrate,
                    SUBSTRATE_DIFFUSION_COEFFICIENT,
                    SUBSTRATE_RADIUS,
                    SUBSTRATE_COLOR,
                )
            })
            .collect();

        Ok(Self::from_particles(
            field,
            enzymes,
            substrates,
            config.rate_state(),
            config.reaction_radius as f32,
            config.boundary,
            config.proximity,
            rng,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_particles(
        field: Vec2,
        enzymes: Vec<Particle>,
        substrates: Vec<Particle>,
        rate_state: RateState,
        reaction_radius: f32,
        boundary: RadiusBoundary,
        proximity: ProximityScan,
        rng: R,
    ) -> Self {
        let grid = match proximity {
            ProximityScan::BruteForce => None,
            ProximityScan::Grid => Some(EnzymeGrid::new(field, reaction_radius)),
        };
        Self {
            field,
            initial_substrate_count: substrates.len(),
            enzymes,
            substrates,
            products: Vec::new(),
            reaction_count: 0,
            reaction_rates: Vec::new(),
            rate_state,
            reaction_radius,
            boundary,
            grid,
            rng,
        }
    }

    /// Advances the simulation by one frame. `elapsed` is the simulated
    /// time at the start of the frame.
    pub fn step(&mut self, elapsed: f64) {
        let Self {
            field,
            enzymes,
            substrates,
            products,
            reaction_count,
            reaction_rates,
            rate_state,
            reaction_radius,
            boundary,
            grid,
            rng,
            ..
        } = self;

        for enzyme in enzymes.iter_mut() {
            enzyme.advance(*field);
        }
        for substrate in substrates.iter_mut() {
            substrate.advance(*field);
        }
        if let Some(grid) = grid.as_mut() {
            grid.rebuild(enzymes.as_slice());
        }

        // same for every substrate of this frame, the active set only
        // shrinks once all of them have been tested
        let probability = rate_state.reaction_probability(substrates.len());

        let mut candidates = Vec::new();
        substrates.retain(|substrate| {
            let within = |i: &usize| {
                boundary.within(enzymes[*i].distance_to(substrate), *reaction_radius)
            };
            let reacted = match grid.as_ref() {
                Some(grid) => {
                    grid.candidates(substrate.position, *reaction_radius, &mut candidates);
                    candidates
                        .iter()
                        .copied()
                        .filter(within)
                        .any(|_| rng.gen::<f64>() < probability)
                }
                None => (0..enzymes.len())
                    .filter(within)
                    .any(|_| rng.gen::<f64>() < probability),
            };

            if reacted {
                products.push(Particle::product_of(substrate));
                *reaction_count += 1;
            }
            !reacted
        });

        reaction_rates.push(*reaction_count as f64 / (elapsed + TIME_EPSILON));
    }

    pub fn frame_count(&self) -> usize {
        self.reaction_rates.len()
    }

    /// Chance, in percent, that an enzyme is bound to a substrate.
    pub fn binding_percentage(&self) -> f64 {
        binding_probability(self.substrates.len(), self.rate_state.km) * 100.
    }
}

#[cfg(test)]
mod test {
    use egui::Vec2;
    use rand::{
        rngs::{mock::StepRng, SmallRng},
        SeedableRng,
    };

    use crate::{
        config::{KmSource, ProximityScan, RadiusBoundary, SimulationConfig},
        kinetics::RateState,
        particle::{Particle, Species},
    };

    use super::Simulation;

    fn still(species: Species, x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 5., species, [0, 0, 0])
    }

    /// RNG whose every float draw is 0, so any in-range pair reacts.
    fn always_react() -> StepRng {
        StepRng::new(0, 0)
    }

    fn rate_state() -> RateState {
        RateState::new(1., 1, 30.)
    }

    #[test]
    fn substrate_on_the_radius_reacts_when_inclusive() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![still(Species::Enzyme, 100., 100.)],
            vec![still(Species::Substrate, 103., 104.)],
            rate_state(),
            5.,
            RadiusBoundary::Inclusive,
            ProximityScan::BruteForce,
            always_react(),
        );
        sim.step(0.);
        assert_eq!(sim.reaction_count, 1);
        assert!(sim.substrates.is_empty());
        assert_eq!(sim.products[0].position, Vec2::new(103., 104.));
    }

    #[test]
    fn substrate_on_the_radius_is_ignored_when_exclusive() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![still(Species::Enzyme, 100., 100.)],
            vec![still(Species::Substrate, 103., 104.)],
            rate_state(),
            5.,
            RadiusBoundary::Exclusive,
            ProximityScan::BruteForce,
            always_react(),
        );
        sim.step(0.);
        assert_eq!(sim.reaction_count, 0);
        assert_eq!(sim.substrates.len(), 1);
    }

    #[test]
    fn substrate_reacts_with_at_most_one_enzyme() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![
                still(Species::Enzyme, 100., 100.),
                still(Species::Enzyme, 101., 100.),
                still(Species::Enzyme, 100., 101.),
            ],
            vec![still(Species::Substrate, 100., 100.)],
            rate_state(),
            10.,
            RadiusBoundary::Inclusive,
            ProximityScan::BruteForce,
            always_react(),
        );
        sim.step(0.);
        assert_eq!(sim.reaction_count, 1);
        assert_eq!(sim.products.len(), 1);
    }

    #[test]
    fn far_substrates_never_react() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![still(Species::Enzyme, 100., 100.)],
            vec![still(Species::Substrate, 600., 600.)],
            rate_state(),
            10.,
            RadiusBoundary::Inclusive,
            ProximityScan::Grid,
            always_react(),
        );
        for frame in 0..10 {
            sim.step(frame as f64);
        }
        assert_eq!(sim.reaction_count, 0);
        assert_eq!(sim.frame_count(), 10);
    }

    #[test]
    fn no_reaction_without_vmax() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![still(Species::Enzyme, 100., 100.)],
            vec![still(Species::Substrate, 100., 100.)],
            RateState::new(0., 1, 30.),
            10.,
            RadiusBoundary::Inclusive,
            ProximityScan::BruteForce,
            always_react(),
        );
        sim.step(0.);
        assert_eq!(sim.reaction_count, 0);
    }

    #[test]
    fn rate_sample_is_reactions_over_time() {
        let mut sim = Simulation::from_particles(
            Vec2::new(1200., 800.),
            vec![still(Species::Enzyme, 100., 100.)],
            vec![
                still(Species::Substrate, 100., 100.),
                still(Species::Substrate, 700., 100.),
            ],
            rate_state(),
            10.,
            RadiusBoundary::Inclusive,
            ProximityScan::BruteForce,
            always_react(),
        );
        sim.step(0.);
        sim.step(2.);
        assert!((sim.reaction_rates[0] - 1e5).abs() < 1e-6);
        assert!((sim.reaction_rates[1] - 1. / (2. + 1e-5)).abs() < 1e-12);
    }

    #[test]
    fn empty_simulation_steps_without_error() {
        let config = SimulationConfig {
            enzyme_count: 0,
            substrate_count: 0,
            ..Default::default()
        };
        let mut sim = Simulation::new(&config, SmallRng::seed_from_u64(0)).unwrap();
        sim.step(0.);
        sim.step(1.);
        assert_eq!(sim.reaction_rates, vec![0., 0.]);
        assert_eq!(sim.binding_percentage(), 0.);
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let config = SimulationConfig {
            temperature: 0.,
            ..Default::default()
        };
        assert!(Simulation::new(&config, SmallRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn substrates_only_turn_into_products() {
        let config = SimulationConfig {
            enzyme_count: 50,
            substrate_count: 100,
            reaction_radius: 40.,
            km: KmSource::Custom(10.),
            ..Default::default()
        };
        let mut sim = Simulation::new(&config, SmallRng::seed_from_u64(42)).unwrap();

        assert_eq!(sim.initial_substrate_count, 100);
        let mut previous = sim.substrates.len();
        for frame in 0..600 {
            sim.step(frame as f64 / 60.);
            assert!(sim.substrates.len() <= previous);
            assert_eq!(
                sim.products.len() + sim.substrates.len(),
                sim.initial_substrate_count
            );
            assert_eq!(sim.products.len(), sim.reaction_count);
            previous = sim.substrates.len();
        }
        assert!(sim.reaction_count > 0);
    }

    #[test]
    fn grid_scan_matches_brute_force() {
        for seed in [1, 2, 3] {
            let config = SimulationConfig {
                enzyme_count: 40,
                substrate_count: 80,
                reaction_radius: 25.,
                ..Default::default()
            };
            let mut brute = Simulation::new(&config, SmallRng::seed_from_u64(seed)).unwrap();
            let mut grid = Simulation::new(
                &SimulationConfig {
                    proximity: ProximityScan::Grid,
                    ..config
                },
                SmallRng::seed_from_u64(seed),
            )
            .unwrap();

            for frame in 0..300 {
                let elapsed = frame as f64 / 60.;
                brute.step(elapsed);
                grid.step(elapsed);
            }
            assert_eq!(brute.reaction_count, grid.reaction_count);
            assert_eq!(brute.reaction_rates, grid.reaction_rates);
            assert_eq!(brute.substrates, grid.substrates);
        }
    }
}
