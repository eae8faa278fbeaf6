use std::{
    sync::mpsc::Receiver,
    thread::{sleep, yield_now},
    time::Instant,
};

use log::{debug, info};
use rand::Rng;

use crate::{
    analysis::SimulationOutcome,
    clock::Clock,
    consts::{PAUSED_UPDATE_INTERVAL, UPDATE_INTERVAL},
    events::{Event, Senders, StateUpdate},
    simulation::Simulation,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationState {
    Paused,
    Running,
    Terminated,
}

/// Drives a [`Simulation`] frame by frame: reads control events, steps,
/// reports, and stops once the configured duration has elapsed.
pub struct SimulationManager<R, C> {
    simulation_state: SimulationState,

    simulation: Simulation<R>,
    clock: C,
    /// Simulated seconds.
    duration: f64,
    /// Sleep out the rest of each frame interval.
    governor: bool,
    stopped_early: bool,

    senders: Option<Senders>,
    receiver: Option<Receiver<Event>>,
}

impl<R: Rng, C: Clock> SimulationManager<R, C> {
    pub fn new(
        simulation: Simulation<R>,
        clock: C,
        duration: f64,
        senders: Senders,
        receiver: Receiver<Event>,
    ) -> Self {
        Self {
            simulation_state: SimulationState::Running,

            simulation,
            clock,
            duration,
            governor: true,
            stopped_early: false,

            senders: Some(senders),
            receiver: Some(receiver),
        }
    }

    /// No events in or out and no frame governor: runs as fast as it can.
    pub fn headless(simulation: Simulation<R>, clock: C, duration: f64) -> Self {
        Self {
            simulation_state: SimulationState::Running,

            simulation,
            clock,
            duration,
            governor: false,
            stopped_early: false,

            senders: None,
            receiver: None,
        }
    }

    #[cfg(test)]
    pub fn with_governor(mut self, governor: bool) -> Self {
        self.governor = governor;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> SimulationState {
        self.simulation_state
    }

    #[cfg(test)]
    pub fn simulation(&self) -> &Simulation<R> {
        &self.simulation
    }

    /// Runs one frame. Returns `false` once the simulation is over.
    pub fn update(&mut self) -> bool {
        let events = self
            .receiver
            .as_ref()
            .map(|receiver| receiver.try_iter().collect::<Vec<_>>())
            .unwrap_or_default();
        if !events.is_empty() {
            debug!("Received events {:?}", events);
        }
        for event in events {
            match event {
                Event::Stop => {
                    self.stopped_early = true;
                    self.terminate();
                }
                Event::TogglePause => self.toggle_pause(),
                _ => {}
            }
        }

        match self.simulation_state {
            SimulationState::Terminated => return false,
            SimulationState::Paused => {
                if self.governor {
                    sleep(PAUSED_UPDATE_INTERVAL);
                } else {
                    yield_now();
                }
                return true;
            }
            SimulationState::Running => {}
        }

        let elapsed = self.clock.elapsed();
        if elapsed >= self.duration {
            self.terminate();
            return false;
        }

        let start_time = Instant::now();
        self.simulation.step(elapsed);
        self.clock.tick();
        let computation_time = start_time.elapsed();

        if let Some(senders) = &self.senders {
            let simulation = &self.simulation;
            senders.send_app(Event::StateUpdate(
                StateUpdate::new(
                    elapsed,
                    simulation.substrates.len(),
                    simulation.products.len(),
                    simulation.reaction_count,
                    simulation.binding_percentage(),
                )
                .computation_duration(computation_time)
                .particles(
                    simulation
                        .enzymes
                        .iter()
                        .chain(&simulation.substrates)
                        .chain(&simulation.products),
                ),
            ));
        }

        if self.governor && computation_time < UPDATE_INTERVAL {
            sleep(UPDATE_INTERVAL - computation_time);
        }

        true
    }

    /// Runs until the duration is over or a stop event arrives.
    pub fn run(mut self) -> SimulationOutcome {
        info!(
            "simulating {} enzymes and {} substrates for {}s",
            self.simulation.enzymes.len(),
            self.simulation.initial_substrate_count,
            self.duration
        );

        while self.update() {}

        let outcome = SimulationOutcome::from_simulation(&self.simulation, self.stopped_early);
        info!(
            "simulation {} after {} frames, {} reactions",
            if outcome.stopped_early { "stopped" } else { "finished" },
            self.simulation.frame_count(),
            outcome.total_reactions
        );
        outcome
    }

    fn toggle_pause(&mut self) {
        match self.simulation_state {
            SimulationState::Running => {
                self.simulation_state = SimulationState::Paused;
                self.clock.pause();
                debug!("simulation paused");
            }
            SimulationState::Paused => {
                self.simulation_state = SimulationState::Running;
                self.clock.resume();
                debug!("simulation resumed");
            }
            SimulationState::Terminated => {}
        }
    }

    fn terminate(&mut self) {
        if self.simulation_state == SimulationState::Terminated {
            return;
        }
        self.simulation_state = SimulationState::Terminated;
        if let Some(senders) = &self.senders {
            senders.send_app(Event::Finished);
        }
    }
}
