use std::{fmt::Display, sync::mpsc::Sender, time::Duration};

use egui::Vec2;
use log::{debug, trace};

use crate::particle::{Particle, Species};

#[derive(Debug, Clone)]
pub enum Event {
    /// Ends the run; the frame in progress is discarded.
    Stop,
    TogglePause,

    StateUpdate(StateUpdate),
    Finished,
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Stop => write!(f, "Stop"),
            Event::TogglePause => write!(f, "TogglePause"),
            Event::StateUpdate(state_update) => write!(f, "{}", state_update),
            Event::Finished => write!(f, "Finished"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Recipient {
    App,
    Sim,
}

#[derive(Debug, Clone)]
pub struct Senders {
    origin: Option<Recipient>,

    pub app_sender: Sender<Event>,
    pub sim_sender: Sender<Event>,
}

impl Senders {
    pub fn new(app_sender: Sender<Event>, sim_sender: Sender<Event>) -> Self {
        Senders {
            origin: None,

            app_sender,
            sim_sender,
        }
    }

    /// Same senders, tagged with the thread they are used from.
    pub fn origin(&self, origin: Recipient) -> Self {
        Senders {
            origin: Some(origin),
            ..self.clone()
        }
    }

    pub fn send_app(&self, event: Event) {
        self.send(Recipient::App, event);
    }

    pub fn send_sim(&self, event: Event) {
        self.send(Recipient::Sim, event);
    }

    fn send(&self, send_to: Recipient, event: Event) {
        trace!(
            "{}to {:?}: {}",
            self.origin
                .clone()
                .map_or(String::new(), |origin| format!("{:?} ", origin)),
            send_to,
            event
        );
        let result = match send_to {
            Recipient::App => self.app_sender.send(event),
            Recipient::Sim => self.sim_sender.send(event),
        };
        if result.is_err() {
            debug!("{:?} is gone, event dropped", send_to);
        }
    }
}

/// Where a particle is and what it is, for drawing.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub radius: f32,
    pub species: Species,
    pub color: [u8; 3],
}

impl From<&Particle> for ParticleSnapshot {
    fn from(particle: &Particle) -> Self {
        Self {
            position: particle.position,
            radius: particle.radius,
            species: particle.species,
            color: particle.color,
        }
    }
}

/// What the front end gets to show after every frame.
#[derive(Debug, Clone)]
pub struct StateUpdate {
    pub elapsed: f64,
    pub remaining_substrates: usize,
    pub product_count: usize,
    pub reaction_count: usize,
    /// Percent.
    pub binding_probability: f64,

    pub computation_time: Option<Duration>,
    pub particles: Option<Vec<ParticleSnapshot>>,
}

impl StateUpdate {
    pub fn new(
        elapsed: f64,
        remaining_substrates: usize,
        product_count: usize,
        reaction_count: usize,
        binding_probability: f64,
    ) -> Self {
        StateUpdate {
            elapsed,
            remaining_substrates,
            product_count,
            reaction_count,
            binding_probability,
            computation_time: None,
            particles: None,
        }
    }

    pub fn computation_duration(mut self, computation_duration: Duration) -> StateUpdate {
        self.computation_time = Some(computation_duration);
        self
    }
    pub fn particles<'a, I>(mut self, particles: I) -> StateUpdate
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        self.particles = Some(particles.into_iter().map(ParticleSnapshot::from).collect());
        self
    }
}

impl Display for StateUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields = vec![
            format!("elapsed: {:.2}", self.elapsed),
            format!("substrates: {}", self.remaining_substrates),
            format!("products: {}", self.product_count),
            format!("reactions: {}", self.reaction_count),
        ];

        if self.computation_time.is_some() {
            fields.push("computation_duration".to_string());
        }
        if let Some(particles) = &self.particles {
            fields.push(format!("particles: {}", particles.len()));
        }

        write!(f, "StateUpdate {{ {} }}", fields.join(", "))
    }
}
