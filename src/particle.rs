use egui::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{PRODUCT_COLOR, SUBSTRATE_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Enzyme,
    Substrate,
    Product,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Displacement per frame, fixed for the particle's lifetime.
    pub velocity: Vec2,
    pub radius: f32,
    pub species: Species,
    pub color: [u8; 3],
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, species: Species, color: [u8; 3]) -> Self {
        Self {
            position,
            velocity,
            radius,
            species,
            color,
        }
    }

    /// Spawns a particle anywhere in the field, moving in a random
    /// direction scaled by the square root of its diffusion coefficient.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        field: Vec2,
        species: Species,
        diffusion_coefficient: f32,
        radius: f32,
        color: [u8; 3],
    ) -> Self {
        let position = Vec2::new(rng.gen_range(0. ..field.x), rng.gen_range(0. ..field.y));
        let speed = diffusion_coefficient.sqrt();
        let velocity = Vec2::new(
            rng.gen_range(-1. ..1.) * speed,
            rng.gen_range(-1. ..1.) * speed,
        );
        Self::new(position, velocity, radius, species, color)
    }

    /// Product left behind by a reacted substrate. Products don't move.
    pub fn product_of(substrate: &Particle) -> Self {
        Self::new(
            substrate.position,
            Vec2::ZERO,
            SUBSTRATE_RADIUS,
            Species::Product,
            PRODUCT_COLOR,
        )
    }

    /// Moves by one frame, wrapping around the field edges.
    pub fn advance(&mut self, field: Vec2) {
        self.position = Vec2::new(
            wrap(self.position.x + self.velocity.x, field.x),
            wrap(self.position.y + self.velocity.y, field.y),
        );
    }

    pub fn distance_to(&self, other: &Particle) -> f32 {
        (self.position - other.position).length()
    }
}

fn wrap(value: f32, size: f32) -> f32 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid rounds tiny negative values up to `size`
    if wrapped >= size {
        0.
    } else {
        wrapped
    }
}
