use std::time::Duration;

// field

/// Width of the toroidal field, in the same units as particle
/// coordinates and the reaction radius.
pub const FIELD_WIDTH: f32 = 1200.;
/// Height of the toroidal field.
pub const FIELD_HEIGHT: f32 = 800.;

/// Max particle count per species.
pub const MAX_PARTICLE_COUNT: usize = 15000;

// particles

/// Substrate diffusion coefficient (μm²/s).
pub const SUBSTRATE_DIFFUSION_COEFFICIENT: f32 = 300.;
/// Display radius of substrates and products (in pixels).
pub const SUBSTRATE_RADIUS: f32 = 5.;
pub const SUBSTRATE_COLOR: [u8; 3] = [0, 255, 0];
pub const PRODUCT_COLOR: [u8; 3] = [255, 165, 0];

// kinetics

/// Gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;
/// Pre-exponential factors are entered in units of 10⁷.
pub const PRE_EXPONENTIAL_SCALE: f64 = 1e7;
/// Keeps the first rate sample finite.
pub const TIME_EPSILON: f64 = 1e-5;

// spatial grid

/// Smallest grid cell, so tiny reaction radii don't explode the
/// bucket count.
pub const MIN_GRID_CELL_SIZE: f32 = 8.;

// simulation manager

pub const FRAMES_PER_SECOND: f64 = 60.;
/// Min update interval when the simulation is running.
pub const UPDATE_INTERVAL: Duration = Duration::from_micros(16_667);
/// Min update interval when the simulation is paused.
pub const PAUSED_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

// app

/// Simulated seconds between two HUD log lines.
pub const HUD_INTERVAL: f64 = 1.;
