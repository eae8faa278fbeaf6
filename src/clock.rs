use std::time::{Duration, Instant};

/// Source of the simulated elapsed time.
pub trait Clock {
    /// Seconds of running time so far.
    fn elapsed(&self) -> f64;
    /// Called once after every committed frame.
    fn tick(&mut self) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}

/// Deterministic clock: every frame lasts exactly `frame_duration`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames: u64,
    frame_duration: f64,
}

impl FrameClock {
    pub fn new(frame_duration: f64) -> Self {
        Self {
            frames: 0,
            frame_duration,
        }
    }

    pub fn with_fps(frames_per_second: f64) -> Self {
        Self::new(1. / frames_per_second)
    }
}

impl Clock for FrameClock {
    fn elapsed(&self) -> f64 {
        self.frames as f64 * self.frame_duration
    }

    fn tick(&mut self) {
        self.frames += 1;
    }
}

/// Real time, stopped while the simulation is paused.
#[derive(Debug, Clone)]
pub struct WallClock {
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            running_since: Some(Instant::now()),
            accumulated: Duration::ZERO,
        }
    }
}

impl Clock for WallClock {
    fn elapsed(&self) -> f64 {
        let running = self
            .running_since
            .map_or(Duration::ZERO, |since| since.elapsed());
        (self.accumulated + running).as_secs_f64()
    }

    fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }
}
