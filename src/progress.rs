//! Time-based progress for backend work that reports no real progress.
//!
//! The bar starts at 10%, climbs 10 points every 300 ms while the request is
//! in flight and stalls at 70%. It jumps to 80% once the response arrives
//! and to 100% when the result has been processed.

use std::time::Duration;

const START: u8 = 10;
const STEP: u8 = 10;
const IN_FLIGHT_CAP: u8 = 70;
const RESPONSE_RECEIVED: u8 = 80;
const TICK: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InFlight,
    Processing,
    Done,
}

#[derive(Debug, Clone)]
pub struct SimulatedProgress {
    phase: Phase,
    percent: u8,
}

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProgress {
    pub fn new() -> Self {
        Self {
            phase: Phase::InFlight,
            percent: START,
        }
    }

    /// Advance the in-flight animation to `elapsed` since the request started.
    /// Has no effect after the response arrived; never moves backwards.
    pub fn tick(&mut self, elapsed: Duration) -> u8 {
        if self.phase == Phase::InFlight {
            let ticks = (elapsed.as_millis() / TICK.as_millis()).min(u8::MAX as u128) as u32;
            let target = (START as u32 + ticks * STEP as u32).min(IN_FLIGHT_CAP as u32) as u8;
            self.percent = self.percent.max(target);
        }
        self.percent
    }

    pub fn response_received(&mut self) -> u8 {
        if self.phase == Phase::InFlight {
            self.phase = Phase::Processing;
            self.percent = RESPONSE_RECEIVED;
        }
        self.percent
    }

    pub fn complete(&mut self) -> u8 {
        self.phase = Phase::Done;
        self.percent = 100;
        self.percent
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Percentage of a sequential batch that has finished, clamped to 0..=100.
pub fn batch_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (((done.min(total) as f64 / total as f64) * 100.0).round()) as u8
}
