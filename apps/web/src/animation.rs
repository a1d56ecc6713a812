use std::f64::consts::TAU;

/// Seconds per full pulse of the selected-zone ring.
const PULSE_PERIOD_SECONDS: f64 = 1.5;
/// Longest frame gap fed into the clock, so a hidden tab does not jump.
const MAX_FRAME_DELTA: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PulseClock {
    phase: f64,
    last_tick: Option<f64>,
    paused: bool,
}

impl PulseClock {
    pub fn advance(&mut self, now_seconds: f64) {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));
        self.last_tick = Some(now_seconds);

        if !self.paused {
            self.phase = delta
                .mul_add(TAU / PULSE_PERIOD_SECONDS, self.phase)
                .rem_euclid(TAU);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn phase(&self) -> f64 {
        self.phase
    }

    /// Ring scale between 1.0 and 2.0.
    pub fn ring_scale(&self) -> f64 {
        self.phase.sin().mul_add(0.5, 1.5)
    }
}
