//! Waveform Generators
//!
//! Per-waveform progress state for sweep mode, plus the sine sampling shared
//! with the animation. Progress is built fresh every time a waveform is
//! entered and is dropped when the sweep stops.

use crate::system::state::SystemState;
use core::f32::consts::PI;
use embassy_time::{Duration, Instant};

/// Step applied by the linear and triangle ramps each frame
pub const STEP_SIZE: i32 = 1;

/// Period of the sweep-mode sine
pub const SINE_PERIOD: Duration = Duration::from_millis(10_000);

/// Samples `center + amp * sin(theta)` for the current range, truncated toward
/// zero as a whole
pub fn sine_power(state: &SystemState, theta: f32) -> i32 {
    let center = state.center() as f32;
    let amplitude = state.amplitude() as f32;
    (center + amplitude * libm::sinf(theta)) as i32
}

/// Phase angle of a periodic signal `elapsed` into its cycle
///
/// Reduces `elapsed` modulo `period` before converting to float, so precision
/// does not degrade over long runs.
pub fn phase_angle(elapsed: Duration, period: Duration) -> f32 {
    let period_ticks = period.as_ticks().max(1);
    let into_cycle = elapsed.as_ticks() % period_ticks;
    2.0 * PI * (into_cycle as f32 / period_ticks as f32)
}

/// Stepped ramp that wraps from one bound to the other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linear {
    current: i32,
}

impl Linear {
    /// Starts at the lower bound
    pub fn new(state: &SystemState) -> Self {
        Self {
            current: state.sweep_min(),
        }
    }

    /// Position that the next frame will emit
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Returns the value to emit and moves one step in the configured
    /// direction
    pub fn advance(&mut self, state: &SystemState) -> i32 {
        let out = self.current;
        if state.reverse() {
            self.current -= STEP_SIZE;
            if self.current < state.sweep_min() {
                self.current = state.sweep_max();
            }
        } else {
            self.current += STEP_SIZE;
            if self.current > state.sweep_max() {
                self.current = state.sweep_min();
            }
        }
        out
    }
}

/// Stepped ramp that bounces between the bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    value: i32,
    rising: bool,
}

impl Triangle {
    /// Starts at the lower bound, heading up
    pub fn new(state: &SystemState) -> Self {
        Self {
            value: state.sweep_min(),
            rising: true,
        }
    }

    /// Value that the next frame will emit
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Whether the ramp is heading toward the upper bound
    pub fn rising(&self) -> bool {
        self.rising
    }

    /// Returns the value to emit, then steps toward the current target bound
    /// and turns around once it is reached
    pub fn advance(&mut self, state: &SystemState) -> i32 {
        // the range may have been resized or shifted underneath us
        self.value = self.value.clamp(state.sweep_min(), state.sweep_max());
        let out = self.value;
        if self.rising {
            self.value += STEP_SIZE;
            if self.value >= state.sweep_max() {
                self.rising = false;
            }
        } else {
            self.value -= STEP_SIZE;
            if self.value <= state.sweep_min() {
                self.rising = true;
            }
        }
        out
    }
}

/// Two-level signal that toggles every two frame delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    high: bool,
    last_toggle: Instant,
}

impl Square {
    /// Starts low; the first toggle comes two frame delays after `now`
    pub fn new(now: Instant) -> Self {
        Self {
            high: false,
            last_toggle: now,
        }
    }

    /// Whether the output currently sits at the upper bound
    pub fn high(&self) -> bool {
        self.high
    }

    /// Toggles if more than two frame delays have passed since the last
    /// toggle, then returns the bound to emit
    pub fn advance(&mut self, state: &SystemState, now: Instant) -> i32 {
        let half_period = state.frame_delay() * 2;
        if now.saturating_duration_since(self.last_toggle) > half_period {
            self.high = !self.high;
            self.last_toggle = now;
        }
        if self.high {
            state.sweep_max()
        } else {
            state.sweep_min()
        }
    }
}
