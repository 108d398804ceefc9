//! Drive Engine
//!
//! Turns the current [`SystemState`] and the time into the next power level
//! for the bridge, once per control-loop iteration.
//!
//! # Pacing
//! - Linear, Triangle, Square: wait one frame delay before the next tick
//! - Sine sweep and animation: no wait, sampled as fast as the loop runs
//! - Idle: nothing to drive
//!
//! # Animation
//! A 50 Hz sine over the configured range that ends by itself after 10 s.
//! When it ends the engine switches the state back to Idle and reports
//! [`Tick::AnimationEnded`] so the caller can de-energize the coil.

use crate::system::state::{RunMode, SystemState, Waveform};
use crate::system::waveform::{self, Linear, Square, Triangle, SINE_PERIOD};
use embassy_time::{Duration, Instant};

/// Length of an animation session
pub const ANIMATION_DURATION: Duration = Duration::from_secs(10);
/// Carrier frequency of the animation sine
pub const ANIMATION_FREQUENCY_HZ: u64 = 50;

const ANIMATION_PERIOD: Duration = Duration::from_hz(ANIMATION_FREQUENCY_HZ);

/// Result of one engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Emit `power`, then wait `delay` (if any) before the next tick
    Drive {
        power: i32,
        delay: Option<Duration>,
    },
    /// The animation ran out; the state is Idle again
    AnimationEnded,
}

/// Progress of the waveform currently being swept
#[derive(Debug, Clone, PartialEq, Eq)]
enum Progress {
    Linear(Linear),
    Sine,
    Triangle(Triangle),
    Square(Square),
}

impl Progress {
    fn new(waveform: Waveform, state: &SystemState, now: Instant) -> Self {
        match waveform {
            Waveform::Linear => Progress::Linear(Linear::new(state)),
            Waveform::Sine => Progress::Sine,
            Waveform::Triangle => Progress::Triangle(Triangle::new(state)),
            Waveform::Square => Progress::Square(Square::new(now)),
        }
    }
}

/// A sweep entered at `since` with `waveform`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sweep {
    since: Instant,
    waveform: Waveform,
    progress: Progress,
}

/// Waveform generator and run-mode state machine
#[derive(Debug, Default)]
pub struct DriveEngine {
    sweep: Option<Sweep>,
}

impl DriveEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the next drive value
    ///
    /// Returns `None` while idle. May move the state from Animating to Idle.
    pub fn tick(&mut self, state: &mut SystemState, now: Instant) -> Option<Tick> {
        match state.run_mode() {
            RunMode::Idle => {
                self.sweep = None;
                None
            }
            RunMode::Animating { since } => {
                self.sweep = None;
                let elapsed = now.saturating_duration_since(since);
                if elapsed > ANIMATION_DURATION {
                    state.set_run_mode(RunMode::Idle);
                    return Some(Tick::AnimationEnded);
                }
                let theta = waveform::phase_angle(elapsed, ANIMATION_PERIOD);
                Some(Tick::Drive {
                    power: waveform::sine_power(state, theta),
                    delay: None,
                })
            }
            RunMode::Sweeping { since } => Some(self.sweep(state, since, now)),
        }
    }

    fn sweep(&mut self, state: &SystemState, since: Instant, now: Instant) -> Tick {
        let selected = state.waveform();
        if self
            .sweep
            .as_ref()
            .is_some_and(|sweep| sweep.since != since || sweep.waveform != selected)
        {
            self.sweep = None;
        }
        let sweep = self.sweep.get_or_insert_with(|| Sweep {
            since,
            waveform: selected,
            progress: Progress::new(selected, state, now),
        });

        let frame_delay = Some(state.frame_delay());
        match &mut sweep.progress {
            Progress::Linear(linear) => Tick::Drive {
                power: linear.advance(state),
                delay: frame_delay,
            },
            // TODO: confirm whether the sine sweep should be paced by the frame delay like the others
            Progress::Sine => {
                let elapsed = now.saturating_duration_since(since);
                let theta = waveform::phase_angle(elapsed, SINE_PERIOD);
                Tick::Drive {
                    power: waveform::sine_power(state, theta),
                    delay: None,
                }
            }
            Progress::Triangle(triangle) => Tick::Drive {
                power: triangle.advance(state),
                delay: frame_delay,
            },
            Progress::Square(square) => Tick::Drive {
                power: square.advance(state, now),
                delay: frame_delay,
            },
        }
    }
}
