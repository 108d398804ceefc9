//! System State
//!
//! Holds the live sweep configuration that the command interpreter mutates and
//! the drive engine reads:
//! - Sweep range (`sweep_min`..=`sweep_max`)
//! - Frame delay used to pace the stepped waveforms
//! - Direction flag for the linear ramp
//! - Selected waveform
//! - Run mode (Idle / Sweeping / Animating)
//!
//! There is exactly one instance, owned by the control loop and passed by
//! reference to the interpreter and the engine. Nothing else touches it, so it
//! needs no mutex.

use embassy_time::{Duration, Instant};

/// Default lower sweep bound
pub const DEFAULT_SWEEP_MIN: i32 = -20;
/// Default upper sweep bound
pub const DEFAULT_SWEEP_MAX: i32 = 20;
/// Default frame delay for the stepped waveforms
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(40);

/// Smallest sweep span the interpreter will narrow to
pub const MIN_SPAN: i32 = 4;
/// Largest sweep span the interpreter will widen to
pub const MAX_SPAN: i32 = 200;

/// Frame delay change per `+`/`-` press
pub const FRAME_DELAY_STEP: Duration = Duration::from_millis(5);
/// Exclusive lower bound for the frame delay
pub const MIN_FRAME_DELAY: Duration = Duration::from_millis(5);
/// Exclusive upper bound for the frame delay
pub const MAX_FRAME_DELAY: Duration = Duration::from_millis(200);

/// Waveform shapes available in sweep mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Stepped ramp that wraps around at the bounds
    #[display("LINEAR")]
    Linear,
    /// Sine with a fixed 10 s period
    #[display("SINE")]
    Sine,
    /// Stepped ramp that bounces between the bounds
    #[display("TRIANGLE")]
    Triangle,
    /// Alternates between the two bounds
    #[display("SQUARE")]
    Square,
}

impl Waveform {
    /// All waveforms in the order `m` cycles through them
    pub const ALL: [Waveform; 4] = [
        Waveform::Linear,
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
    ];

    /// Returns the waveform that follows this one, wrapping after the last
    pub fn next(self) -> Waveform {
        let index = Self::ALL
            .iter()
            .position(|waveform| *waveform == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Run modes of the controller
///
/// Exactly one is active. The active modes remember the instant they were
/// entered, which anchors the time-based waveforms and the animation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// Nothing is driven
    Idle,
    /// Sweeping the configured range with the selected waveform
    Sweeping {
        /// When the sweep (or its current waveform) was entered
        since: Instant,
    },
    /// Fixed-length 50 Hz sine animation
    Animating {
        /// When the animation session started
        since: Instant,
    },
}

impl RunMode {
    /// True when the motor is being driven
    pub fn is_active(&self) -> bool {
        !matches!(self, RunMode::Idle)
    }
}

/// Live controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemState {
    sweep_min: i32,
    sweep_max: i32,
    frame_delay: Duration,
    reverse: bool,
    waveform: Waveform,
    run_mode: RunMode,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            sweep_min: DEFAULT_SWEEP_MIN,
            sweep_max: DEFAULT_SWEEP_MAX,
            frame_delay: DEFAULT_FRAME_DELAY,
            reverse: false,
            waveform: Waveform::Linear,
            run_mode: RunMode::Idle,
        }
    }
}

impl SystemState {
    /// Lower sweep bound
    pub fn sweep_min(&self) -> i32 {
        self.sweep_min
    }

    /// Upper sweep bound
    pub fn sweep_max(&self) -> i32 {
        self.sweep_max
    }

    /// Distance between the two bounds
    pub fn span(&self) -> i32 {
        self.sweep_max - self.sweep_min
    }

    /// Midpoint of the range, truncated toward zero
    pub fn center(&self) -> i32 {
        (self.sweep_min + self.sweep_max) / 2
    }

    /// Half the span, truncated toward zero
    pub fn amplitude(&self) -> i32 {
        self.span() / 2
    }

    /// Delay between frames of the stepped waveforms
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Whether the linear ramp runs downward
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Selected sweep waveform
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Current run mode
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// Switches run mode; active modes are exclusive, so this replaces any
    /// running sweep or animation
    pub fn set_run_mode(&mut self, run_mode: RunMode) {
        self.run_mode = run_mode;
    }

    /// Flips the linear ramp direction and returns the new value
    pub fn toggle_reverse(&mut self) -> bool {
        self.reverse = !self.reverse;
        self.reverse
    }

    /// Widens the range by one on each side unless the span is already at
    /// [`MAX_SPAN`]
    pub fn widen(&mut self) {
        if self.span() < MAX_SPAN {
            self.sweep_min -= 1;
            self.sweep_max += 1;
        }
    }

    /// Narrows the range by one on each side unless the span is already at
    /// [`MIN_SPAN`]
    pub fn narrow(&mut self) {
        if self.span() > MIN_SPAN {
            self.sweep_min += 1;
            self.sweep_max -= 1;
        }
    }

    /// Moves both bounds by `offset`. Shifting is unbounded.
    pub fn shift(&mut self, offset: i32) {
        self.sweep_min += offset;
        self.sweep_max += offset;
    }

    /// Shortens the frame delay by one step while it stays above
    /// [`MIN_FRAME_DELAY`]
    pub fn speed_up(&mut self) {
        if let Some(delay) = self.frame_delay.checked_sub(FRAME_DELAY_STEP) {
            if delay > MIN_FRAME_DELAY {
                self.frame_delay = delay;
            }
        }
    }

    /// Lengthens the frame delay by one step while it stays below
    /// [`MAX_FRAME_DELAY`]
    pub fn slow_down(&mut self) {
        let delay = self.frame_delay + FRAME_DELAY_STEP;
        if delay < MAX_FRAME_DELAY {
            self.frame_delay = delay;
        }
    }

    /// Advances to the next waveform and returns it
    pub fn cycle_waveform(&mut self) -> Waveform {
        self.waveform = self.waveform.next();
        self.waveform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let state = SystemState::default();
        assert_eq!(state.sweep_min(), -20);
        assert_eq!(state.sweep_max(), 20);
        assert_eq!(state.frame_delay(), Duration::from_millis(40));
        assert!(!state.reverse());
        assert_eq!(state.waveform(), Waveform::Linear);
        assert_eq!(state.run_mode(), RunMode::Idle);
    }

    #[test]
    fn widen_stops_at_max_span() {
        let mut state = SystemState::default();
        for _ in 0..500 {
            state.widen();
            assert!(state.span() <= MAX_SPAN);
        }
        assert_eq!(state.span(), MAX_SPAN);
        assert_eq!(state.center(), 0);
    }

    #[test]
    fn narrow_stops_at_min_span() {
        let mut state = SystemState::default();
        for _ in 0..500 {
            state.narrow();
            assert!(state.span() >= MIN_SPAN);
        }
        assert_eq!(state.span(), MIN_SPAN);
        assert_eq!((state.sweep_min(), state.sweep_max()), (-2, 2));
    }

    #[test]
    fn shift_is_unclamped() {
        let mut state = SystemState::default();
        for _ in 0..300 {
            state.shift(-1);
        }
        assert_eq!((state.sweep_min(), state.sweep_max()), (-320, -280));
        assert_eq!(state.span(), 40);
    }

    #[test]
    fn frame_delay_never_reaches_its_bounds() {
        let mut state = SystemState::default();
        for _ in 0..100 {
            state.speed_up();
            assert!(state.frame_delay() > MIN_FRAME_DELAY);
        }
        assert_eq!(state.frame_delay(), Duration::from_millis(10));

        for _ in 0..100 {
            state.slow_down();
            assert!(state.frame_delay() < MAX_FRAME_DELAY);
        }
        assert_eq!(state.frame_delay(), Duration::from_millis(195));
    }

    #[test]
    fn waveform_cycle_returns_to_start_after_four() {
        let mut state = SystemState::default();
        let seen: [Waveform; 4] = core::array::from_fn(|_| state.cycle_waveform());
        assert_eq!(
            seen,
            [
                Waveform::Sine,
                Waveform::Triangle,
                Waveform::Square,
                Waveform::Linear
            ]
        );
    }

    #[test]
    fn center_and_amplitude_truncate_toward_zero() {
        let mut state = SystemState::default();
        state.shift(1);
        state.narrow();
        // [-18, 20]
        assert_eq!(state.center(), 1);
        assert_eq!(state.amplitude(), 19);
    }
}
