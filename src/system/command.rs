//! Command Interpreter
//!
//! Maps single-character operator commands onto [`SystemState`] changes and
//! reports what happened as an [`Ack`] for the status log.
//!
//! | key | effect                                   |
//! |-----|------------------------------------------|
//! | `s` | start sweeping                           |
//! | `x` | stop (the caller de-energizes the coil)  |
//! | `r` | toggle linear ramp direction             |
//! | `u` | widen the range by one on each side      |
//! | `d` | narrow the range by one on each side     |
//! | `[` | shift the range down by one              |
//! | `]` | shift the range up by one                |
//! | `+` | shorter frame delay (faster)             |
//! | `-` | longer frame delay (slower)              |
//! | `m` | next waveform                            |
//! | `a` | start a 10 s animation                   |
//!
//! Anything else is ignored.

use crate::system::state::{RunMode, SystemState, Waveform};
use embassy_time::Instant;

/// Key help printed at startup
pub const KEY_HELP: [&str; 2] = [
    "Keys: s=start, x=stop, r=reverse, m=waveform, a=animate",
    "      u/d=sweep size, [/]=shift, +/-=speed",
];

/// Operator commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Start,
    Stop,
    Reverse,
    Widen,
    Narrow,
    ShiftDown,
    ShiftUp,
    Faster,
    Slower,
    NextWaveform,
    Animate,
}

impl Command {
    /// Parses a command key; `None` for anything unrecognized
    pub fn from_char(key: char) -> Option<Command> {
        let command = match key {
            's' => Command::Start,
            'x' => Command::Stop,
            'r' => Command::Reverse,
            'u' => Command::Widen,
            'd' => Command::Narrow,
            '[' => Command::ShiftDown,
            ']' => Command::ShiftUp,
            '+' => Command::Faster,
            '-' => Command::Slower,
            'm' => Command::NextWaveform,
            'a' => Command::Animate,
            _ => return None,
        };
        Some(command)
    }
}

/// Status acknowledgement for a handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Ack {
    #[display("Sweep started.")]
    SweepStarted,
    #[display("Sweep stopped.")]
    SweepStopped,
    #[display("Direction: {}", if *reversed { "REVERSED" } else { "NORMAL" })]
    Direction { reversed: bool },
    #[display("Sweep range: [{min}, {max}]")]
    Range { min: i32, max: i32 },
    #[display("Sweep shifted left: [{min}, {max}]")]
    ShiftedLeft { min: i32, max: i32 },
    #[display("Sweep shifted right: [{min}, {max}]")]
    ShiftedRight { min: i32, max: i32 },
    #[display("Sweep speed increased. Delay: {delay_ms}ms")]
    SpeedIncreased { delay_ms: u64 },
    #[display("Sweep speed decreased. Delay: {delay_ms}ms")]
    SpeedDecreased { delay_ms: u64 },
    #[display("Waveform mode: {_0}")]
    Waveform(Waveform),
    #[display("Animation started.")]
    AnimationStarted,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Ack {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Ack::SweepStarted => defmt::write!(f, "Sweep started."),
            Ack::SweepStopped => defmt::write!(f, "Sweep stopped."),
            Ack::Direction { reversed: true } => defmt::write!(f, "Direction: REVERSED"),
            Ack::Direction { reversed: false } => defmt::write!(f, "Direction: NORMAL"),
            Ack::Range { min, max } => defmt::write!(f, "Sweep range: [{}, {}]", min, max),
            Ack::ShiftedLeft { min, max } => {
                defmt::write!(f, "Sweep shifted left: [{}, {}]", min, max)
            }
            Ack::ShiftedRight { min, max } => {
                defmt::write!(f, "Sweep shifted right: [{}, {}]", min, max)
            }
            Ack::SpeedIncreased { delay_ms } => {
                defmt::write!(f, "Sweep speed increased. Delay: {}ms", delay_ms)
            }
            Ack::SpeedDecreased { delay_ms } => {
                defmt::write!(f, "Sweep speed decreased. Delay: {}ms", delay_ms)
            }
            Ack::Waveform(waveform) => defmt::write!(f, "Waveform mode: {}", waveform),
            Ack::AnimationStarted => defmt::write!(f, "Animation started."),
        }
    }
}

/// Parses and applies one input character
///
/// Returns `None` for unrecognized input, which leaves the state untouched.
pub fn handle(state: &mut SystemState, key: char, now: Instant) -> Option<Ack> {
    Command::from_char(key).map(|command| apply(state, command, now))
}

/// Applies a command to the state
///
/// `now` stamps mode entry, which anchors the time-based waveforms and the
/// animation session. Stopping only changes the run mode here; zeroing the
/// bridge is the caller's job.
pub fn apply(state: &mut SystemState, command: Command, now: Instant) -> Ack {
    match command {
        Command::Start => {
            state.set_run_mode(RunMode::Sweeping { since: now });
            Ack::SweepStarted
        }
        Command::Stop => {
            state.set_run_mode(RunMode::Idle);
            Ack::SweepStopped
        }
        Command::Reverse => Ack::Direction {
            reversed: state.toggle_reverse(),
        },
        Command::Widen => {
            state.widen();
            range(state)
        }
        Command::Narrow => {
            state.narrow();
            range(state)
        }
        Command::ShiftDown => {
            state.shift(-1);
            Ack::ShiftedLeft {
                min: state.sweep_min(),
                max: state.sweep_max(),
            }
        }
        Command::ShiftUp => {
            state.shift(1);
            Ack::ShiftedRight {
                min: state.sweep_min(),
                max: state.sweep_max(),
            }
        }
        Command::Faster => {
            state.speed_up();
            Ack::SpeedIncreased {
                delay_ms: state.frame_delay().as_millis(),
            }
        }
        Command::Slower => {
            state.slow_down();
            Ack::SpeedDecreased {
                delay_ms: state.frame_delay().as_millis(),
            }
        }
        Command::NextWaveform => {
            let waveform = state.cycle_waveform();
            // a running sweep restarts so the new waveform begins from its initial state
            if let RunMode::Sweeping { .. } = state.run_mode() {
                state.set_run_mode(RunMode::Sweeping { since: now });
            }
            Ack::Waveform(waveform)
        }
        Command::Animate => {
            state.set_run_mode(RunMode::Animating { since: now });
            Ack::AnimationStarted
        }
    }
}

fn range(state: &SystemState) -> Ack {
    Ack::Range {
        min: state.sweep_min(),
        max: state.sweep_max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::state::{MAX_SPAN, MIN_SPAN};
    use embassy_time::Duration;
    use std::string::ToString;

    fn feed(state: &mut SystemState, keys: &str, now: Instant) {
        for key in keys.chars() {
            handle(state, key, now);
        }
    }

    #[test]
    fn unrecognized_keys_change_nothing() {
        let mut state = SystemState::default();
        let now = Instant::from_millis(5);
        for key in ['q', 'S', '\n', '\r', ' ', '0', '?'] {
            assert_eq!(handle(&mut state, key, now), None);
        }
        assert_eq!(state, SystemState::default());
    }

    #[test]
    fn start_and_animate_are_exclusive() {
        let mut state = SystemState::default();
        let t0 = Instant::from_millis(100);
        let t1 = Instant::from_millis(200);

        assert_eq!(handle(&mut state, 's', t0), Some(Ack::SweepStarted));
        assert_eq!(state.run_mode(), RunMode::Sweeping { since: t0 });

        assert_eq!(handle(&mut state, 'a', t1), Some(Ack::AnimationStarted));
        assert_eq!(state.run_mode(), RunMode::Animating { since: t1 });

        assert_eq!(handle(&mut state, 'x', t1), Some(Ack::SweepStopped));
        assert_eq!(state.run_mode(), RunMode::Idle);
    }

    #[test]
    fn repeated_widen_and_narrow_respect_span_limits() {
        let mut state = SystemState::default();
        let now = Instant::from_millis(0);
        feed(&mut state, &"u".repeat(150), now);
        assert_eq!(state.span(), MAX_SPAN);
        assert_eq!(
            handle(&mut state, 'u', now),
            Some(Ack::Range { min: -100, max: 100 })
        );

        feed(&mut state, &"d".repeat(150), now);
        assert_eq!(state.span(), MIN_SPAN);
    }

    #[test]
    fn repeated_speed_changes_stay_inside_bounds() {
        let mut state = SystemState::default();
        let now = Instant::from_millis(0);
        feed(&mut state, &"+".repeat(50), now);
        assert_eq!(
            handle(&mut state, '+', now),
            Some(Ack::SpeedIncreased { delay_ms: 10 })
        );

        feed(&mut state, &"-".repeat(50), now);
        assert_eq!(state.frame_delay(), Duration::from_millis(195));
    }

    #[test]
    fn m_cycles_four_waveforms() {
        let mut state = SystemState::default();
        let now = Instant::from_millis(0);
        let acks: [Option<Ack>; 4] = core::array::from_fn(|_| handle(&mut state, 'm', now));
        assert_eq!(
            acks,
            [
                Some(Ack::Waveform(Waveform::Sine)),
                Some(Ack::Waveform(Waveform::Triangle)),
                Some(Ack::Waveform(Waveform::Square)),
                Some(Ack::Waveform(Waveform::Linear)),
            ]
        );
    }

    #[test]
    fn waveform_change_restarts_a_running_sweep() {
        let mut state = SystemState::default();
        handle(&mut state, 's', Instant::from_millis(10));
        handle(&mut state, 'm', Instant::from_millis(90));
        assert_eq!(
            state.run_mode(),
            RunMode::Sweeping {
                since: Instant::from_millis(90)
            }
        );
    }

    #[test]
    fn waveform_change_while_idle_stays_idle() {
        let mut state = SystemState::default();
        handle(&mut state, 'm', Instant::from_millis(90));
        assert_eq!(state.run_mode(), RunMode::Idle);
    }

    #[test]
    fn acks_render_status_lines() {
        let mut state = SystemState::default();
        let now = Instant::from_millis(0);
        let line = |ack: Option<Ack>| ack.map(|ack| ack.to_string());

        assert_eq!(
            line(handle(&mut state, 'r', now)).as_deref(),
            Some("Direction: REVERSED")
        );
        assert_eq!(
            line(handle(&mut state, 'r', now)).as_deref(),
            Some("Direction: NORMAL")
        );
        assert_eq!(
            line(handle(&mut state, 'u', now)).as_deref(),
            Some("Sweep range: [-21, 21]")
        );
        assert_eq!(
            line(handle(&mut state, '[', now)).as_deref(),
            Some("Sweep shifted left: [-22, 20]")
        );
        assert_eq!(
            line(handle(&mut state, ']', now)).as_deref(),
            Some("Sweep shifted right: [-21, 21]")
        );
        assert_eq!(
            line(handle(&mut state, '-', now)).as_deref(),
            Some("Sweep speed decreased. Delay: 45ms")
        );
        assert_eq!(
            line(handle(&mut state, 'm', now)).as_deref(),
            Some("Waveform mode: SINE")
        );
    }
}
