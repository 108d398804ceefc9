//! Controller
//!
//! Owns the state, the drive engine and the bridge, and wires them together
//! the way the control loop uses them: feed it input characters, then tick it
//! once per iteration.
//!
//! Every path that leaves an active mode (the `x` command and the end of an
//! animation) goes through [`HBridge::stop`], so the coil is always
//! de-energized on exit.

use crate::error::Result;
use crate::system::bridge::HBridge;
use crate::system::command::{self, Ack, Command};
use crate::system::engine::{DriveEngine, Tick};
use crate::system::state::SystemState;
use embassy_time::Instant;
use embedded_hal::pwm::SetDutyCycle;

/// Sweep controller bound to one H-bridge
pub struct Controller<P, N> {
    state: SystemState,
    engine: DriveEngine,
    bridge: HBridge<P, N>,
}

impl<P, N> Controller<P, N>
where
    P: SetDutyCycle,
    N: SetDutyCycle,
{
    /// Creates an idle controller with default settings and zeroes the bridge
    pub fn new(bridge: HBridge<P, N>) -> Result<Self> {
        let mut controller = Self {
            state: SystemState::default(),
            engine: DriveEngine::new(),
            bridge,
        };
        controller.bridge.stop()?;
        Ok(controller)
    }

    /// Live settings
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// True when neither sweeping nor animating
    pub fn is_idle(&self) -> bool {
        !self.state.run_mode().is_active()
    }

    /// Handles one input character
    ///
    /// Returns the acknowledgement for recognized commands.
    pub fn handle(&mut self, key: char, now: Instant) -> Result<Option<Ack>> {
        let Some(command) = Command::from_char(key) else {
            return Ok(None);
        };
        let ack = command::apply(&mut self.state, command, now);
        if command == Command::Stop {
            self.bridge.stop()?;
        }
        Ok(Some(ack))
    }

    /// Runs the drive engine once and applies its output to the bridge
    ///
    /// Returns what the engine decided so the caller can pace the loop and log
    /// the end of an animation. `None` while idle, in which case the bridge is
    /// left alone.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Tick>> {
        let tick = self.engine.tick(&mut self.state, now);
        match tick {
            Some(Tick::Drive { power, .. }) => self.bridge.drive(power)?,
            Some(Tick::AnimationEnded) => self.bridge.stop()?,
            None => {}
        }
        Ok(tick)
    }
}
