//! Crate error type
//!
//! Command handling and waveform generation cannot fail. The only fallible
//! step is writing a duty cycle to a PWM output, which the embedded-hal
//! contract allows to error.

use crate::system::bridge::Channel;
use embedded_hal::pwm::ErrorKind;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the drive path
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A PWM output rejected a duty cycle write
    #[display("PWM write on {channel} channel failed: {kind}")]
    Pwm {
        /// Bridge input that failed
        channel: Channel,
        /// Error class reported by the output
        #[error(not(source))]
        kind: ErrorKind,
    },
}
