//! H-Bridge Output
//!
//! Converts a signed power level into the two PWM duty cycles of an H-bridge
//! (BTS7960-style, one PWM input per direction).
//!
//! # Channel mapping
//! - power > 0: Negative channel 0, Positive channel `power`
//! - power <= 0: Positive channel 0, Negative channel `-power`
//!
//! The channel being switched off is always written first, so the bridge never
//! sees both inputs active at the same time.

use crate::error::{Error, Result};
use embedded_hal::pwm::{Error as _, SetDutyCycle};

/// Largest duty cycle either channel accepts
pub const MAX_POWER: i32 = 255;

/// One of the two bridge inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Drives current in the positive direction (RPWM)
    Positive,
    /// Drives current in the negative direction (LPWM)
    Negative,
}

/// Clamps a power level to what the bridge accepts
pub fn clamp_power(power: i32) -> i32 {
    power.clamp(-MAX_POWER, MAX_POWER)
}

/// H-bridge driven by two PWM outputs
pub struct HBridge<P, N> {
    positive: P,
    negative: N,
}

impl<P, N> HBridge<P, N>
where
    P: SetDutyCycle,
    N: SetDutyCycle,
{
    /// Wraps the two PWM outputs. Does not touch the outputs.
    pub fn new(positive: P, negative: N) -> Self {
        Self { positive, negative }
    }

    /// Clamps `power` to ±[`MAX_POWER`] and asserts it on the matching channel
    pub fn drive(&mut self, power: i32) -> Result<()> {
        let power = clamp_power(power);
        if power > 0 {
            self.set_channel_power(Channel::Negative, 0)?;
            self.set_channel_power(Channel::Positive, power.unsigned_abs() as u8)
        } else {
            self.set_channel_power(Channel::Positive, 0)?;
            self.set_channel_power(Channel::Negative, power.unsigned_abs() as u8)
        }
    }

    /// De-energizes the coil
    pub fn stop(&mut self) -> Result<()> {
        self.drive(0)
    }

    /// Sets one channel's duty cycle on a 0-255 scale
    pub fn set_channel_power(&mut self, channel: Channel, duty: u8) -> Result<()> {
        let duty = u16::from(duty);
        let denom = MAX_POWER as u16;
        match channel {
            Channel::Positive => self
                .positive
                .set_duty_cycle_fraction(duty, denom)
                .map_err(|e| Error::Pwm { channel, kind: e.kind() }),
            Channel::Negative => self
                .negative
                .set_duty_cycle_fraction(duty, denom)
                .map_err(|e| Error::Pwm { channel, kind: e.kind() }),
        }
    }

    /// Releases the PWM outputs
    pub fn release(self) -> (P, N) {
        (self.positive, self.negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    /// PWM output with a 0-255 duty range that remembers the last write
    #[derive(Default)]
    struct Pwm {
        duty: u16,
    }

    impl ErrorType for Pwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for Pwm {
        fn max_duty_cycle(&self) -> u16 {
            255
        }

        fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    fn bridge() -> HBridge<Pwm, Pwm> {
        HBridge::new(Pwm::default(), Pwm::default())
    }

    fn duties(bridge: HBridge<Pwm, Pwm>) -> (u16, u16) {
        let (positive, negative) = bridge.release();
        (positive.duty, negative.duty)
    }

    #[test]
    fn exactly_one_channel_carries_the_magnitude() {
        for power in -255..=255 {
            let mut b = bridge();
            b.drive(power).unwrap();
            let (positive, negative) = duties(b);
            assert!(positive == 0 || negative == 0, "both channels on at {power}");
            assert_eq!(i32::from(positive.max(negative)), power.abs());
            if power > 0 {
                assert_eq!(i32::from(positive), power);
            } else {
                assert_eq!(i32::from(negative), -power);
            }
        }
    }

    #[test]
    fn out_of_range_power_is_clamped() {
        let mut b = bridge();
        b.drive(300).unwrap();
        assert_eq!(duties(b), (255, 0));

        let mut b = bridge();
        b.drive(-300).unwrap();
        assert_eq!(duties(b), (0, 255));

        let mut b = bridge();
        b.drive(i32::MIN).unwrap();
        assert_eq!(duties(b), (0, 255));
    }

    #[test]
    fn direction_change_clears_the_other_channel() {
        let mut b = bridge();
        b.drive(120).unwrap();
        b.drive(-40).unwrap();
        assert_eq!(duties(b), (0, 40));
    }

    #[test]
    fn stop_zeroes_both_channels() {
        let mut b = bridge();
        b.drive(-200).unwrap();
        b.stop().unwrap();
        assert_eq!(duties(b), (0, 0));
    }

    #[test]
    fn duty_scales_to_the_output_range() {
        struct Wide(u16);
        impl ErrorType for Wide {
            type Error = Infallible;
        }
        impl SetDutyCycle for Wide {
            fn max_duty_cycle(&self) -> u16 {
                1000
            }
            fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
                self.0 = duty;
                Ok(())
            }
        }

        let mut b = HBridge::new(Wide(0), Wide(0));
        b.drive(255).unwrap();
        let (positive, negative) = b.release();
        assert_eq!((positive.0, negative.0), (1000, 0));
    }
}
