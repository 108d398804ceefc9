//! Drive Task Module
//!
//! Runs the control loop that drives the voice-coil motor through the
//! H-bridge:
//! 1. Drain the keys queued by the command reader
//! 2. Tick the controller once, which writes the new power to the bridge
//! 3. Sleep for the frame delay, or just yield for the time-sliced waveforms
//!
//! While idle the loop parks on the command queue instead of spinning.

use crate::task::command_read;
use crate::task::resources::BridgeResources;
use defmt::{info, unwrap, warn};
use embassy_futures::yield_now;
use embassy_rp::gpio;
use embassy_rp::pwm::{self, PwmOutput};
use embassy_time::{Instant, Timer};
use vcm_sweep::system::bridge::HBridge;
use vcm_sweep::system::engine::Tick;
use vcm_sweep::Controller;

/// PWM carrier frequency, above the audible range
const PWM_FREQUENCY_HZ: u32 = 20_000;

type BridgeController = Controller<PwmOutput<'static>, PwmOutput<'static>>;

#[embassy_executor::task]
pub async fn drive(r: BridgeResources) {
    // Configure PWM for the bridge inputs
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

    // Calculate minimum divider needed to keep period under 16-bit limit (65535)
    let divider = ((clock_freq_hz / PWM_FREQUENCY_HZ) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (PWM_FREQUENCY_HZ * divider as u32)) as u16 - 1;

    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = divider.into();
    pwm_config.top = period;

    // Both enable lines stay high for the lifetime of the task
    let _right_enable = gpio::Output::new(r.right_enable_pin, gpio::Level::High);
    let _left_enable = gpio::Output::new(r.left_enable_pin, gpio::Level::High);

    let pwm = pwm::Pwm::new_output_ab(r.slice, r.positive_pin, r.negative_pin, pwm_config);
    let (positive, negative) = pwm.split();
    let bridge = HBridge::new(unwrap!(positive), unwrap!(negative));
    let mut controller = unwrap!(Controller::new(bridge));
    info!("bridge ready, PWM {} Hz, top {}", PWM_FREQUENCY_HZ, period);

    loop {
        if controller.is_idle() {
            let key = command_read::next().await;
            handle_key(&mut controller, key);
        }
        while let Some(key) = command_read::try_next() {
            handle_key(&mut controller, key);
        }

        match controller.tick(Instant::now()) {
            Ok(Some(Tick::Drive {
                delay: Some(delay), ..
            })) => Timer::after(delay).await,
            Ok(Some(Tick::Drive { delay: None, .. })) => yield_now().await,
            Ok(Some(Tick::AnimationEnded)) => info!("Animation ended."),
            Ok(None) => {}
            Err(e) => {
                warn!("{}", e);
                yield_now().await;
            }
        }
    }
}

/// Applies one key and logs the acknowledgement
fn handle_key(controller: &mut BridgeController, key: char) {
    match controller.handle(key, Instant::now()) {
        Ok(Some(ack)) => info!("{}", ack),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }
}
