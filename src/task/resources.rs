//! Hardware Resource Management
//!
//! Assigns the RP2350 pins and peripherals to the two firmware tasks.
//!
//! # Resource Groups
//! - Console: UART0 receive line for operator commands
//! - Bridge: one PWM slice driving both H-bridge inputs, plus the two enable
//!   lines
//!
//! GPIO18/GPIO19 are the A/B outputs of PWM slice 1, so one slice drives both
//! bridge inputs at the same carrier frequency.

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, UART0};
use embassy_rp::uart::BufferedInterruptHandler;

assign_resources! {
    /// Operator console (115200 baud, 8N1)
    console: ConsoleResources {
        uart: UART0,
        rx_pin: PIN_1,
    },
    /// H-bridge (BTS7960-style) PWM inputs and enable lines
    bridge: BridgeResources {
        slice: PWM_SLICE1,
        // RPWM, positive direction
        positive_pin: PIN_18,
        // LPWM, negative direction
        negative_pin: PIN_19,
        right_enable_pin: PIN_23,
        left_enable_pin: PIN_22,
    },
}

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});
