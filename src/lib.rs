//! Voice-coil motor sweep controller
//!
//! Drives a VCM through an H-bridge from two PWM channels, generating linear,
//! sine, triangle and square sweeps plus a fixed 50 Hz animation under
//! single-key operator control.
//!
//! The library holds everything that does not touch hardware, so it builds and
//! tests on the host. The RP2350 firmware in `src/main.rs` (feature
//! `firmware`) wires it to a UART and a PWM slice.
//!
//! # Control loop
//! 1. Drain pending input through [`Controller::handle`]
//! 2. Call [`Controller::tick`] once
//! 3. Wait for the returned frame delay, or yield when there is none

#![cfg_attr(not(test), no_std)]

mod error;
pub mod system;

pub use crate::error::{Error, Result};
pub use crate::system::controller::Controller;
