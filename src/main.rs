//! VCM sweep firmware entry point
//!
//! Initializes the RP2350, prints the key help and spawns the command reader
//! and the drive loop.

#![no_std]
#![no_main]

use crate::task::{command_read::command_read, drive::drive};
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use task::resources::{AssignedResources, BridgeResources, ConsoleResources};
use vcm_sweep::system::command::KEY_HELP;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    info!("--- VCM Sweep + Animation Control ---");
    for line in KEY_HELP {
        info!("{=str}", line);
    }

    // Spawn the reader first so no key typed at boot is lost
    spawner.spawn(command_read(r.console)).unwrap();
    spawner.spawn(drive(r.bridge)).unwrap();
}
