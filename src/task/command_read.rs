//! Command Reader Task
//!
//! Reads operator keys from the UART console and queues them for the drive
//! loop. The drive loop drains the queue once per iteration, so keys typed
//! during a frame delay are buffered and applied on the next iteration.

use crate::task::resources::{ConsoleResources, Irqs};
use defmt::{debug, warn};
use embassy_rp::uart::{BufferedUartRx, Config};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embedded_io_async::Read;

/// Console baud rate
const BAUD_RATE: u32 = 115_200;

/// Maximum number of keys waiting for the drive loop
const COMMAND_QUEUE_SIZE: usize = 32;

/// Keys received but not yet handled
static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, u8, COMMAND_QUEUE_SIZE> = Channel::new();

/// Queues a received key
async fn send(key: u8) {
    COMMAND_CHANNEL.sender().send(key).await;
}

/// Takes the next pending key, if any
pub fn try_next() -> Option<char> {
    COMMAND_CHANNEL.try_receive().ok().map(char::from)
}

/// Waits for the next key
pub async fn next() -> char {
    char::from(COMMAND_CHANNEL.receive().await)
}

#[embassy_executor::task]
pub async fn command_read(r: ConsoleResources) {
    let mut config = Config::default();
    config.baudrate = BAUD_RATE;

    let mut rx_buffer = [0u8; 64];
    let mut rx = BufferedUartRx::new(r.uart, Irqs, r.rx_pin, &mut rx_buffer, config);

    let mut buf = [0u8; 16];
    loop {
        match rx.read(&mut buf).await {
            Ok(count) => {
                for key in &buf[..count] {
                    debug!("key {}", key);
                    send(*key).await;
                }
            }
            Err(e) => warn!("console read failed: {}", e),
        }
    }
}
