#![no_std]
use embassy_executor::task;
use microbit_bsp::ble::{MultiprotocolServiceLayer, SoftdeviceController};
use trouble_host::prelude::*;

pub mod advertiser;
pub mod blink;

/// GAP name of the beacon, offered in the scan response
pub const DEVICE_NAME: &str = "micro:bit iBeacon";

/// Static random address of the beacon
pub const DEVICE_ADDRESS: [u8; 6] = [0xff, 0x8f, 0x1a, 0x05, 0xe4, 0xff];

/// Advertising interval, the usual iBeacon cadence
pub const ADV_INTERVAL_MS: u64 = 100;

/// Size of L2CAP packets. Nothing connects to the beacon, so the LE minimum.
const L2CAP_MTU: usize = 27;

/// Max number of connections
const CONNECTIONS_MAX: usize = 1;

/// Max number of L2CAP channels.
const L2CAP_CHANNELS_MAX: usize = 1; // Signal

pub type SdcResources<'d> =
    HostResources<SoftdeviceController<'static>, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX, L2CAP_MTU>;

pub type SdcPeripheral<'d> = Peripheral<'d, SoftdeviceController<'static>>;

#[task]
pub async fn mpsl_task(mpsl: &'static MultiprotocolServiceLayer<'static>) -> ! {
    mpsl.run().await;
}

#[task]
pub async fn ble_task(mut runner: Runner<'static, SoftdeviceController<'static>>) {
    runner.run().await.expect("Error in BLE task");
}
