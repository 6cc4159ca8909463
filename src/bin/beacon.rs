//! Beacon build: iBeacon advertising started once, then the heartbeat LED.
#![no_std]
#![no_main]
use defmt::{debug, info, warn};
use embassy_executor::Spawner;
use microbit_bsp::Microbit;
use static_cell::StaticCell;
use trouble_host::prelude::*;
use {defmt_rtt as _, panic_probe as _};

use microbit_ibeacon::{
    advertiser::{self, AdvertiserBuilder, AdvertisingHandle},
    ble_task,
    blink::{self, MatrixLed},
    mpsl_task, SdcPeripheral, SdcResources, DEVICE_ADDRESS, DEVICE_NAME,
};

async fn start_beacon(
    peripheral: SdcPeripheral<'static>,
) -> Result<AdvertisingHandle<'static>, advertiser::Error> {
    let mut advertiser = AdvertiserBuilder::new(DEVICE_NAME, peripheral).build()?;
    advertiser.start().await
}

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // First we initialize our board.
    let board = Microbit::new(Default::default());
    info!("Hello from setup");
    let led = MatrixLed::new(board.display);

    let (sdc, mpsl) = board
        .ble
        .init(board.timer0, board.rng)
        .expect("Failed to initialize BLE.");
    spawner.must_spawn(mpsl_task(mpsl));

    let address: Address = Address::random(DEVICE_ADDRESS);
    debug!("Our address = {:?}", address);

    let resources = {
        static RESOURCES: StaticCell<SdcResources<'_>> = StaticCell::new();
        RESOURCES.init(SdcResources::new(PacketQos::None))
    };
    let (_, peripheral, _, runner) = trouble_host::new(sdc, resources)
        .set_random_address(address)
        .build();
    spawner.must_spawn(ble_task(runner));

    // Held until power-off; dropping it would stop the broadcast.
    let _advertising = match start_beacon(peripheral).await {
        Ok(handle) => {
            info!("iBeacon advertising started...");
            Some(handle)
        }
        Err(e) => {
            warn!("iBeacon advertising failed: {}", e);
            None
        }
    };

    blink::run(led).await
}
