//! Blink-only build: the heartbeat LED and its log lines, no radio.
#![no_std]
#![no_main]
use defmt::info;
use embassy_executor::Spawner;
use microbit_bsp::Microbit;
use microbit_ibeacon::blink::{self, MatrixLed};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let board = Microbit::new(Default::default());
    info!("Hello from setup");

    blink::run(MatrixLed::new(board.display)).await
}
