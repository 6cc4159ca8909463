//! Heartbeat blink: one LED on for a second, off for a second, forever.
//!
//! The order of work within an iteration comes from [`Heartbeat`]. On the
//! micro:bit the LED is the center pixel of the 5x5 matrix.

use defmt::{debug, info};
use embassy_time::{Duration, Timer};
use ibeacon::heartbeat::{Beat, Heartbeat, Level, Step};
use microbit_bsp::display::fonts;
use microbit_bsp::LedMatrix;

/// Matrix rows with only the center pixel set
const PIXEL: [u8; 5] = [0, 0, 0b00100, 0, 0];

/// One LED of the matrix. The matrix is multiplexed, so keeping the pixel lit
/// means rendering it for the whole hold time.
pub struct MatrixLed {
    display: LedMatrix,
}

impl MatrixLed {
    pub fn new(mut display: LedMatrix) -> Self {
        display.clear();
        Self { display }
    }

    /// Drive the pixel to the step's level and keep it there.
    pub async fn hold(&mut self, step: Step) {
        let hold = Duration::from_millis(step.hold_ms);
        match step.level {
            Level::High => self.display.display(fonts::frame_5x5(&PIXEL), hold).await,
            Level::Low => {
                self.display.clear();
                Timer::after(hold).await;
            }
        }
    }
}

/// Blink `led` forever, logging once per iteration before it goes high.
pub async fn run(mut led: MatrixLed) -> ! {
    let mut heartbeat = Heartbeat::new();
    loop {
        match heartbeat.beat() {
            Beat::Announce => {
                info!("Hello from loop");
                debug!("heartbeat iteration {}", heartbeat.iteration());
            }
            Beat::Hold(step) => led.hold(step).await,
        }
    }
}
