//! iBeacon frame model and the fixed heartbeat schedule shared by the micro:bit
//! beacon firmware.
//!
//! Everything in here is plain data and byte layout, so the crate builds for the
//! host as well as for the target and carries the tests for the firmware. The
//! `trouble` feature adds the advertising data encoding used on air.
#![cfg_attr(not(test), no_std)]

#[cfg(feature = "trouble")]
pub mod ad;
pub mod error;
pub mod frame;
pub mod heartbeat;
pub mod proximity;

pub use error::Error;
pub use frame::{IBeacon, ProximityUuid, PAYMENT_BEACON};
