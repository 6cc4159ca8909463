//! Legacy advertising data carrying an iBeacon frame.
//!
//! The beacon advertises two AD structures: the flags byte, then Apple
//! manufacturer data holding the frame minus its company id, which the AD
//! structure carries itself.

use trouble_host::prelude::{AdStructure, BR_EDR_NOT_SUPPORTED};

use crate::frame::{IBeacon, APPLE_COMPANY_ID, FRAME_LEN};
use crate::Error;

/// Flags advertised by the beacon. The beacon is not discoverable in the GAP
/// sense, it only broadcasts.
pub const BEACON_FLAGS: u8 = BR_EDR_NOT_SUPPORTED;

/// Largest legacy advertising payload
pub const LEGACY_ADV_DATA_MAX: usize = 31;

/// Size of the encoded beacon advertising data: flags AD + manufacturer AD.
pub const BEACON_ADV_DATA_LEN: usize = 3 + 2 + FRAME_LEN;

/// Encode the flags and manufacturer data AD structures for `beacon` into `out`,
/// returning the number of bytes written.
pub fn encode_adv_data(beacon: &IBeacon, out: &mut [u8]) -> Result<usize, Error> {
    let too_small = Error::BufferTooSmall {
        needed: BEACON_ADV_DATA_LEN,
        available: out.len(),
    };
    let frame = beacon.to_bytes();
    AdStructure::encode_slice(
        &[
            AdStructure::Flags(BEACON_FLAGS),
            AdStructure::ManufacturerSpecificData {
                company_identifier: APPLE_COMPANY_ID,
                payload: &frame[2..],
            },
        ],
        out,
    )
    .map_err(|_| too_small)
}

/// The flags byte, if the payload carries a flags AD structure.
pub fn flags(adv_data: &[u8]) -> Option<u8> {
    AdStructure::decode(adv_data)
        .map_while(Result::ok)
        .find_map(|ad| match ad {
            AdStructure::Flags(flags) => Some(flags),
            _ => None,
        })
}

/// First manufacturer data record that decodes as an iBeacon frame. Parsing
/// stops at the first malformed AD structure.
pub fn find_ibeacon(adv_data: &[u8]) -> Option<IBeacon> {
    AdStructure::decode(adv_data)
        .map_while(Result::ok)
        .find_map(|ad| match ad {
            AdStructure::ManufacturerSpecificData {
                company_identifier,
                payload,
            } => IBeacon::from_manufacturer_data(company_identifier, payload).ok(),
            _ => None,
        })
}
