//! Receiver-side helpers: matching a beacon region and a coarse proximity
//! estimate from RSSI, the way phones range this beacon.

use crate::frame::{IBeacon, ProximityUuid};

/// RSSI above the calibrated 1m power by this much is within ~0.5m
const IMMEDIATE_MARGIN_DB: i16 = 6;

/// RSSI below the calibrated 1m power by less than this is within ~4m
const NEAR_MARGIN_DB: i16 = 12;

/// A set of beacons sharing a UUID, optionally narrowed by major and minor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconRegion {
    pub uuid: ProximityUuid,
    pub major: Option<u16>,
    pub minor: Option<u16>,
}

impl BeaconRegion {
    /// Region containing every beacon with `uuid`
    pub const fn new(uuid: ProximityUuid) -> Self {
        Self {
            uuid,
            major: None,
            minor: None,
        }
    }

    /// Region containing exactly `beacon`
    pub const fn of(beacon: &IBeacon) -> Self {
        Self {
            uuid: beacon.uuid,
            major: Some(beacon.major),
            minor: Some(beacon.minor),
        }
    }

    pub fn matches(&self, beacon: &IBeacon) -> bool {
        self.uuid == beacon.uuid
            && self.major.map_or(true, |m| m == beacon.major)
            && self.minor.map_or(true, |m| m == beacon.minor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Proximity {
    Immediate,
    Near,
    Far,
    Unknown,
}

impl Proximity {
    /// Classify a received signal against the beacon's calibrated TX power,
    /// assuming free-space path loss. An RSSI of 0 means no measurement.
    pub fn classify(rssi: i8, tx_power: i8) -> Self {
        if rssi == 0 {
            return Proximity::Unknown;
        }
        let (rssi, tx_power) = (i16::from(rssi), i16::from(tx_power));
        if rssi > tx_power + IMMEDIATE_MARGIN_DB {
            Proximity::Immediate
        } else if rssi > tx_power - NEAR_MARGIN_DB {
            Proximity::Near
        } else {
            Proximity::Far
        }
    }
}
