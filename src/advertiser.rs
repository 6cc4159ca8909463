use crate::{SdcPeripheral, ADV_INTERVAL_MS};
use defmt::debug;
use derive_more::From;
use embassy_time::Duration;
use ibeacon::ad::{encode_adv_data, LEGACY_ADV_DATA_MAX};
use ibeacon::PAYMENT_BEACON;
use microbit_bsp::ble::{SoftdeviceController, SoftdeviceError};
use trouble_host::prelude::*;

/// Longest name that fits the scan response next to its AD header
const NAME_MAX: usize = LEGACY_ADV_DATA_MAX - 2;

/// Running advertising set. Advertising stops when it is dropped.
pub type AdvertisingHandle<'d> =
    trouble_host::peripheral::Advertiser<'d, SoftdeviceController<'static>>;

#[derive(Debug, From)]
pub enum Error {
    /// The beacon frame did not fit the advertising data
    Frame(ibeacon::Error),
    /// Encoding the scan response failed
    Encode(trouble_host::Error),
    /// The host or controller refused to advertise
    Host(BleHostError<SoftdeviceError>),
}

impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Frame(e) => defmt::write!(f, "frame: {}", e),
            Error::Encode(e) => defmt::write!(f, "scan response: {}", defmt::Debug2Format(e)),
            Error::Host(e) => defmt::write!(f, "host: {}", defmt::Debug2Format(e)),
        }
    }
}

// Advertiser
pub struct AdvertiserBuilder<'d> {
    /// Name of the device
    name: &'d str,
    peripheral: SdcPeripheral<'d>,
}

pub struct Advertiser<'d> {
    adv_data: [u8; LEGACY_ADV_DATA_MAX],
    adv_len: usize,
    scan_data: [u8; LEGACY_ADV_DATA_MAX],
    scan_len: usize,
    peripheral: SdcPeripheral<'d>,
}

/// A non-connectable iBeacon advertiser
impl<'d> AdvertiserBuilder<'d> {
    /// Create a new advertiser builder
    pub fn new(name: &'d str, peripheral: SdcPeripheral<'d>) -> Self {
        Self { name, peripheral }
    }

    /// Encode the [`PAYMENT_BEACON`] advertising data and the scan response once
    pub fn build(self) -> Result<Advertiser<'d>, Error> {
        let name = self.name.as_bytes();
        let name = if name.len() > NAME_MAX {
            debug!("Name truncated to {=[u8]:a}", &name[..NAME_MAX]);
            &name[..NAME_MAX]
        } else {
            name
        };

        let mut adv_data = [0; LEGACY_ADV_DATA_MAX];
        let adv_len = encode_adv_data(&PAYMENT_BEACON, &mut adv_data)?;

        let mut scan_data = [0; LEGACY_ADV_DATA_MAX];
        let scan_len = AdStructure::encode_slice(
            &[AdStructure::CompleteLocalName(name)],
            &mut scan_data[..],
        )?;

        debug!(
            "iBeacon {} major={} minor={} tx_power={}",
            PAYMENT_BEACON.uuid, PAYMENT_BEACON.major, PAYMENT_BEACON.minor, PAYMENT_BEACON.tx_power
        );
        Ok(Advertiser {
            adv_data,
            adv_len,
            scan_data,
            scan_len,
            peripheral: self.peripheral,
        })
    }
}

impl<'d> Advertiser<'d> {
    /// Start broadcasting. The beacon never accepts connections; the returned
    /// handle keeps the advertising set alive.
    pub async fn start(&mut self) -> Result<AdvertisingHandle<'d>, Error> {
        let params = AdvertisementParameters {
            interval_min: Duration::from_millis(ADV_INTERVAL_MS),
            interval_max: Duration::from_millis(ADV_INTERVAL_MS),
            ..Default::default()
        };
        let handle = self
            .peripheral
            .advertise(
                &params,
                Advertisement::NonconnectableScannableUndirected {
                    adv_data: &self.adv_data[..self.adv_len],
                    scan_data: &self.scan_data[..self.scan_len],
                },
            )
            .await?;
        debug!("advertising {} bytes", self.adv_len);
        Ok(handle)
    }
}
