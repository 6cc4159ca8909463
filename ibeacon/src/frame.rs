//! The 25-byte iBeacon manufacturer-data frame.
//!
//! Layout, all multi-byte fields except the company id are big-endian:
//!
//! | offset | len | field                          |
//! |--------|-----|--------------------------------|
//! | 0      | 2   | company id (LE), 0x004C Apple  |
//! | 2      | 1   | beacon type, 0x02              |
//! | 3      | 1   | remaining length, 0x15         |
//! | 4      | 16  | proximity uuid                 |
//! | 20     | 2   | major                          |
//! | 22     | 2   | minor                          |
//! | 24     | 1   | calibrated tx power at 1m, i8  |

use core::fmt;
use core::str::FromStr;

use crate::Error;

/// Bluetooth SIG company identifier of Apple Inc.
pub const APPLE_COMPANY_ID: u16 = 0x004C;

/// iBeacon subtype inside Apple manufacturer data
pub const BEACON_TYPE: u8 = 0x02;

/// Bytes following the length field: uuid + major + minor + tx power
pub const BEACON_DATA_LEN: u8 = 0x15;

/// Size of the whole frame, company id included
pub const FRAME_LEN: usize = 25;

/// The beacon this device advertises.
pub const PAYMENT_BEACON: IBeacon = IBeacon {
    uuid: ProximityUuid::parse_str("FA4F992B-0F59-4E61-B0FB-457308078CAB"),
    major: 1,
    minor: 1,
    tx_power: -59,
};

/// Serialized [`PAYMENT_BEACON`], fixed at compile time.
pub const PAYMENT_BEACON_FRAME: [u8; FRAME_LEN] = PAYMENT_BEACON.to_bytes();

/// 128-bit proximity UUID, stored in transmission order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProximityUuid(pub [u8; 16]);

const fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl ProximityUuid {
    /// Parse the canonical `8-4-4-4-12` hyphenated form.
    pub const fn try_parse(s: &str) -> Option<Self> {
        let s = s.as_bytes();
        if s.len() != 36 {
            return None;
        }
        let mut out = [0u8; 16];
        let mut i = 0;
        let mut o = 0;
        while i < s.len() {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                if s[i] != b'-' {
                    return None;
                }
                i += 1;
                continue;
            }
            let hi = match hex_nibble(s[i]) {
                Some(v) => v,
                None => return None,
            };
            let lo = match hex_nibble(s[i + 1]) {
                Some(v) => v,
                None => return None,
            };
            out[o] = (hi << 4) | lo;
            o += 1;
            i += 2;
        }
        Some(Self(out))
    }

    /// Compile-time variant of [`ProximityUuid::try_parse`]. Panics on a
    /// malformed literal, which fails the build when used in a `const`.
    pub const fn parse_str(s: &str) -> Self {
        match Self::try_parse(s) {
            Some(uuid) => uuid,
            None => panic!("malformed proximity UUID"),
        }
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl FromStr for ProximityUuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or(Error::InvalidUuid)
    }
}

/// Whether a `-` goes before byte `i` of the 8-4-4-4-12 text form.
const fn starts_group(i: usize) -> bool {
    matches!(i, 4 | 6 | 8 | 10)
}

impl fmt::Display for ProximityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if starts_group(i) {
                f.write_str("-")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProximityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProximityUuid({})", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProximityUuid {
    fn format(&self, f: defmt::Formatter) {
        for (i, b) in self.0.iter().enumerate() {
            if starts_group(i) {
                defmt::write!(f, "-");
            }
            defmt::write!(f, "{=u8:02X}", *b);
        }
    }
}

/// One iBeacon identity: region UUID, major/minor and calibrated TX power.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IBeacon {
    pub uuid: ProximityUuid,
    pub major: u16,
    pub minor: u16,
    /// RSSI expected at 1m, dBm
    pub tx_power: i8,
}

impl IBeacon {
    /// Serialize into the fixed frame layout.
    pub const fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        let company = APPLE_COMPANY_ID.to_le_bytes();
        out[0] = company[0];
        out[1] = company[1];
        out[2] = BEACON_TYPE;
        out[3] = BEACON_DATA_LEN;
        let mut i = 0;
        while i < 16 {
            out[4 + i] = self.uuid.0[i];
            i += 1;
        }
        let major = self.major.to_be_bytes();
        out[20] = major[0];
        out[21] = major[1];
        let minor = self.minor.to_be_bytes();
        out[22] = minor[0];
        out[23] = minor[1];
        out[24] = self.tx_power as u8;
        out
    }

    /// Decode manufacturer data (company id included) as an iBeacon frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: FRAME_LEN,
                found: bytes.len(),
            });
        }
        Self::from_manufacturer_data(u16::from_le_bytes([bytes[0], bytes[1]]), &bytes[2..])
    }

    /// Decode a manufacturer data record whose company id has already been
    /// split off, as BLE stacks hand it over.
    pub fn from_manufacturer_data(
        company_identifier: u16,
        payload: &[u8],
    ) -> Result<Self, Error> {
        let payload: &[u8; FRAME_LEN - 2] =
            payload.try_into().map_err(|_| Error::InvalidLength {
                expected: FRAME_LEN,
                found: payload.len() + 2,
            })?;

        if company_identifier != APPLE_COMPANY_ID
            || payload[0] != BEACON_TYPE
            || payload[1] != BEACON_DATA_LEN
        {
            return Err(Error::NotAnIBeacon);
        }

        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&payload[2..18]);
        Ok(IBeacon {
            uuid: ProximityUuid(uuid),
            major: u16::from_be_bytes([payload[18], payload[19]]),
            minor: u16::from_be_bytes([payload[20], payload[21]]),
            tx_power: payload[22] as i8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rustfmt::skip]
    const EXPECTED: [u8; FRAME_LEN] = [
        0x4C, 0x00,
        0x02,
        0x15,
        0xFA, 0x4F, 0x99, 0x2B, 0x0F, 0x59, 0x4E, 0x61,
        0xB0, 0xFB, 0x45, 0x73, 0x08, 0x07, 0x8C, 0xAB,
        0x00, 0x01,
        0x00, 0x01,
        0xC5,
    ];

    #[test]
    fn payment_beacon_layout() {
        assert_eq!(PAYMENT_BEACON_FRAME.len(), 25);
        assert_eq!(PAYMENT_BEACON_FRAME, EXPECTED);
    }

    #[test]
    fn serialization_is_stable() {
        let first = PAYMENT_BEACON.to_bytes();
        for _ in 0..3 {
            assert_eq!(PAYMENT_BEACON.to_bytes(), first);
        }
        assert_eq!(first, PAYMENT_BEACON_FRAME);
    }

    #[test]
    fn multi_byte_fields_are_big_endian() {
        let beacon = IBeacon {
            major: 0x1234,
            minor: 0xABCD,
            tx_power: -1,
            ..PAYMENT_BEACON
        };
        let bytes = beacon.to_bytes();
        assert_eq!(&bytes[20..24], &[0x12, 0x34, 0xAB, 0xCD]);
        assert_eq!(bytes[24], 0xFF);
        // company id stays little-endian
        assert_eq!(&bytes[..2], &[0x4C, 0x00]);
    }

    #[test]
    fn decode_payment_beacon() {
        let beacon = IBeacon::decode(&EXPECTED).unwrap();
        assert_eq!(
            beacon.uuid.to_string(),
            "FA4F992B-0F59-4E61-B0FB-457308078CAB"
        );
        assert_eq!(beacon.major, 1);
        assert_eq!(beacon.minor, 1);
        assert_eq!(beacon.tx_power, -59);
        assert_eq!(beacon, PAYMENT_BEACON);
    }

    #[test]
    fn decode_split_manufacturer_data() {
        assert_eq!(
            IBeacon::from_manufacturer_data(APPLE_COMPANY_ID, &EXPECTED[2..]),
            Ok(PAYMENT_BEACON)
        );
        assert_eq!(
            IBeacon::from_manufacturer_data(0x0059, &EXPECTED[2..]),
            Err(Error::NotAnIBeacon)
        );
        assert_eq!(
            IBeacon::from_manufacturer_data(APPLE_COMPANY_ID, &EXPECTED[2..20]),
            Err(Error::InvalidLength {
                expected: 25,
                found: 20
            })
        );
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(
            IBeacon::decode(&EXPECTED[..24]),
            Err(Error::InvalidLength {
                expected: 25,
                found: 24
            })
        );
    }

    #[test]
    fn decode_rejects_other_frames() {
        let mut other_company = EXPECTED;
        other_company[0] = 0x59;
        assert_eq!(IBeacon::decode(&other_company), Err(Error::NotAnIBeacon));

        let mut other_type = EXPECTED;
        other_type[2] = 0x10;
        assert_eq!(IBeacon::decode(&other_type), Err(Error::NotAnIBeacon));
    }

    #[test]
    fn uuid_text_forms() {
        let upper: ProximityUuid = "FA4F992B-0F59-4E61-B0FB-457308078CAB".parse().unwrap();
        let lower: ProximityUuid = "fa4f992b-0f59-4e61-b0fb-457308078cab".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, PAYMENT_BEACON.uuid);
        assert_eq!(upper.as_bytes(), &EXPECTED[4..20]);
    }

    #[test]
    fn uuid_logs_in_hyphenated_groups() {
        let text = PAYMENT_BEACON.uuid.to_string();
        assert_eq!(text, "FA4F992B-0F59-4E61-B0FB-457308078CAB");
        let groups: Vec<usize> = text.split('-').map(str::len).collect();
        assert_eq!(groups, [8, 4, 4, 4, 12]);
        let breaks: Vec<usize> = (0..16).filter(|&i| starts_group(i)).collect();
        assert_eq!(breaks, [4, 6, 8, 10]);
    }

    #[test]
    fn uuid_rejects_malformed() {
        for bad in [
            "",
            "FA4F992B0F594E61B0FB457308078CAB",
            "FA4F992B-0F59-4E61-B0FB-457308078CAG",
            "FA4F992B+0F59-4E61-B0FB-457308078CAB",
            "FA4F992B-0F59-4E61-B0FB-457308078CAB0",
        ] {
            assert_eq!(bad.parse::<ProximityUuid>(), Err(Error::InvalidUuid), "{bad}");
        }
    }
}
