use derive_more::Display;

/// Errors raised while encoding or decoding beacon data.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The output slice cannot hold the encoded data
    #[display("output buffer holds {available} bytes, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },

    /// A frame had the wrong size
    #[display("expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },

    /// Manufacturer data that is not an Apple iBeacon frame
    #[display("not an iBeacon frame")]
    NotAnIBeacon,

    #[display("malformed proximity UUID")]
    InvalidUuid,
}
