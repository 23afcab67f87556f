// ABOUTME: Constants carried inside the SMPP v5.0 broadcast TLV records
// ABOUTME: Network types, broadcast area formats and frequency interval units

use num_enum::TryFromPrimitive;

/// Network type of a `broadcast_content_type` record
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    Generic = 0x00,
    Gsm = 0x01,
    Tdma = 0x02,
    Cdma = 0x03,
}

/// Format byte of a `broadcast_area_identifier`
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BroadcastAreaFormat {
    /// Alias / name, carried as ASCII text
    Name = 0x00,
    EllipsoidArc = 0x01,
    Polygon = 0x02,
}

/// Unit byte of a `broadcast_frequency_interval`
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BroadcastFrequencyUnit {
    /// As frequently as possible
    MaxPossible = 0x00,
    Seconds = 0x08,
    Minutes = 0x09,
    Hours = 0x0A,
    Days = 0x0B,
    Weeks = 0x0C,
    Months = 0x0D,
    Years = 0x0E,
}
