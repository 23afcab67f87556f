use num_enum::TryFromPrimitive;

/// Numbering Plan Indicator (NPI) paired with a [`TypeOfNumber`](super::TypeOfNumber).
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumericPlanIndicator {
    Unknown = 0x00,
    Isdn = 0x01,
    Data = 0x03,
    Telex = 0x04,
    LandMobile = 0x06,
    National = 0x08,
    Private = 0x09,
    Ermes = 0x0A,
    /// Internet (IP)
    Internet = 0x0E,
    WapClientId = 0x12,
}
