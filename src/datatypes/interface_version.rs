use num_enum::TryFromPrimitive;

/// This parameter is used to indicate the version of the SMPP protocol.
///
/// Bind requests default to `SmppV50`.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterfaceVersion {
    SmppV33 = 0x33,
    SmppV34 = 0x34,
    SmppV50 = 0x50,
}
