// ABOUTME: SMPP esm_class bitfield as a transparent newtype with named flag constants
// ABOUTME: The message filter uses it to raise the UDH indicator when a header is prepended

use std::fmt;

/// ESM (External Short Message) Class bitfield.
///
/// Bits 1-0 carry the messaging mode, bits 5-2 the message type and bits 7-6
/// the GSM network features (UDHI and reply path).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EsmClass(pub u8);

impl EsmClass {
    pub const DATAGRAM: u8 = 0x01;
    pub const FORWARD: u8 = 0x02;
    pub const STORE_FORWARD: u8 = 0x03;
    pub const MC_DELIVERY_RECEIPT: u8 = 0x04;
    pub const DELIVERY_ACKNOWLEDGEMENT: u8 = 0x08;
    pub const USER_ACKNOWLEDGEMENT: u8 = 0x10;
    pub const CONVERSATION_ABORT: u8 = 0x18;
    pub const INTERMEDIATE_DELIVERY: u8 = 0x20;
    pub const UDH_INDICATOR: u8 = 0x40;
    pub const KANNEL_UDH_INDICATOR: u8 = 0x43;
    pub const SET_REPLY_PATH: u8 = 0x80;

    pub fn has_udhi(self) -> bool {
        self.0 & Self::UDH_INDICATOR != 0
    }

    pub fn with_udhi(self) -> Self {
        EsmClass(self.0 | Self::UDH_INDICATOR)
    }

    pub fn is_delivery_acknowledgement(self) -> bool {
        self.0 & Self::DELIVERY_ACKNOWLEDGEMENT != 0
    }

    pub fn has_reply_path(self) -> bool {
        self.0 & Self::SET_REPLY_PATH != 0
    }
}

impl fmt::Debug for EsmClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EsmClass({:#04x})", self.0)
    }
}

impl From<u8> for EsmClass {
    fn from(value: u8) -> Self {
        EsmClass(value)
    }
}

impl From<EsmClass> for u8 {
    fn from(value: EsmClass) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udhi_flag() {
        let esm = EsmClass::default();
        assert!(!esm.has_udhi());
        assert_eq!(esm.with_udhi().0, 0x40);
        assert!(EsmClass(0x43).has_udhi());
    }

    #[test]
    fn test_delivery_acknowledgement_flag() {
        assert!(EsmClass(EsmClass::DELIVERY_ACKNOWLEDGEMENT).is_delivery_acknowledgement());
        assert!(!EsmClass(EsmClass::MC_DELIVERY_RECEIPT).is_delivery_acknowledgement());
    }
}
