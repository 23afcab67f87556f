use num_enum::TryFromPrimitive;

/// State of a previously submitted message, as reported by query_sm_resp
/// and the `message_state` TLV.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageState {
    Scheduled = 0,
    Enroute = 1,
    Delivered = 2,
    Expired = 3,
    Deleted = 4,
    Undeliverable = 5,
    Accepted = 6,
    Unknown = 7,
    Rejected = 8,
    Skipped = 9,
}

/// registered_delivery flag bits
pub struct RegisteredDelivery;

impl RegisteredDelivery {
    pub const FINAL: u8 = 0x01;
    pub const FAILURE: u8 = 0x02;
    pub const SUCCESS: u8 = 0x03;
    pub const DELIVERY_ACKNOWLEDGEMENT: u8 = 0x04;
    pub const USER_ACKNOWLEDGEMENT: u8 = 0x08;
    pub const INTERMEDIATE: u8 = 0x10;
}
