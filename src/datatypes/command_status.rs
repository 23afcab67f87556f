use num_enum::TryFromPrimitive;
/// The command_status field of an SMPP message response indicates the success
/// or failure of an SMPP request. It is relevant only in the SMPP response
/// message and should be set to NULL in SMPP request messages. The SMPP Error
/// status codes are returned by the SMSC in the command_status field of the
/// SMPP message header and in the error_status_code field of a
/// submit_multi_resp message

#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// No Error
    Ok = 0x00000000,

    /// Message Length is invalid
    InvalidMsgLength = 0x00000001,

    /// Command Length is invalid
    InvalidCommandLength = 0x00000002,

    /// Invalid Command ID
    InvalidCommandId = 0x00000003,

    /// Incorrect BIND Status for given command
    IncorrectBindStatus = 0x00000004,

    /// ESME Already in Bound State
    AlreadyBoundState = 0x00000005,

    /// Invalid Priority Flag
    InvalidPriorityFlag = 0x00000006,

    /// Invalid Registered Delivery Flag
    InvalidRegisteredDeliveryFlag = 0x00000007,

    /// System Error
    SystemError = 0x00000008,

    // Reserved   0x00000009
    /// Invalid Source Address
    InvalidSourceAddress = 0x0000000A,

    /// Invalid Dest Addr
    InvalidDestinationAddress = 0x0000000B,

    /// Message ID is invalid
    InvalidMessageId = 0x0000000C,

    /// Bind Failed
    BindFailed = 0x0000000D,

    /// Invalid Password
    InvalidPassword = 0x0000000E,

    /// Invalid System ID
    InvalidSystemId = 0x0000000F,

    // Reserved 0x00000010
    /// Cancel SM Failed
    CancelSmFailed = 0x00000011,

    // Reserved 0x00000012
    /// Replace SM Failed
    ReplacedSmFailed = 0x00000013,

    /// Message Queue Full
    MessageQueueFull = 0x00000014,

    /// Invalid Service Type
    InvalidServiceType = 0x00000015,

    // Reserved 0x00000016 - 0x00000032
    /// Invalid number of destinations
    InvalidNumberOfDestinations = 0x00000033,

    /// Invalid Distribution List name
    InvalidDistributionListName = 0x00000034,

    // Reserved 0x00000035 - 0x0000003F
    /// Destination flag is invalid (submit_multi)
    InvalidDestinationFlag = 0x00000040,

    // Reserved    0x00000041
    /// Invalid 'submit with replace' request
    /// (i.e. submit_sm with replace_if_present_flag set)
    InvalidSubmitWithReplaceRequest = 0x00000042,

    /// Invalid esm_class field data
    InvalidEsmClassFieldData = 0x00000043,

    /// Cannot Submit to Distribution List
    CannotSubmitToDistributionList = 0x00000044,

    /// submit_sm or submit_multi failed
    SubmitFailed = 0x00000045,

    // Reserved 0x00000046 - 0x00000047
    /// Invalid Source address TON
    InvalidSourceAddressTon = 0x00000048,

    /// Invalid Source address NPI
    InvalidSourceAddressNpi = 0x00000049,

    /// Invalid Destination address TON
    InvalidDestinationAddressTon = 0x00000050,

    /// Invalid Destination address NPI
    InvalidDestinationAddressNpi = 0x00000051,

    // Reserved 0x00000052
    /// Invalid system_type field
    InvalidSystemTypeField = 0x00000053,
    /// Invalid replace_if_present flag
    InvalidReplaceIfPresentFlag = 0x00000054,
    /// Invalid number of messages
    InvalidNumberOfMessages = 0x00000055,

    // Reserved 0x00000056 - 0x00000057
    /// Throttling error (ESME has exceeded allowed message limits)
    ThrottlingError = 0x00000058,

    // Reserved 0x00000059 - 0x00000060
    /// Invalid Scheduled Delivery Time
    InvalidScheduledDeliveryTime = 0x00000061,
    /// Invalid message validity period (Expiry time)
    InvalidExpiryTime = 0x00000062,
    /// Predefined Message Invalid or Not Found
    InvalidPredefinedMessageId = 0x00000063,
    /// ESME Receiver Temporary App Error Code
    ReceiverTemporaryAppError = 0x00000064,
    /// ESME Receiver Permanent App Error Code
    ReceiverPermanentAppError = 0x00000065,
    /// ESME Receiver Reject Message Error Code
    ReceiverRejectMessageError = 0x00000066,
    /// query_sm request failed
    QuerySmRequestFailed = 0x00000067,

    // Reserved 0x00000068 - 0x000000BF
    /// Error in the optional part of the PDU Body.
    ErrorInOptionalPartofPduBody = 0x000000C0,
    /// Optional Parameter not allowed
    OptionalParameterNotAllowed = 0x000000C1,
    /// Invalid Parameter Length.
    InvalidParameterLength = 0x000000C2,
    /// Expected Optional Parameter missing
    ExpectedOptionalParameterMissing = 0x000000C3,
    /// Invalid Optional Parameter Value
    InvalidOptionalParameterValue = 0x000000C4,

    // Reserved 0x000000C5 - 0x000000FD
    /// Delivery Failure (used for data_sm_resp)
    DeliveryFailed = 0x000000FE,

    /// Unknown Error
    UnknownError = 0x000000FF,

    /// Specified service_type is unauthorised or invalid
    ServiceTypeUnauthorised = 0x00000100,
    /// ESME prohibited from using specified operation
    Prohibited = 0x00000101,
    /// Specified service_type is unavailable
    ServiceTypeUnavailable = 0x00000102,
    /// Specified service_type is denied
    ServiceTypeDenied = 0x00000103,
    /// Invalid Data Coding Scheme
    InvalidDataCoding = 0x00000104,
    /// Source Address Sub unit is invalid
    InvalidSourceAddressSubunit = 0x00000105,
    /// Destination Address Sub unit is invalid
    InvalidDestinationAddressSubunit = 0x00000106,
    /// Broadcast Frequency Interval is invalid
    InvalidBroadcastFrequencyInterval = 0x00000107,
    /// Broadcast Alias Name is invalid
    InvalidBroadcastAliasName = 0x00000108,
    /// Broadcast Area Format is invalid
    InvalidBroadcastAreaFormat = 0x00000109,
    /// Number of Broadcast Areas is invalid
    InvalidNumberOfBroadcastAreas = 0x0000010A,
    /// Broadcast Content Type is invalid
    InvalidBroadcastContentType = 0x0000010B,
    /// Broadcast Message Class is invalid
    InvalidBroadcastMessageClass = 0x0000010C,
    /// broadcast_sm operation failed
    BroadcastFailed = 0x0000010D,
    /// query_broadcast_sm operation failed
    BroadcastQueryFailed = 0x0000010E,
    /// cancel_broadcast_sm operation failed
    BroadcastCancelFailed = 0x0000010F,
    /// Number of Repeated Broadcasts is invalid
    InvalidBroadcastRepNum = 0x00000110,
    /// Broadcast Service Group is invalid
    InvalidBroadcastServiceGroup = 0x00000111,
    /// Broadcast Channel Indicator is invalid
    InvalidBroadcastChannelIndicator = 0x00000112,
    // Reserved for SMSC vendor specific errors
    // 0x00000400- 0x000004FF
    // Reserved 0x00000500- 0xFFFFFFFF
}

impl CommandStatus {
    /// The `ESME_R*` mnemonic used by the protocol documents.
    pub fn name(&self) -> &'static str {
        match self {
            CommandStatus::Ok => "ESME_ROK",
            CommandStatus::InvalidMsgLength => "ESME_RINVMSGLEN",
            CommandStatus::InvalidCommandLength => "ESME_RINVCMDLEN",
            CommandStatus::InvalidCommandId => "ESME_RINVCMDID",
            CommandStatus::IncorrectBindStatus => "ESME_RINVBNDSTS",
            CommandStatus::AlreadyBoundState => "ESME_RALYBND",
            CommandStatus::InvalidPriorityFlag => "ESME_RINVPRTFLG",
            CommandStatus::InvalidRegisteredDeliveryFlag => "ESME_RINVREGDLVFLG",
            CommandStatus::SystemError => "ESME_RSYSERR",
            CommandStatus::InvalidSourceAddress => "ESME_RINVSRCADR",
            CommandStatus::InvalidDestinationAddress => "ESME_RINVDSTADR",
            CommandStatus::InvalidMessageId => "ESME_RINVMSGID",
            CommandStatus::BindFailed => "ESME_RBINDFAIL",
            CommandStatus::InvalidPassword => "ESME_RINVPASWD",
            CommandStatus::InvalidSystemId => "ESME_RINVSYSID",
            CommandStatus::CancelSmFailed => "ESME_RCANCELFAIL",
            CommandStatus::ReplacedSmFailed => "ESME_RREPLACEFAIL",
            CommandStatus::MessageQueueFull => "ESME_RMSGQFUL",
            CommandStatus::InvalidServiceType => "ESME_RINVSERTYP",
            CommandStatus::InvalidNumberOfDestinations => "ESME_RINVNUMDESTS",
            CommandStatus::InvalidDistributionListName => "ESME_RINVDLNAME",
            CommandStatus::InvalidDestinationFlag => "ESME_RINVDESTFLAG",
            CommandStatus::InvalidSubmitWithReplaceRequest => "ESME_RINVSUBREP",
            CommandStatus::InvalidEsmClassFieldData => "ESME_RINVESMCLASS",
            CommandStatus::CannotSubmitToDistributionList => "ESME_RCNTSUBDL",
            CommandStatus::SubmitFailed => "ESME_RSUBMITFAIL",
            CommandStatus::InvalidSourceAddressTon => "ESME_RINVSRCTON",
            CommandStatus::InvalidSourceAddressNpi => "ESME_RINVSRCNPI",
            CommandStatus::InvalidDestinationAddressTon => "ESME_RINVDSTTON",
            CommandStatus::InvalidDestinationAddressNpi => "ESME_RINVDSTNPI",
            CommandStatus::InvalidSystemTypeField => "ESME_RINVSYSTYP",
            CommandStatus::InvalidReplaceIfPresentFlag => "ESME_RINVREPFLAG",
            CommandStatus::InvalidNumberOfMessages => "ESME_RINVNUMMSGS",
            CommandStatus::ThrottlingError => "ESME_RTHROTTLED",
            CommandStatus::InvalidScheduledDeliveryTime => "ESME_RINVSCHED",
            CommandStatus::InvalidExpiryTime => "ESME_RINVEXPIRY",
            CommandStatus::InvalidPredefinedMessageId => "ESME_RINVDFTMSGID",
            CommandStatus::ReceiverTemporaryAppError => "ESME_RX_T_APPN",
            CommandStatus::ReceiverPermanentAppError => "ESME_RX_P_APPN",
            CommandStatus::ReceiverRejectMessageError => "ESME_RX_R_APPN",
            CommandStatus::QuerySmRequestFailed => "ESME_RQUERYFAIL",
            CommandStatus::ErrorInOptionalPartofPduBody => "ESME_RINVTLVSTREAM",
            CommandStatus::OptionalParameterNotAllowed => "ESME_RTLVNOTALLWD",
            CommandStatus::InvalidParameterLength => "ESME_RINVTLVLEN",
            CommandStatus::ExpectedOptionalParameterMissing => "ESME_RMISSINGTLV",
            CommandStatus::InvalidOptionalParameterValue => "ESME_RINVTLVVAL",
            CommandStatus::DeliveryFailed => "ESME_RDELIVERYFAILURE",
            CommandStatus::UnknownError => "ESME_RUNKNOWNERR",
            CommandStatus::ServiceTypeUnauthorised => "ESME_RSERTYPUNAUTH",
            CommandStatus::Prohibited => "ESME_RPROHIBITED",
            CommandStatus::ServiceTypeUnavailable => "ESME_RSERTYPUNAVAIL",
            CommandStatus::ServiceTypeDenied => "ESME_RSERTYPDENIED",
            CommandStatus::InvalidDataCoding => "ESME_RINVDCS",
            CommandStatus::InvalidSourceAddressSubunit => "ESME_RINVSRCADDRSUBUNIT",
            CommandStatus::InvalidDestinationAddressSubunit => "ESME_RINVDSTADDRSUBUNIT",
            CommandStatus::InvalidBroadcastFrequencyInterval => "ESME_RINVBCASTFREQINT",
            CommandStatus::InvalidBroadcastAliasName => "ESME_RINVBCASTALIAS_NAME",
            CommandStatus::InvalidBroadcastAreaFormat => "ESME_RINVBCASTAREAFMT",
            CommandStatus::InvalidNumberOfBroadcastAreas => "ESME_RINVNUMBCAST_AREAS",
            CommandStatus::InvalidBroadcastContentType => "ESME_RINVBCASTCNTTYPE",
            CommandStatus::InvalidBroadcastMessageClass => "ESME_RINVBCASTMSGCLASS",
            CommandStatus::BroadcastFailed => "ESME_RBCASTFAIL",
            CommandStatus::BroadcastQueryFailed => "ESME_RBCASTQUERYFAIL",
            CommandStatus::BroadcastCancelFailed => "ESME_RBCASTCANCELFAIL",
            CommandStatus::InvalidBroadcastRepNum => "ESME_RINVBCAST_REP",
            CommandStatus::InvalidBroadcastServiceGroup => "ESME_RINVBCASTSRVGRP",
            CommandStatus::InvalidBroadcastChannelIndicator => "ESME_RINVBCASTCHANIND",
        }
    }
}

impl From<CommandStatus> for u32 {
    fn from(status: CommandStatus) -> Self {
        status as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip_through_u32() {
        assert_eq!(u32::from(CommandStatus::SubmitFailed), 0x45);
        assert_eq!(
            CommandStatus::try_from(0x0D).unwrap(),
            CommandStatus::BindFailed
        );
        assert_eq!(
            CommandStatus::try_from(0x112).unwrap(),
            CommandStatus::InvalidBroadcastChannelIndicator
        );
        assert!(CommandStatus::try_from(0x09).is_err());
    }

    #[test]
    fn test_status_mnemonics() {
        assert_eq!(CommandStatus::InvalidCommandId.name(), "ESME_RINVCMDID");
        assert_eq!(CommandStatus::BindFailed.name(), "ESME_RBINDFAIL");
    }
}
