mod broadcast;
mod command_id;
mod command_status;
mod data_coding;
mod esm_class;
mod interface_version;
mod message_state;
mod numeric_plan_indicator;
mod type_of_number;

pub use broadcast::{BroadcastAreaFormat, BroadcastFrequencyUnit, Network};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::DataCoding;
pub use esm_class::EsmClass;
pub use interface_version::InterfaceVersion;
pub use message_state::{MessageState, RegisteredDelivery};
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use type_of_number::TypeOfNumber;
