use super::TlvDef;
use crate::filters::Filter;
use crate::types::TlvType::{Buffer, CString, Int16, Int32, Int8, String};

/// Standard SMPP v3.4 and v5.0 optional parameters.
pub(crate) fn standard() -> Vec<TlvDef> {
    vec![
        TlvDef::new("dest_addr_subunit", 0x0005, Int8),
        TlvDef::new("dest_network_type", 0x0006, Int8),
        TlvDef::new("dest_bearer_type", 0x0007, Int8),
        TlvDef::new("dest_telematics_id", 0x0008, Int16),
        TlvDef::new("source_addr_subunit", 0x000D, Int8),
        TlvDef::new("source_network_type", 0x000E, Int8),
        TlvDef::new("source_bearer_type", 0x000F, Int8),
        TlvDef::new("source_telematics_id", 0x0010, Int16),
        TlvDef::new("qos_time_to_live", 0x0017, Int32),
        TlvDef::new("payload_type", 0x0019, Int8),
        TlvDef::new("additional_status_info_text", 0x001D, CString),
        TlvDef::new("receipted_message_id", 0x001E, CString),
        TlvDef::new("ms_msg_wait_facilities", 0x0030, Int8),
        TlvDef::new("privacy_indicator", 0x0201, Int8),
        TlvDef::new("source_subaddress", 0x0202, Buffer),
        TlvDef::new("dest_subaddress", 0x0203, Buffer),
        TlvDef::new("user_message_reference", 0x0204, Int16),
        TlvDef::new("user_response_code", 0x0205, Int8),
        TlvDef::new("source_port", 0x020A, Int16),
        TlvDef::new("dest_port", 0x020B, Int16),
        TlvDef::new("sar_msg_ref_num", 0x020C, Int16),
        TlvDef::new("language_indicator", 0x020D, Int8),
        TlvDef::new("sar_total_segments", 0x020E, Int8),
        TlvDef::new("sar_segment_seqnum", 0x020F, Int8),
        TlvDef::new("sc_interface_version", 0x0210, Int8),
        TlvDef::new("callback_num_pres_ind", 0x0302, Int8).multiple(),
        TlvDef::new("callback_num_atag", 0x0303, Buffer)
            .with_filter(Filter::CallbackNumAtag)
            .multiple(),
        TlvDef::new("number_of_messages", 0x0304, Int8),
        TlvDef::new("callback_num", 0x0381, Buffer)
            .with_filter(Filter::CallbackNum)
            .multiple(),
        TlvDef::new("dpf_result", 0x0420, Int8),
        TlvDef::new("set_dpf", 0x0421, Int8),
        TlvDef::new("ms_availability_status", 0x0422, Int8),
        TlvDef::new("network_error_code", 0x0423, Buffer),
        TlvDef::new("message_payload", 0x0424, Buffer).with_filter(Filter::Message),
        TlvDef::new("delivery_failure_reason", 0x0425, Int8),
        TlvDef::new("more_messages_to_send", 0x0426, Int8),
        TlvDef::new("message_state", 0x0427, Int8),
        TlvDef::new("congestion_state", 0x0428, Int8),
        TlvDef::new("ussd_service_op", 0x0501, Int8),
        TlvDef::new("broadcast_channel_indicator", 0x0600, Int8),
        TlvDef::new("broadcast_content_type", 0x0601, Buffer)
            .with_filter(Filter::BroadcastContentType),
        TlvDef::new("broadcast_content_type_info", 0x0602, String),
        TlvDef::new("broadcast_message_class", 0x0603, Int8),
        TlvDef::new("broadcast_rep_num", 0x0604, Int16),
        TlvDef::new("broadcast_frequency_interval", 0x0605, Buffer)
            .with_filter(Filter::BroadcastFrequencyInterval),
        TlvDef::new("broadcast_area_identifier", 0x0606, Buffer)
            .with_filter(Filter::BroadcastAreaIdentifier)
            .multiple(),
        TlvDef::new("broadcast_error_status", 0x0607, Int32).multiple(),
        TlvDef::new("broadcast_area_success", 0x0608, Int8),
        TlvDef::new("broadcast_end_time", 0x0609, String).with_filter(Filter::Time),
        TlvDef::new("broadcast_service_group", 0x060A, String),
        TlvDef::new("billing_identification", 0x060B, Buffer)
            .with_filter(Filter::BillingIdentification),
        TlvDef::new("source_network_id", 0x060D, CString),
        TlvDef::new("dest_network_id", 0x060E, CString),
        TlvDef::new("source_node_id", 0x060F, String),
        TlvDef::new("dest_node_id", 0x0610, String),
        TlvDef::new("dest_addr_np_resolution", 0x0611, Int8),
        TlvDef::new("dest_addr_np_information", 0x0612, String),
        TlvDef::new("dest_addr_np_country", 0x0613, Int32),
        TlvDef::new("display_time", 0x1201, Int8),
        TlvDef::new("sms_signal", 0x1203, Int16),
        TlvDef::new("ms_validity", 0x1204, Buffer),
        TlvDef::new("alert_on_message_delivery", 0x130C, Int8),
        TlvDef::new("its_reply_type", 0x1380, Int8),
        TlvDef::new("its_session_info", 0x1383, Buffer),
    ]
}

/// Alternate names accepted for existing tags.
pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("alert_on_msg_delivery", "alert_on_message_delivery"),
    ("failed_broadcast_area_identifier", "broadcast_area_identifier"),
];
