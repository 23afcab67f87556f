use super::CommandDef;

/// Standard SMPP v3.4 and v5.0 commands.
pub(crate) fn standard() -> Vec<CommandDef> {
    command_table! {
        alert_notification = 0x0000_0102 {
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            esme_addr_ton: Int8,
            esme_addr_npi: Int8,
            esme_addr: CString,
        };
        bind_receiver = 0x0000_0001 {
            system_id: CString,
            password: CString,
            system_type: CString,
            interface_version: Int8 = 0x50,
            addr_ton: Int8,
            addr_npi: Int8,
            address_range: CString,
        };
        bind_receiver_resp = 0x8000_0001 {
            system_id: CString,
        };
        bind_transmitter = 0x0000_0002 {
            system_id: CString,
            password: CString,
            system_type: CString,
            interface_version: Int8 = 0x50,
            addr_ton: Int8,
            addr_npi: Int8,
            address_range: CString,
        };
        bind_transmitter_resp = 0x8000_0002 {
            system_id: CString,
        };
        bind_transceiver = 0x0000_0009 {
            system_id: CString,
            password: CString,
            system_type: CString,
            interface_version: Int8 = 0x50,
            addr_ton: Int8,
            addr_npi: Int8,
            address_range: CString,
        };
        bind_transceiver_resp = 0x8000_0009 {
            system_id: CString,
        };
        broadcast_sm = 0x0000_0111 {
            service_type: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            message_id: CString,
            priority_flag: Int8,
            schedule_delivery_time: CString [Time],
            validity_period: CString [Time],
            replace_if_present_flag: Int8,
            data_coding: Int8 = unset,
            sm_default_msg_id: Int8,
        };
        broadcast_sm_resp = 0x8000_0111 {
            message_id: CString,
        } remap {
            broadcast_area_identifier => failed_broadcast_area_identifier,
        };
        cancel_broadcast_sm = 0x0000_0113 {
            service_type: CString,
            message_id: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
        };
        cancel_broadcast_sm_resp = 0x8000_0113 {};
        cancel_sm = 0x0000_0008 {
            service_type: CString,
            message_id: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            dest_addr_ton: Int8,
            dest_addr_npi: Int8,
            destination_addr: CString,
        };
        cancel_sm_resp = 0x8000_0008 {};
        data_sm = 0x0000_0103 {
            service_type: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            dest_addr_ton: Int8,
            dest_addr_npi: Int8,
            destination_addr: CString,
            esm_class: Int8,
            registered_delivery: Int8,
            data_coding: Int8 = unset,
        };
        data_sm_resp = 0x8000_0103 {
            message_id: CString,
        };
        deliver_sm = 0x0000_0005 {
            service_type: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            dest_addr_ton: Int8,
            dest_addr_npi: Int8,
            destination_addr: CString,
            esm_class: Int8,
            protocol_id: Int8,
            priority_flag: Int8,
            schedule_delivery_time: CString [Time],
            validity_period: CString [Time],
            registered_delivery: Int8,
            replace_if_present_flag: Int8,
            data_coding: Int8 = unset,
            sm_default_msg_id: Int8,
            short_message: Buffer [Message],
        };
        deliver_sm_resp = 0x8000_0005 {
            message_id: CString,
        };
        enquire_link = 0x0000_0015 {};
        enquire_link_resp = 0x8000_0015 {};
        generic_nack = 0x8000_0000 {};
        outbind = 0x0000_000B {
            system_id: CString,
            password: CString,
        };
        query_broadcast_sm = 0x0000_0112 {
            message_id: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
        };
        query_broadcast_sm_resp = 0x8000_0112 {
            message_id: CString,
        };
        query_sm = 0x0000_0003 {
            message_id: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
        };
        query_sm_resp = 0x8000_0003 {
            message_id: CString,
            final_date: CString [Time],
            message_state: Int8,
            error_code: Int8,
        };
        replace_sm = 0x0000_0007 {
            message_id: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            schedule_delivery_time: CString [Time],
            validity_period: CString [Time],
            registered_delivery: Int8,
            sm_default_msg_id: Int8,
            short_message: Buffer [Message],
        };
        replace_sm_resp = 0x8000_0007 {};
        submit_multi = 0x0000_0021 {
            service_type: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            dest_address: DestAddressArray,
            esm_class: Int8,
            protocol_id: Int8,
            priority_flag: Int8,
            schedule_delivery_time: CString [Time],
            validity_period: CString [Time],
            registered_delivery: Int8,
            replace_if_present_flag: Int8,
            data_coding: Int8 = unset,
            sm_default_msg_id: Int8,
            short_message: Buffer [Message],
        };
        submit_multi_resp = 0x8000_0021 {
            message_id: CString,
            unsuccess_sme: UnsuccessSmeArray,
        };
        submit_sm = 0x0000_0004 {
            service_type: CString,
            source_addr_ton: Int8,
            source_addr_npi: Int8,
            source_addr: CString,
            dest_addr_ton: Int8,
            dest_addr_npi: Int8,
            destination_addr: CString,
            esm_class: Int8,
            protocol_id: Int8,
            priority_flag: Int8,
            schedule_delivery_time: CString [Time],
            validity_period: CString [Time],
            registered_delivery: Int8,
            replace_if_present_flag: Int8,
            data_coding: Int8 = unset,
            sm_default_msg_id: Int8,
            short_message: Buffer [Message],
        };
        submit_sm_resp = 0x8000_0004 {
            message_id: CString,
        };
        unbind = 0x0000_0006 {};
        unbind_resp = 0x8000_0006 {};
    }
}
