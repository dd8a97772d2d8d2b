//! SNMP v2c trap decoding
//!
//! Wire decoding is done by `async-snmp`. This module only checks that the
//! message is a v2c SNMPv2-Trap and maps its variable bindings into the
//! relay's own trap model. Anything else (v1, v3, informs, get/set PDUs) is
//! rejected.

use crate::error::DecodeError;
use crate::trap::{BindingValue, DecodedTrap, OtherValue, VariableBinding};
use async_snmp::message::CommunityMessage;
use async_snmp::pdu::PduType;
use async_snmp::{Oid, Value, VarBind, Version};
use bytes::Bytes;
use std::net::Ipv4Addr;

/// A decoded SNMP v2c trap message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnmpMessage {
    /// Community exactly as received; compared byte for byte.
    pub community: Vec<u8>,
    pub request_id: i64,
    pub trap: DecodedTrap,
}

/// Decode one UDP datagram as an SNMP v2c trap.
pub fn decode_message(data: &[u8]) -> Result<SnmpMessage, DecodeError> {
    let message = CommunityMessage::decode(Bytes::copy_from_slice(data))
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if !matches!(message.version, Version::V2c) {
        return Err(DecodeError::UnsupportedVersion(format!("{:?}", message.version)));
    }

    let pdu = message.pdu;
    if !matches!(pdu.pdu_type, PduType::TrapV2) {
        return Err(DecodeError::UnsupportedPdu(format!("{:?}", pdu.pdu_type)));
    }

    let variables = pdu.varbinds.iter().map(binding_from_varbind).collect();

    Ok(SnmpMessage {
        community: message.community.to_vec(),
        request_id: i64::from(pdu.request_id),
        trap: DecodedTrap::new(variables),
    })
}

fn binding_from_varbind(varbind: &VarBind) -> VariableBinding {
    VariableBinding::new(dotted_oid(&varbind.oid), binding_value(&varbind.value))
}

fn binding_value(value: &Value) -> BindingValue {
    let other = match value {
        Value::OctetString(bytes) => return BindingValue::OctetString(bytes.to_vec()),
        Value::Integer(v) => OtherValue::Integer(i64::from(*v)),
        Value::Null => OtherValue::Null,
        Value::ObjectIdentifier(oid) => OtherValue::ObjectIdentifier(dotted_oid(oid)),
        Value::IpAddress(octets) => OtherValue::IpAddress(Ipv4Addr::from(*octets)),
        Value::Counter32(v) => OtherValue::Counter32(*v),
        Value::Gauge32(v) => OtherValue::Gauge32(*v),
        Value::TimeTicks(v) => OtherValue::TimeTicks(*v),
        Value::Opaque(bytes) => OtherValue::Opaque(bytes.to_vec()),
        Value::Counter64(v) => OtherValue::Counter64(*v),
        Value::NoSuchObject => OtherValue::NoSuchObject,
        Value::NoSuchInstance => OtherValue::NoSuchInstance,
        Value::EndOfMibView => OtherValue::EndOfMibView,
        #[allow(unreachable_patterns)]
        unrecognised => OtherValue::Unrecognised(format!("{:?}", unrecognised)),
    };

    BindingValue::Other(other)
}

/// Dotted text with a leading dot, e.g. `.1.3.6.1.2.1.1.3.0`.
fn dotted_oid(oid: &Oid) -> String {
    let dotted = oid.to_string();
    if dotted.starts_with('.') {
        dotted
    } else {
        format!(".{}", dotted)
    }
}
