//! Decoded SNMP trap model shared by the listener and the trap handler
//!
//! A `TrapEvent` is the only message that crosses from the UDP listener into
//! the relay pipeline, so the handler can be driven without a socket.

use chrono::{DateTime, Utc};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// One received, authenticated trap together with where it came from.
#[derive(Debug, Clone)]
pub struct TrapEvent {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub trap: DecodedTrap,
    pub sender: SenderAddress,
}

impl TrapEvent {
    pub fn new(trap: DecodedTrap, sender: SenderAddress) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            trap,
            sender,
        }
    }
}

/// Variable bindings of a trap PDU, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTrap {
    pub variables: Vec<VariableBinding>,
}

impl DecodedTrap {
    pub fn new(variables: Vec<VariableBinding>) -> Self {
        Self { variables }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub oid: String,
    pub value: BindingValue,
}

impl VariableBinding {
    pub fn new(oid: impl Into<String>, value: BindingValue) -> Self {
        Self {
            oid: oid.into(),
            value,
        }
    }

    /// Convenience constructor for text-like bindings.
    pub fn octet_string(oid: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(oid, BindingValue::OctetString(value.into()))
    }

    /// Value as text if this binding carries an OCTET STRING.
    pub fn text(&self) -> Option<String> {
        match &self.value {
            BindingValue::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            BindingValue::Other(_) => None,
        }
    }
}

/// Binding value: octet strings are the only kind rendered as decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    OctetString(Vec<u8>),
    Other(OtherValue),
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingValue::OctetString(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            BindingValue::Other(other) => fmt::Display::fmt(other, f),
        }
    }
}

/// SNMP v2c value types other than OCTET STRING.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtherValue {
    Integer(i64),
    Null,
    ObjectIdentifier(String),
    IpAddress(Ipv4Addr),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Vec<u8>),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    /// Value type the decoder does not model; kept in debug form.
    Unrecognised(String),
}

impl fmt::Display for OtherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherValue::Integer(v) => write!(f, "{}", v),
            OtherValue::Null => f.write_str("<nil>"),
            OtherValue::ObjectIdentifier(oid) => f.write_str(oid),
            OtherValue::IpAddress(ip) => write!(f, "{}", ip),
            OtherValue::Counter32(v) | OtherValue::Gauge32(v) | OtherValue::TimeTicks(v) => {
                write!(f, "{}", v)
            }
            OtherValue::Opaque(bytes) => write!(f, "{:?}", bytes),
            OtherValue::Counter64(v) => write!(f, "{}", v),
            OtherValue::NoSuchObject => f.write_str("noSuchObject"),
            OtherValue::NoSuchInstance => f.write_str("noSuchInstance"),
            OtherValue::EndOfMibView => f.write_str("endOfMibView"),
            OtherValue::Unrecognised(raw) => f.write_str(raw),
        }
    }
}

/// Originating address of a trap. Only the IP is shown in alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderAddress(pub SocketAddr);

impl From<SocketAddr> for SenderAddress {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for SenderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.ip())
    }
}
