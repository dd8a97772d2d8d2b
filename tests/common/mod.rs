//! Test helpers: a small BER encoder for building SNMP v2c trap datagrams.

#![allow(dead_code)]

use snmpx::config::Config;
use std::collections::HashMap;

#[derive(Clone, Copy)]
pub enum Value<'a> {
    Text(&'a str),
    Integer(i64),
    TimeTicks(u32),
    Oid(&'a str),
}

fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes: Vec<u8> = len
            .to_be_bytes()
            .iter()
            .copied()
            .skip_while(|b| *b == 0)
            .collect();
        out.push(0x80 | bytes.len() as u8);
        out.extend(bytes);
    }
}

fn tlv(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    encode_length(body.len(), &mut out);
    out.extend_from_slice(body);
    out
}

fn integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

fn unsigned(value: u64) -> Vec<u8> {
    let mut bytes: Vec<u8> = value
        .to_be_bytes()
        .iter()
        .copied()
        .skip_while(|b| *b == 0)
        .collect();
    if bytes.first().map_or(true, |b| b & 0x80 != 0) {
        bytes.insert(0, 0);
    }
    bytes
}

fn oid(dotted: &str) -> Vec<u8> {
    let arcs: Vec<u64> = dotted
        .trim_start_matches('.')
        .split('.')
        .map(|arc| arc.parse().expect("numeric OID arc"))
        .collect();

    let mut out = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut chunk = vec![(arc & 0x7f) as u8];
        let mut rest = arc >> 7;
        while rest > 0 {
            chunk.push(((rest & 0x7f) as u8) | 0x80);
            rest >>= 7;
        }
        chunk.reverse();
        out.extend(chunk);
    }
    out
}

/// Encode an SNMPv2-Trap message with the given bindings.
pub fn encode_trap(
    version: i64,
    community: &str,
    pdu_tag: u8,
    bindings: &[(&str, Value<'_>)],
) -> Vec<u8> {
    encode_trap_raw(version, community.as_bytes(), pdu_tag, bindings)
}

/// Same as `encode_trap`, with a community that need not be UTF-8.
pub fn encode_trap_raw(
    version: i64,
    community: &[u8],
    pdu_tag: u8,
    bindings: &[(&str, Value<'_>)],
) -> Vec<u8> {
    let mut varbinds = Vec::new();
    for (name, value) in bindings {
        let encoded_value = match value {
            Value::Text(text) => tlv(0x04, text.as_bytes()),
            Value::Integer(v) => tlv(0x02, &integer(*v)),
            Value::TimeTicks(v) => tlv(0x43, &unsigned(u64::from(*v))),
            Value::Oid(v) => tlv(0x06, &oid(v)),
        };
        let mut binding = tlv(0x06, &oid(name));
        binding.extend(encoded_value);
        varbinds.extend(tlv(0x30, &binding));
    }

    let mut pdu = Vec::new();
    pdu.extend(tlv(0x02, &integer(4242)));
    pdu.extend(tlv(0x02, &integer(0)));
    pdu.extend(tlv(0x02, &integer(0)));
    pdu.extend(tlv(0x30, &varbinds));

    let mut message = Vec::new();
    message.extend(tlv(0x02, &integer(version)));
    message.extend(tlv(0x04, community));
    message.extend(tlv(pdu_tag, &pdu));

    tlv(0x30, &message)
}

/// Standard v2c trap carrying sysUpTime, snmpTrapOID and the extra bindings.
pub fn v2c_trap(community: &str, extra: &[(&str, Value<'_>)]) -> Vec<u8> {
    let mut bindings = vec![
        (".1.3.6.1.2.1.1.3.0", Value::TimeTicks(360_000)),
        (".1.3.6.1.6.3.1.1.4.1.0", Value::Oid(".1.3.6.1.4.1.8072.2.3.0.1")),
    ];
    bindings.extend_from_slice(extra);
    encode_trap(1, community, 0xa7, &bindings)
}

pub fn config(community: &str, webhooks: &[(&str, String)]) -> Config {
    Config {
        community: community.to_string(),
        webhooks: webhooks
            .iter()
            .map(|(label, url)| (label.to_string(), url.clone()))
            .collect::<HashMap<_, _>>(),
    }
}
