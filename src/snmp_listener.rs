//! SNMP Trap Listener Implementation for snmpx
//!
//! Receives SNMP v2c traps on a UDP socket, authenticates them against the
//! configured community string and hands accepted traps to the relay as
//! `TrapEvent` messages.

use crate::error::DecodeError;
use crate::snmp_decoder::decode_message;
use crate::trap::{SenderAddress, TrapEvent};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Default UDP receive buffer, large enough for typical trap PDUs.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 8192;

/// Why a datagram was not turned into a trap event.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    Undecodable(DecodeError),
    CommunityMismatch,
}

pub struct SnmpListener {
    socket: UdpSocket,
    community: String,
    max_packet_size: usize,
    trap_sender: mpsc::UnboundedSender<TrapEvent>,
}

impl SnmpListener {
    /// Bind the UDP socket; failure here is fatal for the caller
    pub async fn bind(
        bind_addr: &str,
        community: impl Into<String>,
        max_packet_size: usize,
        trap_sender: mpsc::UnboundedSender<TrapEvent>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", bind_addr))?;

        Ok(Self {
            socket,
            community: community.into(),
            max_packet_size,
            trap_sender,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Receive datagrams until the trap channel is closed
    pub async fn run(self) -> Result<()> {
        info!("SNMP listener started on {}", self.local_addr()?);

        let mut buffer = vec![0u8; self.max_packet_size];
        let mut packet_count = 0u64;

        loop {
            let (len, src_addr) = match self.socket.recv_from(&mut buffer).await {
                Ok(received) => received,
                Err(e) => {
                    error!("Failed to receive UDP packet: {}", e);
                    continue;
                }
            };

            packet_count += 1;
            if packet_count % 1000 == 0 {
                info!("Processed {} UDP packets", packet_count);
            }

            match self.accept(&buffer[..len], src_addr) {
                Ok(event) => {
                    if self.trap_sender.send(event).is_err() {
                        info!("Trap channel closed, SNMP listener stopping");
                        return Ok(());
                    }
                }
                Err(Rejection::Undecodable(e)) => {
                    warn!(
                        "Failed to parse SNMP trap from {} ({} bytes): {}",
                        src_addr, len, e
                    );
                }
                Err(Rejection::CommunityMismatch) => {
                    warn!("Rejected SNMP trap from {}: community string mismatch", src_addr);
                }
            }
        }
    }

    /// Decode and authenticate one datagram
    fn accept(&self, data: &[u8], src_addr: SocketAddr) -> Result<TrapEvent, Rejection> {
        debug!("Processing SNMP trap from {} ({} bytes)", src_addr, data.len());

        let message = decode_message(data).map_err(Rejection::Undecodable)?;
        if message.community != self.community.as_bytes() {
            return Err(Rejection::CommunityMismatch);
        }

        let event = TrapEvent::new(message.trap, SenderAddress::from(src_addr));
        debug!(
            "Parsed SNMP v2c trap {} (request-id {}) from {}",
            event.id, message.request_id, src_addr
        );
        Ok(event)
    }
}
