//! Error types for snmpx
//!
//! Configuration errors are fatal at startup. Resolution, delivery and
//! decode errors are scoped to a single trap or datagram and only ever
//! end up in a log line.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the relay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No non-empty `community=` line was found.
    #[error("community string is missing in config file")]
    MissingCommunity,

    /// The config file could not be opened or read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while choosing a webhook for a severity label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// Neither the severity nor `default` has a configured webhook.
    #[error("no webhook configured for severity '{severity}' and no default webhook")]
    NoEndpoint { severity: String },
}

/// Errors raised while posting an alert to a webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to serialise webhook payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to send POST request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from webhook: {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },
}

/// Errors raised while decoding an SNMP datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed SNMP message: {0}")]
    Malformed(String),

    #[error("SNMP version {0} not supported (only v2c)")]
    UnsupportedVersion(String),

    #[error("PDU type {0} is not an SNMPv2 trap")]
    UnsupportedPdu(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_community_message() {
        assert_eq!(
            ConfigError::MissingCommunity.to_string(),
            "community string is missing in config file"
        );
    }

    #[test]
    fn io_error_includes_path_and_cause() {
        let err = ConfigError::Io {
            path: PathBuf::from("/etc/snmpx.conf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let text = err.to_string();
        assert!(text.contains("/etc/snmpx.conf"));
        assert!(text.contains("no such file"));
    }

    #[test]
    fn no_endpoint_names_severity() {
        let err = ResolutionError::NoEndpoint {
            severity: "critical".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no webhook configured for severity 'critical' and no default webhook"
        );
    }

    #[test]
    fn unexpected_status_renders_status_line() {
        let err = DeliveryError::UnexpectedStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(
            err.to_string(),
            "unexpected response from webhook: 500 Internal Server Error"
        );
    }

    #[test]
    fn decode_error_names_the_rejected_part() {
        assert_eq!(
            DecodeError::UnsupportedVersion("V1".to_string()).to_string(),
            "SNMP version V1 not supported (only v2c)"
        );
        assert_eq!(
            DecodeError::UnsupportedPdu("InformRequest".to_string()).to_string(),
            "PDU type InformRequest is not an SNMPv2 trap"
        );
    }
}
