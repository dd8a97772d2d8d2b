//! Configuration management for snmpx
//!
//! The config file is line oriented. Two line shapes are recognised:
//!
//! ```text
//! community=<STRING>
//! webhook.<LABEL>=<URL>
//! ```
//!
//! Every other line is ignored. The loaded `Config` is immutable for the
//! lifetime of the process.

use crate::error::{ConfigError, ResolutionError};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const WEBHOOK_PREFIX: &str = "webhook.";
const COMMUNITY_PREFIX: &str = "community=";

/// Severity label used when a trap's own severity has no webhook.
pub const DEFAULT_WEBHOOK: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SNMP v2c community traps must carry.
    pub community: String,
    /// Webhook URL per severity label. Labels are case-sensitive.
    pub webhooks: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a file on disk
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&content)
    }

    /// Build a configuration from file contents
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut webhooks = HashMap::new();
        let mut community = String::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();

            if let Some(rest) = line.strip_prefix(WEBHOOK_PREFIX) {
                match rest.split_once('=') {
                    Some((label, url)) => {
                        let label = label.trim();
                        let url = url.trim();
                        if let Some(previous) = webhooks.insert(label.to_string(), url.to_string())
                        {
                            debug!(
                                "Webhook '{}' redefined on line {} (was {})",
                                label,
                                index + 1,
                                previous
                            );
                        }
                    }
                    None => debug!("Ignoring webhook line {} without '='", index + 1),
                }
            } else if let Some(value) = line.strip_prefix(COMMUNITY_PREFIX) {
                community = value.trim().to_string();
            } else if !line.is_empty() {
                debug!("Ignoring unrecognised config line {}", index + 1);
            }
        }

        if community.is_empty() {
            return Err(ConfigError::MissingCommunity);
        }

        Ok(Self { community, webhooks })
    }

    /// Pick the webhook for a severity label, falling back to `default`
    pub fn resolve_webhook(&self, severity: &str) -> Result<&str, ResolutionError> {
        if let Some(url) = self.webhooks.get(severity) {
            return Ok(url.as_str());
        }

        match self.webhooks.get(DEFAULT_WEBHOOK) {
            Some(url) => {
                debug!("No webhook for severity '{}' - using default", severity);
                Ok(url.as_str())
            }
            None => Err(ResolutionError::NoEndpoint {
                severity: severity.to_string(),
            }),
        }
    }
}
