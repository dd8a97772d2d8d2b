//! snmpx Library
//!
//! Relays SNMP v2c traps to chat-style webhooks. Each trap is classified by
//! severity, rendered as a short text alert and posted to the webhook
//! configured for that severity, falling back to the `default` webhook.

pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod snmp_decoder;
pub mod snmp_listener;
pub mod trap;
pub mod trap_handler;
pub mod webhook_notifier;

pub use classifier::classify;
pub use config::Config;
pub use error::{ConfigError, DecodeError, DeliveryError, ResolutionError};
pub use formatter::{format_alert, single_line, AlertMessage};
pub use snmp_listener::SnmpListener;
pub use trap::{BindingValue, DecodedTrap, OtherValue, SenderAddress, TrapEvent, VariableBinding};
pub use trap_handler::{TrapHandler, TrapOutcome};
pub use webhook_notifier::{DeliveryOutcome, WebhookNotifier};
