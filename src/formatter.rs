//! Renders decoded traps as chat-friendly alert text

use crate::trap::{DecodedTrap, SenderAddress};
use std::fmt::Write;

/// Rendered alert text, one header line followed by one line per binding.
pub type AlertMessage = String;

pub fn format_alert(trap: &DecodedTrap, sender: &SenderAddress) -> AlertMessage {
    let mut message = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(message, "🚨 *SNMP Trap Received* from {}:", sender);

    for binding in &trap.variables {
        let _ = writeln!(
            message,
            "- OID: {}, Value: {}",
            single_line(&binding.oid),
            single_line(&binding.value.to_string())
        );
    }

    message
}

/// Escape line breaks so a multi-line value (e.g. sysDescr) stays on its binding's line.
pub fn single_line(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}
