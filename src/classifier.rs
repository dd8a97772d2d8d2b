//! Severity classification for decoded traps
//!
//! The severity label is taken from the first OCTET STRING binding whose OID
//! contains `severity`. This is a substring heuristic: any OID with that text
//! anywhere in its name qualifies.

use crate::trap::{BindingValue, DecodedTrap};

/// Label used when no binding carries a severity.
pub const UNKNOWN_SEVERITY: &str = "unknown";

const SEVERITY_MARKER: &str = "severity";

pub fn classify(trap: &DecodedTrap) -> String {
    trap.variables
        .iter()
        .find(|binding| {
            binding.oid.contains(SEVERITY_MARKER)
                && matches!(binding.value, BindingValue::OctetString(_))
        })
        .and_then(|binding| binding.text())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string())
}
