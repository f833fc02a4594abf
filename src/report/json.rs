//! JSON output for comparisons.
//!
//! Serializes the whole Comparison for scripting and piping.

use crate::reconcile::Comparison;

pub fn render(comparison: &Comparison) -> String {
    serde_json::to_string_pretty(comparison)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize comparison: {e}\"}}"))
}
