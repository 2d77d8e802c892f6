//! Turns raw model output into a `Decision`, and screens disallowed labels.

use crate::models::Decision;

pub const REPHRASE_REPLY: &str = "Could you rephrase that request?";

/// Compacted (lowercase, alphanumeric-only) fragments of forbidden actions.
const BANNED_ACTIONS: [&str; 3] = ["deleteownaccount", "deleteaccount", "addroom"];

/// Best-effort decode: the whole text, then the outermost `{...}` span, then
/// a small-talk decision asking the user to rephrase. Never fails.
pub fn parse_decision(raw: &str) -> Decision {
    if let Ok(decision) = serde_json::from_str::<Decision>(raw.trim()) {
        return decision.normalized();
    }

    tracing::warn!(output = raw, "strict decision parse failed, extracting JSON");

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(decision) = serde_json::from_str::<Decision>(&raw[start..=end]) {
                return decision.normalized();
            }
        }
    }

    tracing::warn!("model output has no usable decision, asking to rephrase");
    Decision::new("small_talk", REPHRASE_REPLY)
}

/// Case- and separator-insensitive ban list check on the raw action label.
pub fn is_banned(label: &str) -> bool {
    let compact: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    !compact.is_empty() && BANNED_ACTIONS.iter().any(|banned| compact.contains(banned))
}
