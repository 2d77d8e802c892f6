//! Field-wise merging of session context across turns.

use crate::models::{ConversationContext, ConversationIntent, Decision};

/// Combines the stored context with the one derived from the current turn.
/// Derived values win wherever they are present.
pub fn merge_context(
    prior: &ConversationContext,
    derived: &ConversationContext,
) -> ConversationContext {
    ConversationContext {
        intent: if derived.intent != ConversationIntent::None {
            derived.intent
        } else {
            prior.intent
        },
        check_in: derived.check_in.clone().or_else(|| prior.check_in.clone()),
        check_out: derived.check_out.clone().or_else(|| prior.check_out.clone()),
        room_number: derived.room_number.or(prior.room_number),
        last_user: derived.last_user.clone().or_else(|| prior.last_user.clone()),
        last_assistant: derived
            .last_assistant
            .clone()
            .or_else(|| prior.last_assistant.clone()),
    }
}

/// Folds a committed decision into the context that will be persisted.
pub fn merge_state(ctx: &ConversationContext, decision: &Decision) -> ConversationContext {
    ConversationContext {
        intent: intent_for_label(decision.label(), ctx.intent),
        check_in: decision.param("checkInDate").or_else(|| ctx.check_in.clone()),
        check_out: decision.param("checkOutDate").or_else(|| ctx.check_out.clone()),
        room_number: decision
            .param("roomNumber")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .or(ctx.room_number),
        last_user: ctx.last_user.clone(),
        last_assistant: ctx.last_assistant.clone(),
    }
}

/// Maps an action label onto the conversation intent by substring.
/// The order matters: "get_my_bookings" lands on `BookRoom`.
fn intent_for_label(label: &str, current: ConversationIntent) -> ConversationIntent {
    let label = label.to_lowercase();
    if label.contains("book") {
        ConversationIntent::BookRoom
    } else if label.contains("available") || label.contains("room") {
        ConversationIntent::ViewRooms
    } else if label.contains("update") {
        ConversationIntent::None
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_dates() -> ConversationContext {
        ConversationContext {
            intent: ConversationIntent::ViewRooms,
            check_in: Some("2025-12-10".to_string()),
            check_out: Some("2025-12-12".to_string()),
            room_number: None,
            last_user: Some("rooms please".to_string()),
            last_assistant: Some("Which dates?".to_string()),
        }
    }

    #[test]
    fn test_merge_context_derived_wins_when_present() {
        let prior = ctx_with_dates();
        let derived = ConversationContext {
            intent: ConversationIntent::BookRoom,
            room_number: Some(105),
            last_user: Some("book room 105".to_string()),
            ..Default::default()
        };
        let merged = merge_context(&prior, &derived);
        assert_eq!(merged.intent, ConversationIntent::BookRoom);
        assert_eq!(merged.check_in.as_deref(), Some("2025-12-10"));
        assert_eq!(merged.check_out.as_deref(), Some("2025-12-12"));
        assert_eq!(merged.room_number, Some(105));
        assert_eq!(merged.last_user.as_deref(), Some("book room 105"));
        assert_eq!(merged.last_assistant.as_deref(), Some("Which dates?"));
    }

    #[test]
    fn test_merge_context_keeps_prior_intent_on_none() {
        let merged = merge_context(&ctx_with_dates(), &ConversationContext::default());
        assert_eq!(merged, ctx_with_dates());
    }

    #[test]
    fn test_merge_state_takes_decision_params() {
        let decision = Decision::new("create_booking", "ok")
            .with_param("roomNumber", "204")
            .with_param("checkInDate", "2026-01-01")
            .with_param("checkOutDate", "");
        let merged = merge_state(&ctx_with_dates(), &decision);
        assert_eq!(merged.intent, ConversationIntent::BookRoom);
        assert_eq!(merged.room_number, Some(204));
        assert_eq!(merged.check_in.as_deref(), Some("2026-01-01"));
        assert_eq!(merged.check_out.as_deref(), Some("2025-12-12"));
        assert_eq!(merged.last_user.as_deref(), Some("rooms please"));
    }

    #[test]
    fn test_merge_state_intent_from_label() {
        let ctx = ctx_with_dates();
        let intent = |label: &str| merge_state(&ctx, &Decision::new(label, "")).intent;
        assert_eq!(intent("available_rooms"), ConversationIntent::ViewRooms);
        assert_eq!(intent("get_room_by_id"), ConversationIntent::ViewRooms);
        assert_eq!(intent("get_my_bookings"), ConversationIntent::BookRoom);
        assert_eq!(intent("update_own_account"), ConversationIntent::None);
        assert_eq!(intent("small_talk"), ConversationIntent::ViewRooms);
        assert_eq!(intent("whatever"), ConversationIntent::ViewRooms);
    }
}
