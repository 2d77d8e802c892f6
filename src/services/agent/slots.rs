//! Slot-filling gate run before any backend action.

use crate::models::{AgentAction, ConversationContext, Decision};

pub const ASK_ROOM_AND_DATES: &str =
    "To book, tell me the room number and the check-in/check-out dates.";
pub const ASK_ROOM: &str = "Which room number should I book?";
pub const ASK_BOOKING_DATES: &str =
    "Please provide both check-in and check-out dates for the booking.";
pub const ASK_SEARCH_DATES: &str = "Share check-in and check-out dates to see available rooms.";

#[derive(Debug, Clone, PartialEq)]
pub enum SlotCheck {
    /// Every required slot is present; the decision can be dispatched.
    Ready(Decision),
    /// A slot is missing; reply with the question instead of dispatching.
    Missing {
        decision: Decision,
        question: &'static str,
    },
}

impl SlotCheck {
    /// The decision with context values folded into its params.
    pub fn decision(&self) -> &Decision {
        match self {
            SlotCheck::Ready(decision) | SlotCheck::Missing { decision, .. } => decision,
        }
    }
}

/// Copies context dates and room number into params the decision left empty.
pub fn fill_from_context(decision: &Decision, ctx: &ConversationContext) -> Decision {
    let mut filled = decision.clone();
    let candidates = [
        ("checkInDate", ctx.check_in.clone()),
        ("checkOutDate", ctx.check_out.clone()),
        ("roomNumber", ctx.room_number.map(|n| n.to_string())),
    ];
    for (key, value) in candidates {
        if let (None, Some(value)) = (filled.param(key), value) {
            filled = filled.with_param(key, value);
        }
    }
    filled
}

pub fn ensure_slots(decision: &Decision, action: AgentAction, ctx: &ConversationContext) -> SlotCheck {
    let decision = fill_from_context(decision, ctx);
    let has = |key: &str| decision.param(key).is_some();
    let has_dates = has("checkInDate") && has("checkOutDate");

    let question = match action {
        AgentAction::CreateBooking => {
            let has_room = has("roomId") || has("id") || has("roomNumber");
            let has_any_date = has("checkInDate") || has("checkOutDate");
            if !has_room && !has_any_date {
                Some(ASK_ROOM_AND_DATES)
            } else if !has_room {
                Some(ASK_ROOM)
            } else if !has_dates {
                Some(ASK_BOOKING_DATES)
            } else {
                None
            }
        }
        AgentAction::AvailableRooms if !has_dates => Some(ASK_SEARCH_DATES),
        _ => None,
    };

    match question {
        Some(question) => SlotCheck::Missing { decision, question },
        None => SlotCheck::Ready(decision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationIntent;

    fn ctx() -> ConversationContext {
        ConversationContext {
            intent: ConversationIntent::BookRoom,
            check_in: Some("2025-12-10".to_string()),
            check_out: Some("2025-12-12".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_fills_missing_params_only() {
        let decision = Decision::new("create_booking", "").with_param("checkInDate", "2026-01-01");
        let filled = fill_from_context(&decision, &ctx());
        assert_eq!(filled.param("checkInDate").as_deref(), Some("2026-01-01"));
        assert_eq!(filled.param("checkOutDate").as_deref(), Some("2025-12-12"));
        assert_eq!(filled.param("roomNumber"), None);
        assert_eq!(decision.param("checkOutDate"), None);
    }

    #[test]
    fn test_booking_missing_room() {
        let check = ensure_slots(&Decision::new("create_booking", ""), AgentAction::CreateBooking, &ctx());
        assert!(matches!(check, SlotCheck::Missing { question: ASK_ROOM, .. }));
    }

    #[test]
    fn test_booking_missing_everything() {
        let check = ensure_slots(
            &Decision::new("create_booking", ""),
            AgentAction::CreateBooking,
            &ConversationContext::default(),
        );
        assert!(matches!(check, SlotCheck::Missing { question: ASK_ROOM_AND_DATES, .. }));
    }

    #[test]
    fn test_booking_missing_one_date() {
        let decision = Decision::new("create_booking", "")
            .with_param("roomId", "4")
            .with_param("checkInDate", "2025-12-10");
        let check = ensure_slots(&decision, AgentAction::CreateBooking, &ConversationContext::default());
        assert!(matches!(check, SlotCheck::Missing { question: ASK_BOOKING_DATES, .. }));
    }

    #[test]
    fn test_booking_ready_with_context_room() {
        let mut ctx = ctx();
        ctx.room_number = Some(105);
        let check = ensure_slots(&Decision::new("create_booking", ""), AgentAction::CreateBooking, &ctx);
        match check {
            SlotCheck::Ready(d) => assert_eq!(d.param("roomNumber").as_deref(), Some("105")),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn test_search_needs_both_dates() {
        let mut ctx = ctx();
        ctx.check_out = None;
        let check = ensure_slots(&Decision::new("available_rooms", ""), AgentAction::AvailableRooms, &ctx);
        assert!(matches!(check, SlotCheck::Missing { question: ASK_SEARCH_DATES, .. }));
    }

    #[test]
    fn test_other_actions_pass_through() {
        let check = ensure_slots(
            &Decision::new("get_my_bookings", ""),
            AgentAction::GetMyBookings,
            &ConversationContext::default(),
        );
        assert!(matches!(check, SlotCheck::Ready(_)));
    }

    #[test]
    fn test_gate_is_idempotent() {
        let decision = Decision::new("create_booking", "").with_param("roomNumber", "105");
        let ctx = ConversationContext::default();
        let first = ensure_slots(&decision, AgentAction::CreateBooking, &ctx);
        let second = ensure_slots(first.decision(), AgentAction::CreateBooking, &ctx);
        assert_eq!(first, second);
    }
}
