//! Rule-based decisions that avoid, or stand in for, the remote model.

use chrono::NaiveDate;

use super::extractor::{fill_slots_from, Signals};
use super::slots::{ASK_BOOKING_DATES, ASK_ROOM, ASK_ROOM_AND_DATES, ASK_SEARCH_DATES};
use crate::models::{ConversationContext, ConversationIntent, Decision};

pub const GREETING_REPLY: &str =
    "Hi! Tell me if you want available rooms, to book, or to view your bookings.";
pub const ASK_ROOM_FOR_SAME_DATES: &str =
    "Sure, which room number would you like to book for those dates?";

/// First matching rule wins; `None` means the heuristics have nothing to say.
pub fn heuristic_decision(
    ctx: &ConversationContext,
    latest: Option<&str>,
    today: NaiveDate,
) -> Option<Decision> {
    let content = latest.map(str::trim).filter(|c| !c.is_empty())?;

    if is_greeting(content) {
        return Some(Decision::new("small_talk", GREETING_REPLY));
    }

    let signals = Signals::of(content);
    if signals.booking_history {
        return Some(Decision::new("get_my_bookings", "Here are your bookings."));
    }

    if let Some(decision) = ready_decision(ctx) {
        return Some(decision);
    }

    let mut working = ctx.clone();
    if signals.mentions_book || signals.mentions_reserve {
        working.intent = ConversationIntent::BookRoom;
    } else if signals.mentions_rooms {
        working.intent = ConversationIntent::ViewRooms;
    }
    fill_slots_from(&mut working, content, today);

    if let Some(decision) = ready_decision(&working) {
        return Some(decision);
    }

    match working.intent {
        ConversationIntent::BookRoom
            if working.has_dates() && (signals.same_dates || signals.book_this) =>
        {
            // A known room would already have produced a booking above.
            Some(Decision::new("small_talk", ASK_ROOM_FOR_SAME_DATES))
        }
        ConversationIntent::ViewRooms if !working.has_dates() => {
            Some(Decision::new("small_talk", ASK_SEARCH_DATES))
        }
        ConversationIntent::BookRoom => {
            let ask = match (working.room_number.is_some(), working.has_dates()) {
                (false, false) => ASK_ROOM_AND_DATES,
                (false, true) => ASK_ROOM,
                (true, _) => ASK_BOOKING_DATES,
            };
            Some(Decision::new("small_talk", ask))
        }
        _ => None,
    }
}

fn is_greeting(content: &str) -> bool {
    matches!(content.to_lowercase().as_str(), "hi" | "hello" | "hey")
}

/// An actionable decision when the context already holds every slot.
fn ready_decision(ctx: &ConversationContext) -> Option<Decision> {
    let (check_in, check_out) = match (&ctx.check_in, &ctx.check_out) {
        (Some(a), Some(b)) => (a, b),
        _ => return None,
    };

    match (ctx.intent, ctx.room_number) {
        (ConversationIntent::ViewRooms, _) => Some(
            Decision::new(
                "available_rooms",
                format!("Searching available rooms from {check_in} to {check_out}."),
            )
            .with_param("checkInDate", check_in.as_str())
            .with_param("checkOutDate", check_out.as_str()),
        ),
        (ConversationIntent::BookRoom, Some(room)) => Some(
            Decision::new(
                "create_booking",
                format!("Booking requested for room {room} from {check_in} to {check_out}."),
            )
            .with_param("roomNumber", room.to_string())
            .with_param("checkInDate", check_in.as_str())
            .with_param("checkOutDate", check_out.as_str()),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()
    }

    fn dated(intent: ConversationIntent) -> ConversationContext {
        ConversationContext {
            intent,
            check_in: Some("2025-12-10".to_string()),
            check_out: Some("2025-12-12".to_string()),
            ..Default::default()
        }
    }

    fn run(ctx: &ConversationContext, msg: &str) -> Option<Decision> {
        heuristic_decision(ctx, Some(msg), today())
    }

    #[test]
    fn test_greetings_any_case() {
        for greeting in ["hi", "Hello", "HEY", "  hey "] {
            let d = run(&dated(ConversationIntent::ViewRooms), greeting).unwrap();
            assert_eq!(d.label(), "small_talk");
            assert_eq!(d.response.as_deref(), Some(GREETING_REPLY));
        }
    }

    #[test]
    fn test_greeting_must_be_whole_message() {
        let d = run(&ConversationContext::default(), "hi there");
        assert!(d.is_none());
    }

    #[test]
    fn test_blank_message_yields_nothing() {
        assert!(heuristic_decision(&ConversationContext::default(), Some("   "), today()).is_none());
        assert!(heuristic_decision(&ConversationContext::default(), None, today()).is_none());
    }

    #[test]
    fn test_known_view_intent_searches() {
        let d = run(&dated(ConversationIntent::ViewRooms), "ok").unwrap();
        assert_eq!(d.label(), "available_rooms");
        assert_eq!(d.param("checkInDate").as_deref(), Some("2025-12-10"));
        assert_eq!(d.param("checkOutDate").as_deref(), Some("2025-12-12"));
        assert_eq!(
            d.response.as_deref(),
            Some("Searching available rooms from 2025-12-10 to 2025-12-12.")
        );
    }

    #[test]
    fn test_room_from_latest_message_completes_booking() {
        let d = run(&dated(ConversationIntent::BookRoom), "room 105 please").unwrap();
        assert_eq!(d.label(), "create_booking");
        assert_eq!(d.param("roomNumber").as_deref(), Some("105"));
        assert_eq!(d.param("checkInDate").as_deref(), Some("2025-12-10"));
    }

    #[test]
    fn test_same_dates_without_room_asks_for_room() {
        // The turn's own "book" already moved the merged intent to BookRoom.
        let d = run(&dated(ConversationIntent::BookRoom), "book on same date").unwrap();
        assert_eq!(d.label(), "small_talk");
        assert_eq!(d.response.as_deref(), Some(ASK_ROOM_FOR_SAME_DATES));
    }

    #[test]
    fn test_book_with_dates_but_no_continuation_asks_room() {
        let d = run(&dated(ConversationIntent::None), "reserve please").unwrap();
        assert_eq!(d.response.as_deref(), Some(ASK_ROOM));
    }

    #[test]
    fn test_view_without_dates_asks_dates() {
        let d = run(&ConversationContext::default(), "show me rooms").unwrap();
        assert_eq!(d.response.as_deref(), Some(ASK_SEARCH_DATES));
    }

    #[test]
    fn test_view_with_tomorrow() {
        let d = run(&ConversationContext::default(), "available tomorrow?").unwrap();
        assert_eq!(d.label(), "available_rooms");
        assert_eq!(d.param("checkInDate").as_deref(), Some("2025-12-01"));
        assert_eq!(d.param("checkOutDate").as_deref(), Some("2025-12-02"));
    }

    #[test]
    fn test_book_slot_questions() {
        let empty = ConversationContext::default();
        assert_eq!(
            run(&empty, "I want to book").unwrap().response.as_deref(),
            Some(ASK_ROOM_AND_DATES)
        );
        assert_eq!(
            run(&empty, "book room 204").unwrap().response.as_deref(),
            Some(ASK_BOOKING_DATES)
        );
        assert_eq!(
            run(&empty, "book from 2025-12-10").unwrap().response.as_deref(),
            Some(ASK_ROOM_AND_DATES)
        );
    }

    #[test]
    fn test_booking_history_request() {
        let d = run(&ConversationContext::default(), "show my bookings").unwrap();
        assert_eq!(d.label(), "get_my_bookings");
    }

    #[test]
    fn test_unrelated_message_falls_through() {
        assert!(run(&ConversationContext::default(), "what time is breakfast?").is_none());
    }

    #[test]
    fn test_context_is_not_mutated() {
        let ctx = ConversationContext::default();
        let _ = run(&ctx, "book room 204 on 2025-12-10 to 2025-12-12");
        assert_eq!(ctx, ConversationContext::default());
    }
}
