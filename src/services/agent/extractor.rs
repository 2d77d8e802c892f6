//! Pattern-based slot extraction over raw chat text.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::models::{ChatMessage, ConversationContext, ConversationIntent};

/// ISO, `D/M/YYYY`, `D-M-YYYY` and `D MonthName YYYY`, in that match priority.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2}\s*[A-Za-z]{3,9}\s*\d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4}|\d{1,2}-\d{1,2}-\d{4})",
    )
    .unwrap()
});

static ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)room\s*(?:number\s*)?(\d{1,5})").unwrap());

static BARE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{3,5})\b").unwrap());

/// Up to two date strings, in the literal form they appear in `text`.
///
/// "tomorrow" and "today"/"tonight" win over explicit dates and expand to a
/// one-night stay starting on that day.
pub fn extract_dates(text: &str, today: NaiveDate) -> Vec<String> {
    let lower = text.to_lowercase();
    let relative_start = if lower.contains("tomorrow") {
        today.checked_add_days(Days::new(1))
    } else if lower.contains("today") || lower.contains("tonight") {
        Some(today)
    } else {
        None
    };

    if let Some(start) = relative_start {
        return match start.checked_add_days(Days::new(1)) {
            Some(end) => vec![start.to_string(), end.to_string()],
            None => vec![start.to_string()],
        };
    }

    DATE_RE
        .find_iter(text)
        .take(2)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Room number from "room 105" / "room number 105", else the first
/// free-standing 3-5 digit number that is not part of a date.
pub fn extract_room_number(text: &str) -> Option<u32> {
    if let Some(caps) = ROOM_RE.captures(text) {
        if let Some(n) = caps[1].parse::<u32>().ok().filter(|n| *n > 0) {
            return Some(n);
        }
    }

    let without_dates = DATE_RE.replace_all(text, " ");
    BARE_NUMBER_RE
        .captures(&without_dates)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// Signals present in a single message, shared by context derivation and
/// the heuristic engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signals {
    pub mentions_rooms: bool,
    pub mentions_book: bool,
    pub mentions_reserve: bool,
    pub same_dates: bool,
    pub book_this: bool,
    pub booking_history: bool,
}

impl Signals {
    pub fn of(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
        Self {
            mentions_rooms: has(&["available", "rooms"]),
            mentions_book: has(&["book"]),
            mentions_reserve: has(&["reserve"]),
            same_dates: has(&["same date", "same day", "same dates"]),
            book_this: has(&["book this", "book one", "book on same date"]),
            booking_history: has(&["my booking", "my reservation"]),
        }
    }
}

/// Builds a fresh context from the turn's transcript, oldest message first.
///
/// Intent follows the latest message that carries a signal; dates and the
/// room number keep the first value seen.
pub fn derive_context(messages: &[ChatMessage], today: NaiveDate) -> ConversationContext {
    let mut ctx = ConversationContext::default();

    for message in messages {
        if !message.content.trim().is_empty() {
            if message.is_assistant() {
                ctx.last_assistant = Some(message.content.clone());
            }
            if message.is_user() {
                ctx.last_user = Some(message.content.clone());
            }
        }

        let signals = Signals::of(&message.content);
        if signals.mentions_rooms {
            ctx.intent = ConversationIntent::ViewRooms;
        }
        if signals.mentions_book {
            ctx.intent = ConversationIntent::BookRoom;
        }

        fill_slots_from(&mut ctx, &message.content, today);
    }

    ctx
}

/// Fills dates and room number from `text` where the context has none yet.
pub fn fill_slots_from(ctx: &mut ConversationContext, text: &str, today: NaiveDate) {
    let mut dates = extract_dates(text, today).into_iter();
    if let Some(first) = dates.next() {
        ctx.check_in.get_or_insert(first);
    }
    if let Some(second) = dates.next() {
        ctx.check_out.get_or_insert(second);
    }
    if let Some(room) = extract_room_number(text) {
        ctx.room_number.get_or_insert(room);
    }
}
