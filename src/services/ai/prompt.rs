use crate::models::{ChatMessage, ConversationContext};

/// Fills the decision prompt in one pass, so text inside the transcript is
/// never treated as a placeholder.
fn render_prompt(hotel: &str, transcript: &str, latest: &str) -> String {
    format!(
        r#"You are an AI booking assistant for {hotel} (hotel/resort). Purpose: hotel room discovery, availability checking, and booking. You must infer intent from casual language and perform slot-filling (intent, roomNumber, checkInDate, checkOutDate). Keep context from prior turns; do NOT re-ask for slots already provided. Return ONLY one JSON.

Allowed actions + params:
- update_own_account: {{firstName?, lastName?, email?, phoneNumber?, password?}}
- get_my_bookings: {{}}
- available_rooms: {{checkInDate (YYYY-MM-DD), checkOutDate (YYYY-MM-DD), roomType? in [SINGLE, DOUBLE, SUIT, TRIPLE]}}
- get_room_by_id: {{id (number)}}
- create_booking: {{roomId (number) or roomNumber (number), checkInDate (YYYY-MM-DD), checkOutDate (YYYY-MM-DD)}}
Disallowed: deleteOwnAccount, addRoom, any admin-only op.

Guidelines:
- Understand generic asks like "rooms", "show rooms", "available rooms" without requiring perfect sentences.
- Reuse dates/room intent already mentioned in conversation; do NOT ask again if known.
- If booking slots are missing, ask ONLY for the missing ones (e.g. if dates known, ask for roomNumber).
- If availability dates are missing, ask once for both dates.
- If the user says "book on same date"/"book this"/"book one"/"reserve a room" after viewing rooms, reuse the last known dates; only ask for room number if missing.
- Avoid repetitive wording; be concise and specific.
- If action not allowed, set action "small_talk" with a brief refusal.
- If unclear, use "small_talk" with a short, specific clarifying question.

Respond with exactly:
{{"action":"<allowed_or_small_talk>","params":{{...}},"response":"<short user-facing reply>"}}

Conversation so far:
{transcript}
Latest user message: "{latest}"
"#
    )
}

/// Renders the model prompt from the transcript and the merged context.
pub fn build_prompt(hotel_name: &str, messages: &[ChatMessage], ctx: &ConversationContext) -> String {
    let fallback = [ChatMessage::user("Help me book a room")];
    let messages = if messages.is_empty() {
        &fallback[..]
    } else {
        messages
    };

    let mut transcript: String = messages
        .iter()
        .map(|m| format!("{}: {}\n", m.role, m.content))
        .collect();

    transcript.push_str(&format!(
        "Context:\nintent: {}\ncheckInDate: {}\ncheckOutDate: {}\nroomNumber: {}\nlastUser: {}\nlastAssistant: {}",
        ctx.intent.as_str(),
        or_null(ctx.check_in.as_deref()),
        or_null(ctx.check_out.as_deref()),
        ctx.room_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string()),
        or_null(ctx.last_user.as_deref()),
        or_null(ctx.last_assistant.as_deref()),
    ));

    let latest = messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    render_prompt(hotel_name, &transcript, latest)
}

fn or_null(value: Option<&str>) -> &str {
    value.unwrap_or("null")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationIntent;

    #[test]
    fn test_prompt_contains_transcript_and_context() {
        let ctx = ConversationContext {
            intent: ConversationIntent::BookRoom,
            check_in: Some("2025-12-10".to_string()),
            room_number: Some(105),
            ..Default::default()
        };
        let messages = vec![
            ChatMessage::user("rooms on 2025-12-10"),
            ChatMessage::assistant("Which dates?"),
            ChatMessage::user("book 105"),
        ];
        let prompt = build_prompt("Test Inn", &messages, &ctx);

        assert!(prompt.contains("booking assistant for Test Inn"));
        assert!(prompt.contains("user: rooms on 2025-12-10\nassistant: Which dates?\n"));
        assert!(prompt.contains("intent: BOOK_ROOM"));
        assert!(prompt.contains("checkOutDate: null"));
        assert!(prompt.contains("roomNumber: 105"));
        assert!(prompt.contains("Latest user message: \"book 105\""));
    }

    #[test]
    fn test_placeholder_text_in_messages_is_literal() {
        let messages = vec![ChatMessage::user("what does {latest} or {hotel} mean?")];
        let prompt = build_prompt("Test Inn", &messages, &ConversationContext::default());
        assert!(prompt.contains("user: what does {latest} or {hotel} mean?\n"));
        assert!(prompt.contains("Latest user message: \"what does {latest} or {hotel} mean?\""));
        assert!(prompt.contains("{\"action\":\"<allowed_or_small_talk>\",\"params\":{...}"));
    }

    #[test]
    fn test_empty_transcript_gets_default_request() {
        let prompt = build_prompt("Test Inn", &[], &ConversationContext::default());
        assert!(prompt.contains("user: Help me book a room"));
        assert!(prompt.contains("Latest user message: \"Help me book a room\""));
    }
}
