use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationIntent {
    #[default]
    None,
    ViewRooms,
    BookRoom,
}

impl ConversationIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationIntent::None => "NONE",
            ConversationIntent::ViewRooms => "VIEW_ROOMS",
            ConversationIntent::BookRoom => "BOOK_ROOM",
        }
    }
}

/// Per-session working state carried between turns.
///
/// Dates are kept in whatever literal form they were found in; the
/// dispatcher parses them when an action actually needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub intent: ConversationIntent,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_number: Option<u32>,
    pub last_user: Option<String>,
    pub last_assistant: Option<String>,
}

impl ConversationContext {
    pub fn has_dates(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }
}

/// Slot state of a session, without any of the conversation text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSlots {
    pub intent: ConversationIntent,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_number: Option<u32>,
}

impl From<ConversationContext> for SessionSlots {
    fn from(ctx: ConversationContext) -> Self {
        Self {
            intent: ctx.intent,
            check_in: ctx.check_in,
            check_out: ctx.check_out,
            room_number: ctx.room_number,
        }
    }
}
