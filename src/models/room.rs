use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Single,
    Double,
    Suit,
    Triple,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Suit,
        RoomType::Triple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "SINGLE",
            RoomType::Double => "DOUBLE",
            RoomType::Suit => "SUIT",
            RoomType::Triple => "TRIPLE",
        }
    }

    /// Case-insensitive match against the closed set of room types.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub room_number: u32,
    pub room_type: RoomType,
    pub price_per_night_cents: i64,
    pub capacity: u32,
    pub description: Option<String>,
}
