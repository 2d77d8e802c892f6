use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookingSummary, ProfileUpdate, Room, RoomType, UserProfile};

/// The closed set of actions the dispatcher accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentAction {
    UpdateOwnAccount,
    GetMyBookings,
    AvailableRooms,
    GetRoomById,
    CreateBooking,
    SmallTalk,
    Unknown,
}

impl AgentAction {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "UPDATE_OWN_ACCOUNT" | "UPDATE_ACCOUNT" => AgentAction::UpdateOwnAccount,
            "GET_MY_BOOKINGS" | "GET_ALL_MY_BOOKINGS" | "GET_BOOKINGS" => {
                AgentAction::GetMyBookings
            }
            "AVAILABLE_ROOMS" | "GET_AVAILABLE_ROOMS" => AgentAction::AvailableRooms,
            "GET_ROOM_BY_ID" | "ROOM_DETAILS" => AgentAction::GetRoomById,
            "CREATE_BOOKING" | "BOOK_ROOM" | "BOOKROOM" => AgentAction::CreateBooking,
            "SMALL_TALK" => AgentAction::SmallTalk,
            _ => AgentAction::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::UpdateOwnAccount => "UPDATE_OWN_ACCOUNT",
            AgentAction::GetMyBookings => "GET_MY_BOOKINGS",
            AgentAction::AvailableRooms => "AVAILABLE_ROOMS",
            AgentAction::GetRoomById => "GET_ROOM_BY_ID",
            AgentAction::CreateBooking => "CREATE_BOOKING",
            AgentAction::SmallTalk => "SMALL_TALK",
            AgentAction::Unknown => "UNKNOWN",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            AgentAction::UpdateOwnAccount | AgentAction::GetMyBookings | AgentAction::CreateBooking
        )
    }

    /// Actions answered with text only, never dispatched.
    pub fn is_conversational(&self) -> bool {
        matches!(self, AgentAction::SmallTalk | AgentAction::Unknown)
    }

    pub fn default_reply(&self) -> &'static str {
        match self {
            AgentAction::UpdateOwnAccount => "Your account was updated.",
            AgentAction::GetMyBookings => "Here are your bookings.",
            AgentAction::AvailableRooms => "Here are the available rooms.",
            AgentAction::GetRoomById => "Here are the room details.",
            AgentAction::CreateBooking => "Your booking request was processed.",
            AgentAction::SmallTalk | AgentAction::Unknown => "Done.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomRef {
    Id(i64),
    Number(u32),
}

/// A fully validated backend call, one variant per dispatchable action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    UpdateOwnAccount(ProfileUpdate),
    GetMyBookings,
    AvailableRooms {
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    },
    GetRoomById {
        id: i64,
    },
    CreateBooking {
        room: RoomRef,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

impl ActionRequest {
    pub fn action(&self) -> AgentAction {
        match self {
            ActionRequest::UpdateOwnAccount(_) => AgentAction::UpdateOwnAccount,
            ActionRequest::GetMyBookings => AgentAction::GetMyBookings,
            ActionRequest::AvailableRooms { .. } => AgentAction::AvailableRooms,
            ActionRequest::GetRoomById { .. } => AgentAction::GetRoomById,
            ActionRequest::CreateBooking { .. } => AgentAction::CreateBooking,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum BackendResponse {
    Rooms(Vec<Room>),
    Room(Room),
    Booking(BookingSummary),
    Bookings(Vec<BookingSummary>),
    User(UserProfile),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_aliases() {
        assert_eq!(AgentAction::from_label("book_room"), AgentAction::CreateBooking);
        assert_eq!(AgentAction::from_label(" BookRoom "), AgentAction::CreateBooking);
        assert_eq!(AgentAction::from_label("get_available_rooms"), AgentAction::AvailableRooms);
        assert_eq!(AgentAction::from_label("Room_Details"), AgentAction::GetRoomById);
        assert_eq!(AgentAction::from_label("get_all_my_bookings"), AgentAction::GetMyBookings);
        assert_eq!(AgentAction::from_label("update_account"), AgentAction::UpdateOwnAccount);
        assert_eq!(AgentAction::from_label("small_talk"), AgentAction::SmallTalk);
        assert_eq!(AgentAction::from_label("delete_everything"), AgentAction::Unknown);
        assert_eq!(AgentAction::from_label(""), AgentAction::Unknown);
    }

    #[test]
    fn test_auth_required_actions() {
        assert!(AgentAction::CreateBooking.requires_auth());
        assert!(AgentAction::GetMyBookings.requires_auth());
        assert!(AgentAction::UpdateOwnAccount.requires_auth());
        assert!(!AgentAction::AvailableRooms.requires_auth());
        assert!(!AgentAction::GetRoomById.requires_auth());
    }

    #[test]
    fn test_action_serializes_screaming_snake() {
        let json = serde_json::to_string(&AgentAction::CreateBooking).unwrap();
        assert_eq!(json, "\"CREATE_BOOKING\"");
    }
}
