//! Turns a resolved, slot-complete decision into one typed backend call.

use chrono::NaiveDate;

use crate::errors::DispatchError;
use crate::models::{
    ActionRequest, AgentAction, BackendResponse, Decision, Identity, ProfileUpdate,
    RoomRef, RoomType,
};
use crate::state::AppState;

/// Tried in order against the whitespace-normalized value.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d%b%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

pub const NO_PAYMENT_LINK: &str = "Please proceed to payment to confirm your booking.";

pub fn parse_date(decision: &Decision, field: &'static str) -> Result<NaiveDate, DispatchError> {
    let value = decision.param(field).ok_or(DispatchError::MissingDate(field))?;
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
        .ok_or(DispatchError::InvalidDate { field, value })
}

/// Blank means no filter.
pub fn parse_room_type(decision: &Decision) -> Result<Option<RoomType>, DispatchError> {
    match decision.param("roomType") {
        None => Ok(None),
        Some(value) => RoomType::parse(&value)
            .map(Some)
            .ok_or(DispatchError::InvalidRoomType(value)),
    }
}

fn parse_number<T: std::str::FromStr>(
    decision: &Decision,
    field: &'static str,
) -> Result<T, DispatchError> {
    let value = decision
        .param(field)
        .ok_or(DispatchError::MissingNumber(field))?;
    value
        .trim()
        .parse()
        .map_err(|_| DispatchError::InvalidNumber { field, value })
}

/// `roomId`, then a well-formed `id`, then `roomNumber`.
pub fn room_ref(decision: &Decision) -> Result<RoomRef, DispatchError> {
    if decision.param("roomId").is_some() {
        return parse_number(decision, "roomId").map(RoomRef::Id);
    }
    if let Some(id) = decision.param("id").and_then(|v| v.trim().parse().ok()) {
        return Ok(RoomRef::Id(id));
    }
    if decision.param("roomNumber").is_some() {
        return parse_number(decision, "roomNumber").map(RoomRef::Number);
    }
    Err(DispatchError::MissingRoom)
}

pub fn build_request(action: AgentAction, decision: &Decision) -> Result<ActionRequest, DispatchError> {
    let request = match action {
        AgentAction::UpdateOwnAccount => ActionRequest::UpdateOwnAccount(ProfileUpdate {
            first_name: decision.param("firstName"),
            last_name: decision.param("lastName"),
            email: decision.param("email"),
            phone_number: decision.param("phoneNumber"),
            password: decision.param("password"),
        }),
        AgentAction::GetMyBookings => ActionRequest::GetMyBookings,
        AgentAction::AvailableRooms => ActionRequest::AvailableRooms {
            check_in: parse_date(decision, "checkInDate")?,
            check_out: parse_date(decision, "checkOutDate")?,
            room_type: parse_room_type(decision)?,
        },
        AgentAction::GetRoomById => ActionRequest::GetRoomById {
            id: parse_number(decision, "id")?,
        },
        AgentAction::CreateBooking => ActionRequest::CreateBooking {
            room: room_ref(decision)?,
            check_in: parse_date(decision, "checkInDate")?,
            check_out: parse_date(decision, "checkOutDate")?,
        },
        AgentAction::SmallTalk | AgentAction::Unknown => {
            return Err(DispatchError::NotDispatchable(action))
        }
    };
    Ok(request)
}

pub async fn dispatch(
    state: &AppState,
    identity: &Identity,
    request: ActionRequest,
) -> Result<BackendResponse, DispatchError> {
    tracing::debug!(action = request.action().as_str(), "dispatching");
    let response = match request {
        ActionRequest::UpdateOwnAccount(update) => {
            BackendResponse::User(state.accounts.update(identity, update).await?)
        }
        ActionRequest::GetMyBookings => {
            BackendResponse::Bookings(state.bookings.list_for(identity).await?)
        }
        ActionRequest::AvailableRooms {
            check_in,
            check_out,
            room_type,
        } => BackendResponse::Rooms(state.rooms.search(check_in, check_out, room_type).await?),
        ActionRequest::GetRoomById { id } => {
            BackendResponse::Room(state.rooms.get_by_id(id).await?)
        }
        ActionRequest::CreateBooking {
            room,
            check_in,
            check_out,
        } => {
            let room_id = match room {
                RoomRef::Id(id) => id,
                RoomRef::Number(number) => state
                    .rooms
                    .find_by_number(number)
                    .await?
                    .ok_or(DispatchError::RoomNotFound(number))?,
            };
            BackendResponse::Booking(
                state
                    .bookings
                    .create(identity, room_id, check_in, check_out)
                    .await?,
            )
        }
    };
    Ok(response)
}

/// Reply text for a successful dispatch.
pub fn build_reply(
    action: AgentAction,
    model_reply: Option<&str>,
    response: &BackendResponse,
    payment_url: &str,
) -> String {
    if let BackendResponse::Booking(booking) = response {
        let reference = &booking.reference;
        let total = booking.total_display();
        let pay = if payment_url.trim().is_empty() {
            NO_PAYMENT_LINK.to_string()
        } else {
            let sep = if payment_url.contains('?') { '&' } else { '?' };
            format!("[Pay now]({payment_url}{sep}bookingRef={reference}&amount={total})")
        };
        return format!("Booking created. Reference: {reference}, total: {total}. {pay}");
    }

    model_reply
        .map(str::to_string)
        .unwrap_or_else(|| action.default_reply().to_string())
}
