use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by the HTTP layer itself. Turn-level failures never
/// reach this type; they are folded into a reply by the agent.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("backend error: {0}")]
    Backend(#[from] HotelError),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Backend(HotelError::Unauthorized) => StatusCode::UNAUTHORIZED,
            AppError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failures reported by the room, booking, account and identity collaborators.
#[derive(Debug, thiserror::Error)]
pub enum HotelError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage unavailable")]
    StorageUnavailable,

    #[error("room not found")]
    RoomNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("room is not available for the selected date range")]
    RoomUnavailable,

    #[error("invalid booking dates: {0}")]
    InvalidDates(&'static str),

    #[error("login required")]
    Unauthorized,

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

/// Why a decision could not be turned into a backend call, or why the call failed.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("missing required date: {0}")]
    MissingDate(&'static str),

    #[error("invalid date format for {field}: {value:?}, use YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid roomType {0:?}, use one of: SINGLE, DOUBLE, SUIT, TRIPLE")]
    InvalidRoomType(String),

    #[error("missing required number: {0}")]
    MissingNumber(&'static str),

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("missing roomId, please specify the room")]
    MissingRoom,

    #[error("room not found for roomNumber {0}")]
    RoomNotFound(u32),

    #[error("{0:?} cannot be dispatched")]
    NotDispatchable(crate::models::AgentAction),

    #[error(transparent)]
    Hotel(#[from] HotelError),
}
