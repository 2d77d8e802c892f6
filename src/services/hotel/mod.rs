//! Contracts for the hotel backend the agent drives. The agent only ever
//! talks to these traits; `sqlite` is the bundled implementation.

pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::HotelError;
use crate::models::{BookingSummary, Identity, ProfileUpdate, Room, RoomType, UserProfile};

#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn search(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    ) -> Result<Vec<Room>, HotelError>;

    async fn get_by_id(&self, id: i64) -> Result<Room, HotelError>;

    /// Room id for a public room number, if such a room exists.
    async fn find_by_number(&self, number: u32) -> Result<Option<i64>, HotelError>;
}

#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn create(
        &self,
        guest: &Identity,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<BookingSummary, HotelError>;

    async fn list_for(&self, guest: &Identity) -> Result<Vec<BookingSummary>, HotelError>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn update(&self, user: &Identity, update: ProfileUpdate) -> Result<UserProfile, HotelError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token; missing or unknown tokens are anonymous.
    async fn resolve(&self, token: Option<&str>) -> Result<Identity, HotelError>;
}

/// Check-in today or later, check-out strictly after check-in.
pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<(), HotelError> {
    if check_in < today {
        return Err(HotelError::InvalidDates("check in date cannot be before today"));
    }
    if check_out < check_in {
        return Err(HotelError::InvalidDates(
            "check out date cannot be before check in date",
        ));
    }
    if check_out == check_in {
        return Err(HotelError::InvalidDates(
            "check in date cannot be equal to check out date",
        ));
    }
    Ok(())
}
