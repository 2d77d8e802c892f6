use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use super::{validate_stay, AccountService, BookingLedger, IdentityProvider, RoomDirectory};
use crate::db::queries::{self, NewBooking};
use crate::errors::HotelError;
use crate::models::{BookingSummary, Identity, ProfileUpdate, Room, RoomType, UserProfile};

/// Hotel backend over the local SQLite database.
#[derive(Clone)]
pub struct SqliteHotel {
    db: Arc<Mutex<Connection>>,
}

impl SqliteHotel {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, HotelError> {
        self.db.lock().map_err(|_| HotelError::StorageUnavailable)
    }

    /// Registers (or re-keys) a guest so requests bearing `api_token` act as them.
    pub fn register_guest(&self, email: &str, api_token: &str) -> Result<i64, HotelError> {
        let conn = self.conn()?;
        Ok(queries::upsert_user(&conn, email, api_token)?)
    }
}

fn require_user(guest: &Identity) -> Result<i64, HotelError> {
    guest.user_id().ok_or(HotelError::Unauthorized)
}

#[cfg(not(test))]
const PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const PASSWORD_COST: u32 = 4;

async fn hash_password(password: String) -> Result<String, HotelError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_COST))
        .await
        .map_err(|_| HotelError::StorageUnavailable)?
        .map_err(HotelError::from)
}

fn booking_reference() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_ascii_uppercase()
}

#[async_trait]
impl RoomDirectory for SqliteHotel {
    async fn search(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    ) -> Result<Vec<Room>, HotelError> {
        validate_stay(check_in, check_out, Local::now().date_naive())?;
        let conn = self.conn()?;
        Ok(queries::list_available_rooms(&conn, check_in, check_out, room_type)?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Room, HotelError> {
        let conn = self.conn()?;
        queries::get_room(&conn, id)?.ok_or(HotelError::RoomNotFound)
    }

    async fn find_by_number(&self, number: u32) -> Result<Option<i64>, HotelError> {
        let conn = self.conn()?;
        Ok(queries::find_room_id_by_number(&conn, number)?)
    }
}

#[async_trait]
impl BookingLedger for SqliteHotel {
    async fn create(
        &self,
        guest: &Identity,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<BookingSummary, HotelError> {
        let user_id = require_user(guest)?;
        validate_stay(check_in, check_out, Local::now().date_naive())?;

        let conn = self.conn()?;
        let room = queries::get_room(&conn, room_id)?.ok_or(HotelError::RoomNotFound)?;
        if !queries::is_room_available(&conn, room_id, check_in, check_out)? {
            return Err(HotelError::RoomUnavailable);
        }

        let nights = (check_out - check_in).num_days();
        let reference = booking_reference();
        let booking = queries::create_booking(
            &conn,
            &NewBooking {
                reference: &reference,
                user_id,
                room_id,
                check_in,
                check_out,
                total_cents: nights * room.price_per_night_cents,
            },
        )?;

        tracing::info!(
            reference = %booking.reference,
            room_number = booking.room_number,
            nights,
            "booking created"
        );
        Ok(booking)
    }

    async fn list_for(&self, guest: &Identity) -> Result<Vec<BookingSummary>, HotelError> {
        let user_id = require_user(guest)?;
        let conn = self.conn()?;
        Ok(queries::get_bookings_for_user(&conn, user_id)?)
    }
}

#[async_trait]
impl AccountService for SqliteHotel {
    async fn update(&self, user: &Identity, update: ProfileUpdate) -> Result<UserProfile, HotelError> {
        let user_id = require_user(user)?;
        let password_hash = match update.password.clone() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let conn = self.conn()?;
        if !update.is_empty()
            && !queries::update_user(&conn, user_id, &update, password_hash.as_deref())?
        {
            return Err(HotelError::UserNotFound);
        }
        queries::get_user(&conn, user_id)?.ok_or(HotelError::UserNotFound)
    }
}

#[async_trait]
impl IdentityProvider for SqliteHotel {
    async fn resolve(&self, token: Option<&str>) -> Result<Identity, HotelError> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Identity::Anonymous);
        };
        let conn = self.conn()?;
        Ok(match queries::get_user_by_token(&conn, token)? {
            Some((id, email)) => Identity::User { id, email },
            None => Identity::Anonymous,
        })
    }
}
