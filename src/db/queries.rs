use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{BookingStatus, BookingSummary, ProfileUpdate, Room, RoomType, UserProfile};

// ── Rooms ──

const ROOM_COLUMNS: &str =
    "id, room_number, room_type, price_per_night_cents, capacity, description";

fn parse_room_row(row: &Row) -> rusqlite::Result<Room> {
    let type_str: String = row.get(2)?;
    let room_type = RoomType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown room type: {type_str}").into(),
        )
    })?;

    Ok(Room {
        id: row.get(0)?,
        room_number: row.get(1)?,
        room_type,
        price_per_night_cents: row.get(3)?,
        capacity: row.get(4)?,
        description: row.get(5)?,
    })
}

pub fn get_room(conn: &Connection, id: i64) -> rusqlite::Result<Option<Room>> {
    conn.query_row(
        &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
        params![id],
        parse_room_row,
    )
    .optional()
}

pub fn find_room_id_by_number(conn: &Connection, number: u32) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM rooms WHERE room_number = ?1",
        params![number],
        |row| row.get(0),
    )
    .optional()
}

/// Rooms with no active booking overlapping `[check_in, check_out)`.
pub fn list_available_rooms(
    conn: &Connection,
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_type: Option<RoomType>,
) -> rusqlite::Result<Vec<Room>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms r
         WHERE (?3 IS NULL OR r.room_type = ?3)
           AND NOT EXISTS (
               SELECT 1 FROM bookings b
               WHERE b.room_id = r.id
                 AND b.status != 'cancelled'
                 AND b.check_in < ?2
                 AND b.check_out > ?1
           )
         ORDER BY r.room_number ASC"
    ))?;

    let rows = stmt.query_map(
        params![check_in, check_out, room_type.map(|t| t.as_str())],
        parse_room_row,
    )?;

    rows.collect()
}

pub fn is_room_available(
    conn: &Connection,
    room_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) = 0 FROM bookings
         WHERE room_id = ?1 AND status != 'cancelled' AND check_in < ?3 AND check_out > ?2",
        params![room_id, check_in, check_out],
        |row| row.get(0),
    )
}

// ── Bookings ──

pub struct NewBooking<'a> {
    pub reference: &'a str,
    pub user_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_cents: i64,
}

const BOOKING_COLUMNS: &str = "b.id, b.reference, b.room_id, r.room_number, b.check_in, b.check_out, b.total_cents, b.status";

fn parse_booking_row(row: &Row) -> rusqlite::Result<BookingSummary> {
    let status: String = row.get(7)?;
    Ok(BookingSummary {
        id: row.get(0)?,
        reference: row.get(1)?,
        room_id: row.get(2)?,
        room_number: row.get(3)?,
        check_in: row.get(4)?,
        check_out: row.get(5)?,
        total_cents: row.get(6)?,
        status: BookingStatus::parse(&status),
    })
}

pub fn create_booking(conn: &Connection, booking: &NewBooking) -> rusqlite::Result<BookingSummary> {
    conn.execute(
        "INSERT INTO bookings (reference, user_id, room_id, check_in, check_out, total_cents, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking.reference,
            booking.user_id,
            booking.room_id,
            booking.check_in,
            booking.check_out,
            booking.total_cents,
            BookingStatus::Booked.as_str(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings b JOIN rooms r ON r.id = b.room_id WHERE b.id = ?1"
        ),
        params![id],
        parse_booking_row,
    )
}

pub fn get_bookings_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<BookingSummary>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings b JOIN rooms r ON r.id = b.room_id
         WHERE b.user_id = ?1 ORDER BY b.id DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], parse_booking_row)?;
    rows.collect()
}

// ── Users ──

pub fn get_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT id, first_name, last_name, email, phone_number FROM users WHERE id = ?1",
        params![id],
        |row| {
            Ok(UserProfile {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
                phone_number: row.get(4)?,
            })
        },
    )
    .optional()
}

pub fn get_user_by_token(conn: &Connection, token: &str) -> rusqlite::Result<Option<(i64, String)>> {
    conn.query_row(
        "SELECT id, email FROM users WHERE api_token = ?1",
        params![token],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// Creates the user if the email is new, otherwise rotates its token.
pub fn upsert_user(conn: &Connection, email: &str, api_token: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (email, api_token) VALUES (?1, ?2)
         ON CONFLICT(email) DO UPDATE SET api_token = excluded.api_token",
        params![email, api_token],
    )?;
    conn.query_row(
        "SELECT id FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
}

/// Applies the provided fields only; returns false if the user does not exist.
/// `password_hash` must already be a bcrypt hash.
pub fn update_user(
    conn: &Connection,
    id: i64,
    update: &ProfileUpdate,
    password_hash: Option<&str>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE users SET
            first_name = COALESCE(?2, first_name),
            last_name = COALESCE(?3, last_name),
            email = COALESCE(?4, email),
            phone_number = COALESCE(?5, phone_number),
            password_hash = COALESCE(?6, password_hash)
         WHERE id = ?1",
        params![
            id,
            update.first_name,
            update.last_name,
            update.email,
            update.phone_number,
            password_hash,
        ],
    )?;
    Ok(changed > 0)
}

pub fn get_password_hash(conn: &Connection, id: i64) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT password_hash FROM users WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn book(conn: &Connection, reference: &str, user_id: i64, room_number: u32, ci: &str, co: &str) {
        let room_id = find_room_id_by_number(conn, room_number).unwrap().unwrap();
        create_booking(
            conn,
            &NewBooking {
                reference,
                user_id,
                room_id,
                check_in: d(ci),
                check_out: d(co),
                total_cents: 100,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_seeded_rooms_lookup() {
        let conn = setup_db();
        let id = find_room_id_by_number(&conn, 105).unwrap().unwrap();
        let room = get_room(&conn, id).unwrap().unwrap();
        assert_eq!(room.room_type, RoomType::Double);
        assert_eq!(find_room_id_by_number(&conn, 999).unwrap(), None);
    }

    #[test]
    fn test_overlapping_booking_hides_room() {
        let conn = setup_db();
        let user = upsert_user(&conn, "guest@example.com", "t1").unwrap();
        book(&conn, "REF1", user, 105, "2025-12-10", "2025-12-12");

        let rooms = list_available_rooms(&conn, d("2025-12-11"), d("2025-12-13"), None).unwrap();
        assert!(rooms.iter().all(|r| r.room_number != 105));
        assert_eq!(rooms.len(), 4);

        // Checkout day is free again.
        let rooms = list_available_rooms(&conn, d("2025-12-12"), d("2025-12-14"), None).unwrap();
        assert!(rooms.iter().any(|r| r.room_number == 105));
    }

    #[test]
    fn test_room_type_filter() {
        let conn = setup_db();
        let rooms =
            list_available_rooms(&conn, d("2025-12-10"), d("2025-12-12"), Some(RoomType::Single))
                .unwrap();
        assert_eq!(rooms.len(), 2);
        assert!(rooms.iter().all(|r| r.room_type == RoomType::Single));
    }

    #[test]
    fn test_bookings_for_user_newest_first() {
        let conn = setup_db();
        let user = upsert_user(&conn, "guest@example.com", "t1").unwrap();
        let other = upsert_user(&conn, "other@example.com", "t2").unwrap();
        book(&conn, "REF1", user, 101, "2025-12-10", "2025-12-12");
        book(&conn, "REF2", user, 203, "2025-12-20", "2025-12-22");
        book(&conn, "REF3", other, 204, "2025-12-20", "2025-12-22");

        let bookings = get_bookings_for_user(&conn, user).unwrap();
        let refs: Vec<_> = bookings.iter().map(|b| b.reference.as_str()).collect();
        assert_eq!(refs, vec!["REF2", "REF1"]);
        assert_eq!(bookings[0].room_number, 203);
    }

    #[test]
    fn test_update_user_keeps_unset_fields() {
        let conn = setup_db();
        let id = upsert_user(&conn, "guest@example.com", "t1").unwrap();
        let update = ProfileUpdate {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert!(update_user(&conn, id, &update, None).unwrap());
        let update = ProfileUpdate {
            phone_number: Some("555-0100".to_string()),
            ..Default::default()
        };
        assert!(update_user(&conn, id, &update, None).unwrap());

        let user = get_user(&conn, id).unwrap().unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.phone_number.as_deref(), Some("555-0100"));
        assert_eq!(user.email, "guest@example.com");
        assert!(!update_user(&conn, 9999, &update, None).unwrap());
    }

    #[test]
    fn test_token_lookup() {
        let conn = setup_db();
        let id = upsert_user(&conn, "guest@example.com", "secret").unwrap();
        assert_eq!(
            get_user_by_token(&conn, "secret").unwrap(),
            Some((id, "guest@example.com".to_string()))
        );
        assert_eq!(get_user_by_token(&conn, "nope").unwrap(), None);
    }
}
