use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: i64,
    pub reference: String,
    pub room_id: i64,
    pub room_number: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_cents: i64,
    pub status: BookingStatus,
}

impl BookingSummary {
    pub fn total_display(&self) -> String {
        format_amount(self.total_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "checked_in" => BookingStatus::CheckedIn,
            "checked_out" => BookingStatus::CheckedOut,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Booked,
        }
    }
}

/// Renders integer cents as a plain decimal amount, e.g. `24000` -> `240.00`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
