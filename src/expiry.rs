use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

/// Window used by the recipe engine to flag an ingredient as expiring.
pub const RECIPE_EXPIRING_DAYS: i64 = 5;
/// Window used by fridge statistics.
pub const STATS_EXPIRING_DAYS: i64 = 5;
/// Default look-ahead for expiry reminders.
pub const REMINDER_EXPIRING_DAYS: i64 = 3;

/// Calendar days from `today` to `expiry`. Negative once the item has expired.
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Same as [`days_until_expiry`], taking a wall-clock instant. Only the local
/// calendar date of `now` is considered.
pub fn days_until_expiry_at<Tz: TimeZone>(expiry: NaiveDate, now: &DateTime<Tz>) -> i64 {
    days_until_expiry(expiry, now.date_naive())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryStatus {
    Expired,
    Today,
    Tomorrow,
    Warning,
    Upcoming,
    Normal,
}

impl ExpiryStatus {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => ExpiryStatus::Expired,
            0 => ExpiryStatus::Today,
            1 => ExpiryStatus::Tomorrow,
            2..=3 => ExpiryStatus::Warning,
            4..=7 => ExpiryStatus::Upcoming,
            _ => ExpiryStatus::Normal,
        }
    }
}

/// Per-item expiry summary shown next to listed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryDetails {
    pub days_until_expiry: i64,
    pub status: ExpiryStatus,
    pub expiry_text: String,
}

impl ExpiryDetails {
    pub fn at<Tz: TimeZone>(expiry: NaiveDate, now: &DateTime<Tz>) -> Self {
        let days = days_until_expiry_at(expiry, now);
        Self {
            days_until_expiry: days,
            status: ExpiryStatus::from_days(days),
            expiry_text: expiry_text(days),
        }
    }
}

pub fn expiry_text(days: i64) -> String {
    match days {
        d if d < 0 => "Expired".to_string(),
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        d => format!("Expires in {} days", d),
    }
}

/// Wording used in reminder messages. Anything due today counts as expired.
pub fn reminder_text(days: i64) -> String {
    if days <= 0 {
        "已過期".to_string()
    } else {
        format!("{}天後過期", days)
    }
}
