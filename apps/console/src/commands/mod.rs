pub mod calendar;
pub mod chat;
pub mod dashboard;
pub mod patient;
pub mod upload;

use anyhow::anyhow;
use chrono::NaiveDate;

use shared_utils::dates;

/// Accepts `yyyy-mm-dd` or `dd/mm/yyyy`.
pub fn parse_day(value: &str) -> anyhow::Result<NaiveDate> {
    dates::parse_date(value).ok_or_else(|| anyhow!("invalid date: {}", value))
}
