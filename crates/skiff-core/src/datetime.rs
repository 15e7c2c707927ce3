use anyhow::Context;
use chrono::{Local, NaiveDate};

/// Calendar day in the local time zone. Filter predicates take the day as a
/// parameter, so this is only called at the edges.
#[must_use]
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_iso_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// Human-readable label for display, e.g. "Jan 15, 2025".
#[must_use]
pub fn human_date_label(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
