//! Year helpers: leading-year extraction from dump timestamps and the sane year window.

use regex::Regex;
use std::sync::OnceLock;
use time::OffsetDateTime;

/// First year with Stack Exchange data; bounds earlier than this are rejected.
pub const EARLIEST_DUMP_YEAR: i32 = 2008;

fn leading_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{4})").expect("static year regex"))
}

/// Extract the leading year from an ISO-ish date such as `2015-07-14T19:35:44.557`.
/// Returns 0 when the string does not start with four ASCII digits.
pub fn extract_year(date: &str) -> i32 {
    leading_year_re()
        .captures(date)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Current calendar year (UTC), the upper end of the accepted year window.
pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Inclusive window `EARLIEST_DUMP_YEAR..=current_year()`.
pub fn is_sane_year(year: i32) -> bool {
    (EARLIEST_DUMP_YEAR..=current_year()).contains(&year)
}
