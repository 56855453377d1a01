use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Fixed offset for the configured broadcast timezone, UTC if out of range.
pub fn broadcast_offset(utc_offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Formats a date the way promo headers show it, e.g. `16 October 2026`.
pub fn format_promo_date(dt: &DateTime<Utc>, utc_offset_hours: i32) -> String {
    dt.with_timezone(&broadcast_offset(utc_offset_hours))
        .format("%d %B %Y")
        .to_string()
}

pub fn format_datetime(dt: &DateTime<Utc>, utc_offset_hours: i32) -> String {
    dt.with_timezone(&broadcast_offset(utc_offset_hours))
        .format("%d %B %Y %H:%M")
        .to_string()
}

/// Parses a stored RFC 3339 timestamp, falling back to the raw text.
pub fn format_stored_timestamp(stored: &str, utc_offset_hours: i32) -> String {
    DateTime::parse_from_rfc3339(stored)
        .map(|dt| format_datetime(&dt.with_timezone(&Utc), utc_offset_hours))
        .unwrap_or_else(|_| stored.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_promo_date_uses_offset() {
        // 20:30 UTC is already the next day in WIB (UTC+7)
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 20, 30, 0).unwrap();
        assert_eq!(format_promo_date(&dt, 0), "09 March 2024");
        assert_eq!(format_promo_date(&dt, 7), "10 March 2024");
    }

    #[test]
    fn test_format_stored_timestamp() {
        assert_eq!(
            format_stored_timestamp("2024-03-09T01:00:00+00:00", 7),
            "09 March 2024 08:00"
        );
        assert_eq!(format_stored_timestamp("not a date", 7), "not a date");
    }
}
