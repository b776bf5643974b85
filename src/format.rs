use chrono::{TimeZone, Utc};
use std::fmt::Display;

const MINUTE_MS: i64 = 60_000;
const MINUTES_PER_DAY: i64 = 1440;

pub fn format_duration(duration_ms: i64) -> String {
    if duration_ms <= 500 {
        return "0s".to_string();
    }

    let total_minutes = duration_ms / MINUTE_MS;
    if total_minutes == 0 {
        return "<1m".to_string();
    }

    let days = total_minutes / MINUTES_PER_DAY;
    let hours = (total_minutes % MINUTES_PER_DAY) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

// 30s rounds up; rendered as "D Mon, HH:MM".
pub fn round_to_minute<Tz>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let within_minute = epoch_ms.rem_euclid(MINUTE_MS);
    let rounded = epoch_ms.checked_sub(within_minute).and_then(|base| {
        if within_minute >= 30 * 1000 {
            base.checked_add(MINUTE_MS)
        } else {
            Some(base)
        }
    });

    match rounded.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        Some(instant) => instant
            .with_timezone(tz)
            .format("%-d %b, %H:%M")
            .to_string(),
        None => "-".to_string(),
    }
}

pub fn format_elapsed(elapsed_ms: i64) -> String {
    let elapsed_ms = elapsed_ms.max(0);
    let hours = elapsed_ms / 3_600_000;
    let minutes = (elapsed_ms % 3_600_000) / MINUTE_MS;
    let seconds = (elapsed_ms % MINUTE_MS) / 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("valid date")
            .timestamp_millis()
    }

    #[test]
    fn duration_half_second_boundary() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(500), "0s");
        assert_eq!(format_duration(-20), "0s");
        assert_eq!(format_duration(501), "<1m");
    }

    #[test]
    fn duration_minute_boundary() {
        assert_eq!(format_duration(59_999), "<1m");
        assert_eq!(format_duration(60_000), "1m");
    }

    #[test]
    fn duration_skips_zero_components() {
        assert_eq!(format_duration(90 * 60_000), "1h 30m");
        assert_eq!(format_duration(25 * 3_600_000), "1d 1h");
        assert_eq!(format_duration(2 * 86_400_000 + 5 * 60_000), "2d 5m");
        assert_eq!(format_duration(3_600_000), "1h");
    }

    #[test]
    fn rounding_keeps_minute_below_thirty_seconds() {
        let ms = utc_ms(2025, 3, 7, 14, 5, 29) + 999;
        assert_eq!(round_to_minute(ms, &Utc), "7 Mar, 14:05");
    }

    #[test]
    fn rounding_moves_minute_at_thirty_seconds() {
        let ms = utc_ms(2025, 3, 7, 14, 5, 30);
        assert_eq!(round_to_minute(ms, &Utc), "7 Mar, 14:06");
    }

    #[test]
    fn rounding_rolls_over_day_and_year() {
        let late = utc_ms(2025, 3, 7, 23, 59, 31);
        assert_eq!(round_to_minute(late, &Utc), "8 Mar, 00:00");
        let new_year = utc_ms(2024, 12, 31, 23, 59, 45);
        assert_eq!(round_to_minute(new_year, &Utc), "1 Jan, 00:00");
    }

    #[test]
    fn rounding_renders_in_given_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).expect("offset");
        let ms = utc_ms(2025, 6, 30, 22, 10, 0);
        assert_eq!(round_to_minute(ms, &tz), "1 Jul, 00:10");
    }

    #[test]
    fn rounding_out_of_range_yields_placeholder() {
        assert_eq!(round_to_minute(i64::MAX, &Utc), "-");
        assert_eq!(round_to_minute(i64::MIN, &Utc), "-");
        assert_eq!(round_to_minute(i64::MAX - 1_000, &Utc), "-");
    }

    #[test]
    fn elapsed_is_zero_padded_and_unbounded() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(3_723_000), "01:02:03");
        assert_eq!(format_elapsed(100 * 3_600_000 + 59_999), "100:00:59");
        assert_eq!(format_elapsed(-5_000), "00:00:00");
    }
}
