use crate::catalog::StateCatalog;
use crate::format::{format_duration, round_to_minute};
use crate::models::Event;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt::Display;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub state_name: String,
    pub state_color: String,
    pub start_label: String,
    pub end_label: String,
    pub duration_label: String,
}

// Beyond chrono's calendar range, well inside i64.
const MAX_TIMESTAMP_MS: f64 = 1e16;

pub fn parse_entry(entry: &Value) -> Option<Event> {
    let pair = entry.as_array().filter(|pair| pair.len() >= 2)?;
    let state = usize::try_from(pair[0].as_u64()?).ok()?;
    let start_timestamp = match pair[1].as_i64() {
        Some(ms) => ms,
        None => pair[1]
            .as_f64()
            .filter(|ms| ms.fract() == 0.0 && ms.abs() < MAX_TIMESTAMP_MS)?
            as i64,
    };
    DateTime::<Utc>::from_timestamp_millis(start_timestamp)?;
    Some(Event {
        state,
        start_timestamp,
    })
}

pub fn parse_entries(entries: &[Value]) -> Vec<Event> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let event = parse_entry(entry);
            if event.is_none() {
                warn!(position, "skipping malformed event entry");
            }
            event
        })
        .collect()
}

pub fn build_rows<Tz>(
    events: impl IntoIterator<Item = Event>,
    now_ms: i64,
    catalog: &StateCatalog,
    tz: &Tz,
) -> Vec<RenderedRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    events
        .into_iter()
        .scan(now_ms, |end, event| {
            let row = RenderedRow {
                state_name: catalog.name_of(event.state).to_string(),
                state_color: catalog.color_of(event.state).to_string(),
                start_label: round_to_minute(event.start_timestamp, tz),
                end_label: round_to_minute(*end, tz),
                duration_label: format_duration(end.saturating_sub(event.start_timestamp)),
            };
            *end = event.start_timestamp;
            Some(row)
        })
        .collect()
}

pub fn build_rows_from_wire<Tz>(
    entries: &[Value],
    now_ms: i64,
    catalog: &StateCatalog,
    tz: &Tz,
) -> Vec<RenderedRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    build_rows(parse_entries(entries), now_ms, catalog, tz)
}
