use crate::models::{Event, EventLog};
use chrono::Utc;
use tracing::warn;

pub const DAY_MS: i64 = 24 * 3600 * 1000;
pub const DEFAULT_RANGE_DAYS: u32 = 7;
pub const DEFAULT_RECENT_COUNT: usize = 300;
pub const DEFAULT_RECENT_DAYS: u32 = 30;

pub fn build_range(log: &EventLog, days: u32, state_count: usize) -> Vec<i64> {
    build_range_at(Utc::now().timestamp_millis(), log, days, state_count)
}

// Each event lasts until the next one starts and is clipped to the window.
pub fn build_range_at(now_ms: i64, log: &EventLog, days: u32, state_count: usize) -> Vec<i64> {
    let range_start = now_ms - i64::from(days) * DAY_MS;
    let mut totals = vec![0i64; state_count];

    let ends = log
        .events
        .iter()
        .skip(1)
        .map(|next| next.start_timestamp)
        .chain(std::iter::once(now_ms));

    for (event, end) in log.events.iter().zip(ends) {
        let start = event.start_timestamp.max(range_start);
        let end = end.min(now_ms);
        if end <= start {
            continue;
        }
        match totals.get_mut(event.state) {
            Some(total) => *total += end - start,
            None => warn!(state = event.state, "event references unknown state, skipping"),
        }
    }

    totals
}

pub fn recent_events(log: &EventLog, count: usize, days: u32) -> Vec<(usize, i64)> {
    recent_events_at(Utc::now().timestamp_millis(), log, count, days)
}

pub fn recent_events_at(
    now_ms: i64,
    log: &EventLog,
    count: usize,
    days: u32,
) -> Vec<(usize, i64)> {
    let range_start = now_ms - i64::from(days) * DAY_MS;
    log.events
        .iter()
        .rev()
        .take(count)
        .take_while(|event| event.start_timestamp >= range_start)
        .map(|Event { state, start_timestamp }| (*state, *start_timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(events: &[(usize, i64)]) -> EventLog {
        EventLog {
            events: events
                .iter()
                .map(|&(state, start_timestamp)| Event {
                    state,
                    start_timestamp,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_log_has_zero_totals() {
        let totals = build_range_at(10 * DAY_MS, &EventLog::default(), 7, 3);
        assert_eq!(totals, vec![0, 0, 0]);
    }

    #[test]
    fn latest_event_runs_until_now() {
        let now = 10 * DAY_MS;
        let log = log_of(&[(0, now - 3_000), (2, now - 1_000)]);
        let totals = build_range_at(now, &log, 1, 3);
        assert_eq!(totals, vec![2_000, 0, 1_000]);
    }

    #[test]
    fn event_in_force_at_window_start_is_clipped() {
        let now = 10 * DAY_MS;
        let window_start = now - DAY_MS;
        let log = log_of(&[
            (1, window_start - 5 * DAY_MS),
            (0, window_start - 1_000),
            (2, window_start + 4_000),
        ]);
        let totals = build_range_at(now, &log, 1, 3);
        assert_eq!(totals[1], 0);
        assert_eq!(totals[0], 4_000);
        assert_eq!(totals[2], DAY_MS - 4_000);
        assert_eq!(totals.iter().sum::<i64>(), DAY_MS);
    }

    #[test]
    fn unknown_state_is_ignored() {
        let now = 10 * DAY_MS;
        let log = log_of(&[(9, now - 2_000), (1, now - 1_000)]);
        assert_eq!(build_range_at(now, &log, 1, 2), vec![0, 1_000]);
    }

    #[test]
    fn recents_are_newest_first_and_bounded() {
        let now = 40 * DAY_MS;
        let log = log_of(&[(0, now - 3 * DAY_MS), (1, now - 2_000), (2, now - 1_000)]);

        assert_eq!(
            recent_events_at(now, &log, 300, 30),
            vec![(2, now - 1_000), (1, now - 2_000), (0, now - 3 * DAY_MS)]
        );
        assert_eq!(recent_events_at(now, &log, 1, 30), vec![(2, now - 1_000)]);
        assert_eq!(recent_events_at(now, &log, 300, 1).len(), 2);
        assert!(recent_events_at(now, &log, 0, 30).is_empty());
    }
}
