use crate::errors::AppError;
use crate::models::{
    AddEntryRequest, EntryResponse, Event, RangeQuery, RecentsQuery, SetLengthRequest,
    UpdateEntryRequest,
};
use crate::pie::{compute_arcs, legend, range_label};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::summary::{
    DEFAULT_RANGE_DAYS, DEFAULT_RECENT_COUNT, DEFAULT_RECENT_DAYS, build_range, build_range_at,
    recent_events, recent_events_at,
};
use crate::table::build_rows;
use crate::ui::{PageContext, render_explanations, render_index, render_recents, render_summary};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::{Local, Utc};
use tracing::{info, warn};

const MAX_ENTRY_LAG_MS: i64 = 5000;
const INITIAL_RECENT_DAYS: u32 = 1;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let now = Utc::now().timestamp_millis();
    let current = data.current().copied();
    drop(data);

    let ctx = page_context(&state, current);
    let detail = current.and_then(|event| {
        state
            .catalog
            .get(event.state)
            .map(|detail| (detail, event.start_timestamp))
    });
    let elapsed = current.map_or(0, |event| now - event.start_timestamp);
    Html(render_index(&ctx, detail, elapsed))
}

pub async fn recents_page(
    State(state): State<AppState>,
    Query(query): Query<RecentsQuery>,
) -> Html<String> {
    let count = query
        .count
        .filter(|count| *count > 0)
        .unwrap_or(DEFAULT_RECENT_COUNT);
    let days = match query.days {
        None => INITIAL_RECENT_DAYS,
        Some(0) => DEFAULT_RECENT_DAYS,
        Some(days) => days,
    };

    let data = state.data.lock().await;
    let now = Utc::now().timestamp_millis();
    let events = recent_events_at(now, &data, count, days)
        .into_iter()
        .map(|(index, start_timestamp)| Event {
            state: index,
            start_timestamp,
        });
    let rows = build_rows(events, now, &state.catalog, &Local);
    let ctx = page_context(&state, data.current().copied());
    let shown_days = query.days.unwrap_or(INITIAL_RECENT_DAYS);
    Html(render_recents(&ctx, &rows, query.count.unwrap_or(0), shown_days))
}

pub async fn summary_page(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Html<String> {
    let days = query.range.unwrap_or(DEFAULT_RANGE_DAYS);
    let data = state.data.lock().await;
    let durations = build_range_at(Utc::now().timestamp_millis(), &data, days, state.catalog.len());
    let ctx = page_context(&state, data.current().copied());
    Html(render_summary(
        &ctx,
        &compute_arcs(&durations),
        &legend(&durations, &state.catalog),
        &range_label(days),
    ))
}

pub async fn explanations_page(State(state): State<AppState>) -> Html<String> {
    let current = state.data.lock().await.current().copied();
    Html(render_explanations(&page_context(&state, current)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let AddEntryRequest {
        new_state,
        start_timestamp,
        force,
    } = payload;

    if state.catalog.get(new_state).is_none() {
        return Err(AppError::bad_request("Bad request: Unknown state"));
    }

    let now = Utc::now().timestamp_millis();
    if force != Some(true) && (start_timestamp < now - MAX_ENTRY_LAG_MS || start_timestamp > now) {
        return Err(AppError::bad_request("Bad request: Wrong timestamp"));
    }

    let mut data = state.data.lock().await;
    if let Some(current) = data.current() {
        if current.state == new_state {
            warn!(new_state, "state change to the current state rejected");
            return Err(AppError::bad_request(
                "Bad request: New state same as current state",
            ));
        }
        if start_timestamp < current.start_timestamp {
            return Err(AppError::bad_request(
                "Bad request: New starttime earlier than current starttime",
            ));
        }
    }

    data.events.push(Event {
        state: new_state,
        start_timestamp,
    });
    let entry_idx = data.events.len() - 1;
    if let Err(err) = persist_data(&state.data_path, &data).await {
        data.events.pop();
        return Err(err);
    }

    info!(entry_idx, new_state, "state changed");
    Ok(Json(EntryResponse {
        entry_idx,
        new_state,
        start_timestamp,
    }))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_idx): Path<usize>,
) -> Result<Json<EntryResponse>, AppError> {
    let data = state.data.lock().await;
    let event = data
        .events
        .get(entry_idx)
        .ok_or_else(|| AppError::bad_request("Bad request: Entry index out of range"))?;
    Ok(Json(to_response(entry_idx, *event)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_idx): Path<usize>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let mut data = state.data.lock().await;
    let original = *data
        .events
        .get(entry_idx)
        .ok_or_else(|| AppError::bad_request("Bad request: Entry index out of range"))?;

    if payload.new_state.is_none() && payload.start_timestamp.is_none() {
        return Err(AppError::bad_request("Bad request: No changes specified"));
    }
    if let Some(new_state) = payload.new_state
        && state.catalog.get(new_state).is_none()
    {
        return Err(AppError::bad_request("Bad request: Unknown state"));
    }

    if let Some(start) = payload.start_timestamp {
        if let Some(previous) = entry_idx.checked_sub(1).and_then(|idx| data.events.get(idx))
            && start < previous.start_timestamp
        {
            return Err(AppError::bad_request(
                "Bad request: New starttime earlier than previous event",
            ));
        }
        if let Some(next) = data.events.get(entry_idx + 1)
            && start > next.start_timestamp
        {
            return Err(AppError::bad_request(
                "Bad request: New starttime later than next event",
            ));
        }
    }

    let updated = Event {
        state: payload.new_state.unwrap_or(original.state),
        start_timestamp: payload.start_timestamp.unwrap_or(original.start_timestamp),
    };
    data.events[entry_idx] = updated;
    if let Err(err) = persist_data(&state.data_path, &data).await {
        data.events[entry_idx] = original;
        return Err(err);
    }

    info!(entry_idx, "entry updated");
    Ok(Json(to_response(entry_idx, updated)))
}

pub async fn get_length(State(state): State<AppState>) -> Json<usize> {
    Json(state.data.lock().await.events.len())
}

pub async fn set_length(
    State(state): State<AppState>,
    Json(payload): Json<SetLengthRequest>,
) -> Result<Json<usize>, AppError> {
    let mut data = state.data.lock().await;
    if payload.new_length < data.events.len() {
        let removed = data.events.split_off(payload.new_length);
        if let Err(err) = persist_data(&state.data_path, &data).await {
            data.events.extend(removed);
            return Err(err);
        }
        warn!(new_length = payload.new_length, removed = removed.len(), "event log truncated");
    }
    Ok(Json(data.events.len()))
}

pub async fn get_recents(
    State(state): State<AppState>,
    Query(query): Query<RecentsQuery>,
) -> Json<Vec<(usize, i64)>> {
    let data = state.data.lock().await;
    Json(recent_events(
        &data,
        query.count.unwrap_or(DEFAULT_RECENT_COUNT),
        query.days.unwrap_or(DEFAULT_RECENT_DAYS),
    ))
}

pub async fn get_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<i64>> {
    let data = state.data.lock().await;
    Json(build_range(
        &data,
        query.range.unwrap_or(DEFAULT_RANGE_DAYS),
        state.catalog.len(),
    ))
}

fn page_context(state: &AppState, current: Option<Event>) -> PageContext<'_> {
    PageContext {
        key: &state.access_key,
        catalog: &state.catalog,
        is_emergency: current.is_some_and(|event| state.catalog.is_emergency(event.state)),
    }
}

fn to_response(entry_idx: usize, event: Event) -> EntryResponse {
    EntryResponse {
        entry_idx,
        new_state: event.state,
        start_timestamp: event.start_timestamp,
    }
}
