use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub state: usize,
    pub start_timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn current(&self) -> Option<&Event> {
        self.events.last()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub new_state: usize,
    pub start_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub new_state: Option<usize>,
    pub start_timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub entry_idx: usize,
    pub new_state: usize,
    pub start_timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetLengthRequest {
    pub new_length: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentsQuery {
    pub count: Option<usize>,
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(alias = "days")]
    pub range: Option<u32>,
}
