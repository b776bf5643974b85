// Loads apply in completion order; a failed load leaves prior output as is.

use crate::catalog::StateCatalog;
use crate::client::{ApiClient, RecentsFilter};
use crate::errors::ClientError;
use crate::models::EntryResponse;
use crate::pie::{ArcSpec, LegendEntry, compute_arcs, legend, range_label};
use crate::table::{RenderedRow, build_rows_from_wire};
use chrono::TimeZone;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub trait StatePrompt {
    fn confirm(&mut self, state_name: &str) -> impl Future<Output = bool> + Send;
    fn lock(&mut self);
    fn unlock(&mut self);
    fn show_error(&mut self, message: &str);
    fn reload(&mut self);
}

#[derive(Debug)]
pub enum ChangeOutcome {
    Cancelled,
    Applied(EntryResponse),
    Failed(ClientError),
}

pub struct StateChangeController {
    client: ApiClient,
    catalog: Arc<StateCatalog>,
}

impl StateChangeController {
    pub fn new(client: ApiClient, catalog: Arc<StateCatalog>) -> Self {
        Self { client, catalog }
    }

    pub async fn change_state<P: StatePrompt>(
        &self,
        prompt: &mut P,
        new_state: usize,
        now_ms: i64,
    ) -> ChangeOutcome {
        if !prompt.confirm(self.catalog.name_of(new_state)).await {
            return ChangeOutcome::Cancelled;
        }

        prompt.lock();
        let result = self.client.submit_state_change(new_state, now_ms).await;
        prompt.unlock();

        match result {
            Ok(entry) => {
                info!(entry_idx = entry.entry_idx, new_state, "state change saved");
                prompt.reload();
                ChangeOutcome::Applied(entry)
            }
            Err(err) => {
                warn!(new_state, "state change failed: {err}");
                prompt.show_error(&err.to_string());
                ChangeOutcome::Failed(err)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RecentsView {
    pub rows: Vec<RenderedRow>,
}

impl RecentsView {
    pub async fn load<Tz>(
        &mut self,
        client: &ApiClient,
        filter: &RecentsFilter,
        catalog: &StateCatalog,
        now_ms: i64,
        tz: &Tz,
    ) -> Result<(), ClientError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let entries = client.fetch_recents(filter).await?;
        self.rows = build_rows_from_wire(&entries, now_ms, catalog, tz);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SummaryView {
    pub arcs: Vec<ArcSpec>,
    pub legend: Vec<LegendEntry>,
    pub label: String,
}

impl SummaryView {
    pub async fn load(
        &mut self,
        client: &ApiClient,
        days: u32,
        catalog: &StateCatalog,
    ) -> Result<(), ClientError> {
        let durations = client.fetch_range(days).await?;
        self.render(&durations, days, catalog);
        Ok(())
    }

    pub fn render(&mut self, durations: &[i64], days: u32, catalog: &StateCatalog) {
        self.arcs = compute_arcs(durations);
        self.legend = legend(durations, catalog);
        self.label = range_label(days);
    }
}
