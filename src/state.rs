use crate::catalog::StateCatalog;
use crate::models::EventLog;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<EventLog>>,
    pub catalog: Arc<StateCatalog>,
    pub access_key: Arc<str>,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        data: EventLog,
        catalog: StateCatalog,
        access_key: &str,
    ) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            catalog: Arc::new(catalog),
            access_key: Arc::from(access_key),
        }
    }
}
