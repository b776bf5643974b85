use crate::errors::AppError;
use crate::models::EventLog;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path(configured: Option<String>) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from("data/events.json"),
    }
}

pub async fn load_data(path: &Path) -> EventLog {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse event log: {err}");
                EventLog::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => EventLog::default(),
        Err(err) => {
            error!("failed to read event log: {err}");
            EventLog::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &EventLog) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
