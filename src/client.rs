use crate::errors::ClientError;
use crate::models::{AddEntryRequest, EntryResponse};
use reqwest::{Client, Response};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentsFilter {
    pub count: Option<u64>,
    pub days: Option<u64>,
}

impl RecentsFilter {
    pub fn parse(count: &str, days: &str) -> Result<Self, ClientError> {
        Ok(Self {
            count: parse_limit(count, "items")?,
            days: parse_limit(days, "days")?,
        })
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        if let Some(days) = self.days {
            params.push(("days", days.to_string()));
        }
        params
    }
}

fn parse_limit(raw: &str, what: &str) -> Result<Option<u64>, ClientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(ClientError::InvalidFilter(format!(
            "Please enter a valid positive integer for {what}."
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    access_key: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    pub async fn submit_state_change(
        &self,
        new_state: usize,
        start_timestamp: i64,
    ) -> Result<EntryResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/entry", self.base_url))
            .query(&[("key", self.access_key.as_str())])
            .json(&AddEntryRequest {
                new_state,
                start_timestamp,
                force: None,
            })
            .send()
            .await?;
        let body = checked(response).await?.json::<Value>().await?;
        serde_json::from_value(body).map_err(|err| ClientError::Shape(err.to_string()))
    }

    pub async fn fetch_recents(&self, filter: &RecentsFilter) -> Result<Vec<Value>, ClientError> {
        let mut query = filter.query();
        query.push(("key", self.access_key.clone()));
        let response = self
            .http
            .get(format!("{}/api/recents", self.base_url))
            .query(&query)
            .send()
            .await?;
        decode_entries(checked(response).await?.json::<Value>().await?)
    }

    pub async fn fetch_range(&self, days: u32) -> Result<Vec<i64>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/data", self.base_url))
            .query(&[("key", self.access_key.clone()), ("range", days.to_string())])
            .send()
            .await?;
        decode_durations(checked(response).await?.json::<Value>().await?)
    }
}

async fn checked(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

pub fn decode_entries(body: Value) -> Result<Vec<Value>, ClientError> {
    match body {
        Value::Array(entries) => Ok(entries),
        other => Err(ClientError::Shape(format!("expected an array, got {other}"))),
    }
}

pub fn decode_durations(body: Value) -> Result<Vec<i64>, ClientError> {
    decode_entries(body)?
        .iter()
        .map(|value| {
            value
                .as_i64()
                .or_else(|| {
                    value
                        .as_f64()
                        .filter(|ms| ms.is_finite() && *ms >= 0.0)
                        .map(|ms| ms as i64)
                })
                .filter(|ms| *ms >= 0)
                .ok_or_else(|| ClientError::Shape(format!("expected milliseconds, got {value}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_and_blank_filters_are_omitted() {
        let filter = RecentsFilter::parse("0", " ").unwrap();
        assert_eq!(filter, RecentsFilter::default());
        assert!(filter.query().is_empty());

        let filter = RecentsFilter::parse("10", "7").unwrap();
        assert_eq!(
            filter.query(),
            vec![("count", "10".to_string()), ("days", "7".to_string())]
        );
    }

    #[test]
    fn bad_filters_never_reach_the_network() {
        let err = RecentsFilter::parse("-3", "1").unwrap_err();
        assert!(matches!(err, ClientError::InvalidFilter(_)));
        assert!(err.to_string().contains("items"));

        let err = RecentsFilter::parse("5", "1.5").unwrap_err();
        assert!(err.to_string().contains("days"));
    }

    #[test]
    fn non_array_payload_is_a_shape_error() {
        assert!(matches!(
            decode_entries(json!({"error": "nope"})),
            Err(ClientError::Shape(_))
        ));
        assert_eq!(decode_entries(json!([[1, 2], []])).unwrap().len(), 2);
    }

    #[test]
    fn durations_must_be_numbers() {
        assert_eq!(decode_durations(json!([0, 1500, 2.0])).unwrap(), vec![0, 1500, 2]);
        assert!(matches!(
            decode_durations(json!([0, "x"])),
            Err(ClientError::Shape(_))
        ));
    }

    #[test]
    fn negative_durations_are_rejected() {
        assert!(matches!(
            decode_durations(json!([-1, 1])),
            Err(ClientError::Shape(_))
        ));
        assert!(matches!(
            decode_durations(json!([1, -0.5])),
            Err(ClientError::Shape(_))
        ));
    }
}
