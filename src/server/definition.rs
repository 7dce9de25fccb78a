use crate::tracker::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret checked on every request when set.
    pub access_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5001,
            access_token: None,
        }
    }
}

/// Body of the create-record request. Optional fields take the documented
/// fallbacks; required ones are checked by the store.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub problem_id: String,
    pub difficulty: Option<String>,
    pub language: Option<String>,
    pub status: Option<Outcome>,
    #[serde(default)]
    pub time_spent: i64,
    pub runtime: Option<String>,
    pub memory: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub id: u64,
    pub title: String,
    pub problem_id: String,
    pub difficulty: String,
    pub language: String,
    pub status: Outcome,
    pub time_spent: u64,
    pub runtime: String,
    pub memory: String,
    pub timestamp: DateTime<Utc>,
}

/// Optional listing filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub language: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateSubmission = serde_json::from_str(r#"{"title": "Two Sum"}"#).unwrap();
        assert_eq!(req.title, "Two Sum");
        assert_eq!(req.problem_id, "");
        assert_eq!(req.time_spent, 0);
        assert!(req.status.is_none());
    }

    #[test]
    fn record_round_trips_with_camel_case_keys() {
        let json = r#"{
            "title": "Two Sum",
            "problemId": "two-sum",
            "timeSpent": 42,
            "status": "Accepted",
            "runtime": "42 ms",
            "memory": "N/A",
            "timestamp": "2024-01-15T10:30:00Z"
        }"#;
        let req: CreateSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(req.problem_id, "two-sum");
        assert_eq!(req.time_spent, 42);
        assert_eq!(req.status, Some(Outcome::Accepted));
    }
}
