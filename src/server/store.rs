use super::definition::{CreateSubmission, ListQuery, StoredSubmission};
use super::error::ApiError;
use crate::global::sentinel;
use crate::tracker::Outcome;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory document store for submission records. Schema validation and
/// the newest-first sort order live here, not in the clients.
#[derive(Debug, Default)]
pub struct SubmissionStore {
    records: RwLock<Vec<StoredSubmission>>,
    next_id: AtomicU64,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, req: CreateSubmission) -> Result<StoredSubmission, ApiError> {
        if req.title.is_empty() || req.problem_id.is_empty() {
            return Err(ApiError::InvalidSubmission(
                "title and problemId are required".into(),
            ));
        }
        if req.time_spent <= 0 {
            return Err(ApiError::InvalidSubmission(
                "timeSpent must be greater than 0".into(),
            ));
        }

        let record = StoredSubmission {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            title: req.title,
            problem_id: req.problem_id,
            difficulty: req
                .difficulty
                .unwrap_or_else(|| sentinel::DEFAULT_DIFFICULTY.into()),
            language: req
                .language
                .unwrap_or_else(|| sentinel::UNKNOWN_LANGUAGE.into()),
            status: req.status.unwrap_or(Outcome::Accepted),
            time_spent: req.time_spent as u64,
            runtime: req.runtime.unwrap_or_else(|| sentinel::NOT_AVAILABLE.into()),
            memory: req.memory.unwrap_or_else(|| sentinel::NOT_AVAILABLE.into()),
            timestamp: req.timestamp.unwrap_or_else(Utc::now),
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    /// Filtered listing, newest timestamp first.
    pub async fn list(&self, query: &ListQuery) -> Vec<StoredSubmission> {
        let records = self.records.read().await;
        let mut out: Vec<StoredSubmission> = records
            .iter()
            .filter(|r| {
                query
                    .status
                    .as_deref()
                    .map_or(true, |s| r.status.as_str() == s)
            })
            .filter(|r| query.language.as_deref().map_or(true, |l| r.language == l))
            .filter(|r| query.start_date.map_or(true, |d| r.timestamp >= d))
            .filter(|r| query.end_date.map_or(true, |d| r.timestamp <= d))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }
}
