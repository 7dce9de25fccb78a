use super::definition::{SubmissionRecord, VisitInterval};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-problem local stats computed from cached history. Mirrors what the
/// popup shows next to each listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemStats {
    pub attempts: usize,
    pub best_time: u64,
    pub average_time: u64,
}

/// Process-local submission cache, keyed by problem id. Writes are
/// read-modify-write appends; the single-pipeline model is the only guard
/// against concurrent writers within one page context.
#[derive(Debug, Default)]
pub struct LocalCache {
    submissions: RwLock<HashMap<String, Vec<SubmissionRecord>>>,
    visits: RwLock<HashMap<String, Vec<VisitInterval>>>,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append_submission(&self, record: &SubmissionRecord) {
        self.submissions
            .write()
            .await
            .entry(record.problem_id.clone())
            .or_default()
            .push(record.clone());
    }

    pub async fn submissions_for(&self, problem_id: &str) -> Vec<SubmissionRecord> {
        self.submissions
            .read()
            .await
            .get(problem_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn append_visit(&self, problem_id: &str, interval: VisitInterval) {
        self.visits
            .write()
            .await
            .entry(problem_id.to_string())
            .or_default()
            .push(interval);
    }

    pub async fn visits_for(&self, problem_id: &str) -> Vec<VisitInterval> {
        self.visits
            .read()
            .await
            .get(problem_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn problem_stats(&self, problem_id: &str) -> Option<ProblemStats> {
        let map = self.submissions.read().await;
        let history = map.get(problem_id)?;
        if history.is_empty() {
            return None;
        }
        let times: Vec<u64> = history.iter().map(|r| r.time_spent).collect();
        Some(ProblemStats {
            attempts: times.len(),
            best_time: *times.iter().min().unwrap(),
            average_time: times.iter().sum::<u64>() / times.len() as u64,
        })
    }
}
