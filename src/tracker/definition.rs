use crate::global::submission_status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary verdict of a graded submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Outcome {
    Accepted,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => submission_status::ACCEPTED,
            Outcome::Failed => submission_status::FAILED,
        }
    }
}

/// One completed grading event, as relayed to the cache and the
/// persistence service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub problem_id: String,
    pub title: String,
    pub difficulty: String,
    pub language: String,
    pub status: Outcome,
    pub time_spent: u64, // seconds
    pub runtime: String,
    pub memory: String,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    /// A record with a missing title/problem id or a zero elapsed time is
    /// discarded before it ever reaches the relay.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.problem_id.is_empty() && self.time_spent > 0
    }
}

/// Start/end of one stay on a problem page. Analytics only.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitInterval {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api_base_url: String,
    /// Quiet period after the last mutation before one evaluation pass runs.
    pub debounce_ms: u64,
    /// Result stats render after the verdict banner; wait this long before
    /// reading them.
    pub metrics_delay_ms: u64,
    /// Minimum gap between two accepted detections for the same problem.
    pub cooldown_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/api".into(),
            debounce_ms: 500,
            metrics_delay_ms: 2000,
            cooldown_ms: 10000,
        }
    }
}

/// What the page feed delivers to the engine.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A burst of DOM mutations settled into this rendered document.
    Mutation { html: String },
    /// Full load or in-page route change.
    Navigation { url: String, title: String },
}

/// Extension-internal message channel between the detecting context and the
/// background relay context.
#[derive(Debug, Clone)]
pub enum TrackerMessage {
    SubmissionDetected(SubmissionRecord),
    SubmissionSaved(SubmissionRecord),
}
