use super::cache::LocalCache;
use super::definition::{SubmissionRecord, TrackerMessage};
use super::request::ApiClient;
use async_trait::async_trait;
use simple_log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Seam to the remote persistence service.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn create(&self, record: &SubmissionRecord) -> anyhow::Result<()>;
}

#[async_trait]
impl RecordSink for ApiClient {
    async fn create(&self, record: &SubmissionRecord) -> anyhow::Result<()> {
        self.create_submission(record).await
    }
}

/// Dispatches a finalized record to the local cache and the remote service.
///
/// The two writes are independent by design: the cache append never waits on
/// or rolls back for the remote call, so local analytics keep working while
/// the backend is unreachable. Remote failures are logged, not retried.
pub struct Relay {
    cache: Arc<LocalCache>,
    sink: Arc<dyn RecordSink>,
}

impl Relay {
    pub fn new(cache: Arc<LocalCache>, sink: Arc<dyn RecordSink>) -> Self {
        Self { cache, sink }
    }

    /// Returns whether the remote copy was stored.
    pub async fn dispatch(&self, record: &SubmissionRecord) -> bool {
        let (_, remote) = tokio::join!(
            self.cache.append_submission(record),
            self.sink.create(record)
        );
        match remote {
            Ok(()) => {
                info!(
                    "submission saved: {} {} {}s",
                    record.problem_id,
                    record.status.as_str(),
                    record.time_spent
                );
                true
            }
            Err(e) => {
                warn!("remote save failed for {}: {}", record.problem_id, e);
                false
            }
        }
    }
}

/// Background relay context: consumes `SUBMISSION_DETECTED` messages from the
/// detecting context and confirms stored records with `SUBMISSION_SAVED` to
/// any listening display context.
pub fn spawn(
    relay: Relay,
    mut rx: mpsc::Receiver<TrackerMessage>,
    saved_tx: mpsc::Sender<TrackerMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let TrackerMessage::SubmissionDetected(record) = msg {
                if relay.dispatch(&record).await {
                    let _ = saved_tx.send(TrackerMessage::SubmissionSaved(record)).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::definition::Outcome;
    use anyhow::anyhow;
    use chrono::Utc;
    use tokio::sync::Mutex;

    struct MockSink {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockSink {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(vec![]),
                fail,
            })
        }
    }

    #[async_trait]
    impl RecordSink for MockSink {
        async fn create(&self, record: &SubmissionRecord) -> anyhow::Result<()> {
            self.calls.lock().await.push(record.problem_id.clone());
            if self.fail {
                Err(anyhow!("service unreachable"))
            } else {
                Ok(())
            }
        }
    }

    fn record() -> SubmissionRecord {
        SubmissionRecord {
            problem_id: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty: "Easy".into(),
            language: "Rust".into(),
            status: Outcome::Accepted,
            time_spent: 42,
            runtime: "N/A".into(),
            memory: "N/A".into(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn dispatch_writes_both_sides() {
        let cache = Arc::new(LocalCache::new());
        let sink = MockSink::new(false);
        let relay = Relay::new(cache.clone(), sink.clone());

        assert!(relay.dispatch(&record()).await);
        assert_eq!(cache.submissions_for("two-sum").await.len(), 1);
        assert_eq!(sink.calls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn remote_failure_leaves_cache_write_intact() {
        // Partial success is acceptable and by design.
        let cache = Arc::new(LocalCache::new());
        let relay = Relay::new(cache.clone(), MockSink::new(true));

        assert!(!relay.dispatch(&record()).await);
        assert_eq!(cache.submissions_for("two-sum").await.len(), 1);
    }

    #[tokio::test]
    async fn saved_confirmation_only_for_stored_records() {
        let cache = Arc::new(LocalCache::new());
        let (detected_tx, detected_rx) = mpsc::channel(8);
        let (saved_tx, mut saved_rx) = mpsc::channel(8);
        spawn(Relay::new(cache, MockSink::new(false)), detected_rx, saved_tx);

        detected_tx
            .send(TrackerMessage::SubmissionDetected(record()))
            .await
            .unwrap();
        match saved_rx.recv().await {
            Some(TrackerMessage::SubmissionSaved(r)) => assert_eq!(r.problem_id, "two-sum"),
            other => panic!("expected saved confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_confirmation_when_remote_fails() {
        let cache = Arc::new(LocalCache::new());
        let (detected_tx, detected_rx) = mpsc::channel(8);
        let (saved_tx, mut saved_rx) = mpsc::channel(8);
        spawn(Relay::new(cache, MockSink::new(true)), detected_rx, saved_tx);

        detected_tx
            .send(TrackerMessage::SubmissionDetected(record()))
            .await
            .unwrap();
        drop(detected_tx);
        assert!(saved_rx.recv().await.is_none());
    }
}
