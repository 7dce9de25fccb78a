use super::cache::LocalCache;
use super::classifier;
use super::definition::{PageEvent, SubmissionRecord, TrackerConfig, TrackerMessage};
use super::extractor;
use super::relay::{self, RecordSink, Relay};
use super::session::SessionTracker;
use super::snapshot::{problem_id_from_url, PageSnapshot};
use super::watcher;
use chrono::Utc;
use simple_log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// One content-script instance: consumes page events for a single page
/// context and turns graded results into `SUBMISSION_DETECTED` messages.
///
/// Pipeline per detected event: debounced mutation -> classification ->
/// settle delay -> metric extraction -> session stamping -> relay channel.
/// The session state machine enforces that at most one record leaves per
/// cooldown window.
pub struct TrackerEngine {
    config: TrackerConfig,
    session: SessionTracker,
    cache: Arc<LocalCache>,
    detected_tx: mpsc::Sender<TrackerMessage>,
    url: String,
    title: String,
}

impl TrackerEngine {
    pub fn new(
        config: TrackerConfig,
        cache: Arc<LocalCache>,
        detected_tx: mpsc::Sender<TrackerMessage>,
    ) -> Self {
        let cooldown = Duration::from_millis(config.cooldown_ms);
        Self {
            config,
            session: SessionTracker::new(cooldown),
            cache,
            detected_tx,
            url: String::new(),
            title: String::new(),
        }
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<PageEvent>) {
        let (mutation_tx, mutation_rx) = mpsc::channel::<String>(64);
        let (tick_tx, mut tick_rx) = mpsc::channel::<String>(16);
        let debouncer = tokio::spawn(watcher::debounce(
            mutation_rx,
            Duration::from_millis(self.config.debounce_ms),
            tick_tx,
        ));

        loop {
            tokio::select! {
                ev = events.recv() => match ev {
                    Some(PageEvent::Navigation { url, title }) => {
                        self.handle_navigation(url, title).await
                    }
                    Some(PageEvent::Mutation { html }) => {
                        let _ = mutation_tx.send(html).await;
                    }
                    None => break,
                },
                tick = tick_rx.recv() => match tick {
                    Some(html) => self.evaluate(html, &mut events).await,
                    None => break,
                },
            }
        }

        // Page feed gone; let a trailing burst still evaluate.
        drop(mutation_tx);
        while let Some(html) = tick_rx.recv().await {
            self.evaluate(html, &mut events).await;
        }
        let _ = debouncer.await;
    }

    async fn handle_navigation(&mut self, url: String, title: String) {
        let problem_id = problem_id_from_url(&url);
        if problem_id.is_some() && problem_id.as_deref() == self.session.problem_id() {
            // Same problem, e.g. a tab switch within the page.
            self.url = url;
            self.title = title;
            return;
        }
        if let Some((old_id, interval)) =
            self.session.navigate(problem_id.clone(), Instant::now(), Utc::now())
        {
            self.cache.append_visit(&old_id, interval).await;
        }
        self.url = url;
        self.title = title;
        if let Some(id) = problem_id {
            info!("tracking problem: {}", id);
        }
    }

    async fn evaluate(&mut self, html: String, events: &mut mpsc::Receiver<PageEvent>) {
        let now = Instant::now();
        self.session.poll(now);
        if !self.session.is_timing() {
            return;
        }

        let snapshot = PageSnapshot::new(self.url.clone(), self.title.clone(), html);
        let Some(classification) = classifier::classify(&snapshot) else {
            return;
        };
        let Some(time_spent) = self.session.try_begin_processing(now) else {
            return;
        };
        info!("result detected: {}", classification.text);

        // Result stats render after the verdict banner; wait, then read the
        // freshest document available. Navigations arriving meanwhile are
        // deferred, not cancelled: a late record for the old problem is
        // still relayed.
        tokio::time::sleep(Duration::from_millis(self.config.metrics_delay_ms)).await;
        let title = snapshot.problem_title();
        let mut latest_html = snapshot.html;
        let mut deferred = Vec::new();
        while let Ok(ev) = events.try_recv() {
            match ev {
                PageEvent::Mutation { html } => latest_html = html,
                nav @ PageEvent::Navigation { .. } => deferred.push(nav),
            }
        }
        let fresh = PageSnapshot::new(self.url.clone(), self.title.clone(), latest_html);

        let record = SubmissionRecord {
            problem_id: self
                .session
                .problem_id()
                .unwrap_or_default()
                .to_string(),
            title,
            difficulty: extractor::extract_difficulty(&fresh),
            language: extractor::extract_language(&fresh),
            status: classification.outcome,
            time_spent,
            runtime: extractor::extract_runtime(&fresh),
            memory: extractor::extract_memory(&fresh),
            timestamp: Utc::now(),
        };

        if !record.is_valid() {
            warn!("discarding invalid record for {:?}", self.session.problem_id());
            self.session.abort_processing();
        } else {
            let _ = self
                .detected_tx
                .send(TrackerMessage::SubmissionDetected(record))
                .await;
            self.session.finish_processing(Instant::now());
            if let Some((problem_id, interval)) = self.session.close_visit(Utc::now()) {
                self.cache.append_visit(&problem_id, interval).await;
            }
        }

        for ev in deferred {
            if let PageEvent::Navigation { url, title } = ev {
                self.handle_navigation(url, title).await;
            }
        }
    }
}

/// Wire up a full client pipeline: engine, debouncer, and background relay.
/// Returns the page-event feed and the `SUBMISSION_SAVED` confirmation
/// stream.
pub fn spawn_pipeline(
    config: TrackerConfig,
    cache: Arc<LocalCache>,
    sink: Arc<dyn RecordSink>,
) -> (mpsc::Sender<PageEvent>, mpsc::Receiver<TrackerMessage>) {
    let (events_tx, events_rx) = mpsc::channel(64);
    let (detected_tx, detected_rx) = mpsc::channel(16);
    let (saved_tx, saved_rx) = mpsc::channel(16);

    let engine = TrackerEngine::new(config, cache.clone(), detected_tx);
    tokio::spawn(engine.run(events_rx));
    relay::spawn(Relay::new(cache, sink), detected_rx, saved_tx);

    (events_tx, saved_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::definition::Outcome;
    use tokio::time::sleep;

    const PROBLEM_URL: &str = "https://leetcode.com/problems/two-sum/";
    const OTHER_URL: &str = "https://leetcode.com/problems/add-two-numbers/";

    const ACCEPTED_HTML: &str = concat!(
        r#"<div data-e2e-locator="submission-success">Accepted</div>"#,
        r#"<div><span>Runtime: 42 ms</span><span>Memory: 14.2 MB</span></div>"#,
        r#"<div data-cy="lang-select">Rust</div>"#,
    );

    fn test_config() -> TrackerConfig {
        TrackerConfig {
            api_base_url: "http://localhost:5001/api".into(),
            debounce_ms: 10,
            metrics_delay_ms: 150,
            cooldown_ms: 400,
        }
    }

    fn start(
        config: TrackerConfig,
    ) -> (
        Arc<LocalCache>,
        mpsc::Sender<PageEvent>,
        mpsc::Receiver<TrackerMessage>,
    ) {
        let cache = Arc::new(LocalCache::new());
        let (events_tx, events_rx) = mpsc::channel(64);
        let (detected_tx, detected_rx) = mpsc::channel(16);
        let engine = TrackerEngine::new(config, cache.clone(), detected_tx);
        tokio::spawn(engine.run(events_rx));
        (cache, events_tx, detected_rx)
    }

    async fn navigate(tx: &mpsc::Sender<PageEvent>, url: &str, title: &str) {
        tx.send(PageEvent::Navigation {
            url: url.into(),
            title: title.into(),
        })
        .await
        .unwrap();
    }

    async fn mutate(tx: &mpsc::Sender<PageEvent>, html: &str) {
        tx.send(PageEvent::Mutation { html: html.into() }).await.unwrap();
    }

    #[tokio::test]
    async fn accepted_submission_produces_full_record() {
        let (cache, tx, mut detected) = start(test_config());
        navigate(&tx, PROBLEM_URL, "Two Sum - LeetCode").await;
        sleep(Duration::from_millis(1100)).await;
        mutate(&tx, ACCEPTED_HTML).await;

        let Some(TrackerMessage::SubmissionDetected(r)) = detected.recv().await else {
            panic!("expected a detection");
        };
        assert_eq!(r.problem_id, "two-sum");
        assert_eq!(r.title, "Two Sum");
        assert_eq!(r.status, Outcome::Accepted);
        assert!(r.time_spent >= 1);
        assert_eq!(r.runtime, "42 ms");
        assert_eq!(r.memory, "14.2 MB");
        assert_eq!(r.language, "Rust");

        // The stay so far is recorded as a visit interval.
        sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.visits_for("two-sum").await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_triggers_within_cooldown_relay_once() {
        let (_cache, tx, mut detected) = start(test_config());
        navigate(&tx, PROBLEM_URL, "Two Sum - LeetCode").await;
        sleep(Duration::from_millis(1100)).await;

        mutate(&tx, ACCEPTED_HTML).await;
        assert!(matches!(
            detected.recv().await,
            Some(TrackerMessage::SubmissionDetected(_))
        ));

        // Second burst from the same grading result, well within cooldown.
        mutate(&tx, ACCEPTED_HTML).await;
        sleep(Duration::from_millis(200)).await;
        assert!(detected.try_recv().is_err());
    }

    #[tokio::test]
    async fn zero_elapsed_record_never_reaches_relay() {
        let (_cache, tx, mut detected) = start(test_config());
        navigate(&tx, PROBLEM_URL, "Two Sum - LeetCode").await;
        mutate(&tx, ACCEPTED_HTML).await;

        sleep(Duration::from_millis(300)).await;
        assert!(detected.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_banner_produces_nothing() {
        let (_cache, tx, mut detected) = start(test_config());
        navigate(&tx, PROBLEM_URL, "Two Sum - LeetCode").await;
        sleep(Duration::from_millis(1100)).await;
        mutate(&tx, r#"<div class="success">Last Accepted 3 days ago</div>"#).await;

        sleep(Duration::from_millis(300)).await;
        assert!(detected.try_recv().is_err());
    }

    #[tokio::test]
    async fn late_relay_survives_navigation() {
        let (cache, tx, mut detected) = start(test_config());
        navigate(&tx, PROBLEM_URL, "Two Sum - LeetCode").await;
        sleep(Duration::from_millis(1100)).await;
        mutate(&tx, ACCEPTED_HTML).await;

        // Navigate away while extraction/relay is in flight.
        sleep(Duration::from_millis(50)).await;
        navigate(&tx, OTHER_URL, "Add Two Numbers - LeetCode").await;

        // The old problem's record still lands.
        let Some(TrackerMessage::SubmissionDetected(r)) = detected.recv().await else {
            panic!("expected a detection");
        };
        assert_eq!(r.problem_id, "two-sum");

        // And the new problem has a fresh session with its own clock.
        sleep(Duration::from_millis(1100)).await;
        mutate(&tx, ACCEPTED_HTML).await;
        let Some(TrackerMessage::SubmissionDetected(r)) = detected.recv().await else {
            panic!("expected a detection for the new problem");
        };
        assert_eq!(r.problem_id, "add-two-numbers");
        assert!(r.time_spent >= 1);

        assert!(!cache.visits_for("two-sum").await.is_empty());
    }
}
