use super::definition::VisitInterval;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No problem page under observation.
    Idle,
    /// Clock running, awaiting a graded result.
    Timing,
    /// Result detected; metrics extraction and relay in flight. Further
    /// classifier signals are ignored until this completes.
    Processing,
    /// Result relayed; ignoring triggers until the cooldown window elapses.
    Cooldown,
}

/// Transient per-problem tracking state. Exists only for the duration of the
/// page visit; never persisted.
#[derive(Debug)]
struct ProblemSession {
    problem_id: String,
    state: SessionState,
    clock_start: Instant,
    visit_start: DateTime<Utc>,
    last_submission: Option<Instant>,
}

/// State machine owning the elapsed-time clock and the duplicate-suppression
/// guards. All transitions take explicit instants so behavior is
/// deterministic under test.
#[derive(Debug)]
pub struct SessionTracker {
    cooldown: Duration,
    session: Option<ProblemSession>,
}

impl SessionTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |s| s.state)
    }

    pub fn is_timing(&self) -> bool {
        self.state() == SessionState::Timing
    }

    pub fn problem_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.problem_id.as_str())
    }

    /// Re-arm lazily: once the cooldown window has elapsed, return to Timing
    /// with the clock backdated to the instant the window closed.
    pub fn poll(&mut self, now: Instant) {
        let Some(s) = self.session.as_mut() else {
            return;
        };
        if s.state == SessionState::Cooldown {
            if let Some(last) = s.last_submission {
                let rearm_at = last + self.cooldown;
                if now >= rearm_at {
                    s.state = SessionState::Timing;
                    s.clock_start = rearm_at;
                }
            }
        }
    }

    /// Problem navigation: close the old visit interval, start a fresh
    /// session (and clock) for the new identifier. `None` means the new page
    /// is not a problem page.
    pub fn navigate(
        &mut self,
        problem_id: Option<String>,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Option<(String, VisitInterval)> {
        let closed = self.session.take().map(|s| {
            (
                s.problem_id,
                VisitInterval {
                    start_time: s.visit_start,
                    end_time: wall,
                },
            )
        });
        if let Some(problem_id) = problem_id {
            self.session = Some(ProblemSession {
                problem_id,
                state: SessionState::Timing,
                clock_start: now,
                visit_start: wall,
                last_submission: None,
            });
        }
        closed
    }

    /// Accept a classifier signal: only while Timing and only once the
    /// cooldown since the previous submission has passed. Returns the elapsed
    /// seconds, computed here and never recomputed afterwards.
    pub fn try_begin_processing(&mut self, now: Instant) -> Option<u64> {
        let s = self.session.as_mut()?;
        if s.state != SessionState::Timing {
            return None;
        }
        if let Some(last) = s.last_submission {
            if now.duration_since(last) < self.cooldown {
                return None;
            }
        }
        s.state = SessionState::Processing;
        Some(now.duration_since(s.clock_start).as_secs())
    }

    /// The detected record turned out invalid; drop back to Timing with the
    /// original clock so a genuine later result still measures from the
    /// session start.
    pub fn abort_processing(&mut self) {
        if let Some(s) = self.session.as_mut() {
            if s.state == SessionState::Processing {
                s.state = SessionState::Timing;
            }
        }
    }

    /// Relay finished (successfully or not); enter the cooldown window.
    pub fn finish_processing(&mut self, now: Instant) {
        if let Some(s) = self.session.as_mut() {
            if s.state == SessionState::Processing {
                s.state = SessionState::Cooldown;
                s.last_submission = Some(now);
            }
        }
    }

    /// Close the current visit interval (submission recorded mid-stay) and
    /// start a new one.
    pub fn close_visit(&mut self, wall: DateTime<Utc>) -> Option<(String, VisitInterval)> {
        let s = self.session.as_mut()?;
        let interval = VisitInterval {
            start_time: s.visit_start,
            end_time: wall,
        };
        s.visit_start = wall;
        Some((s.problem_id.clone(), interval))
    }
}
