pub mod cache;
pub mod classifier;
pub mod definition;
pub mod engine;
pub mod extractor;
pub mod relay;
pub mod request;
pub mod session;
pub mod snapshot;
pub mod watcher;

pub use cache::{LocalCache, ProblemStats};
pub use definition::{
    Outcome, PageEvent, SubmissionRecord, TrackerConfig, TrackerMessage, VisitInterval,
};
pub use engine::{spawn_pipeline, TrackerEngine};
pub use relay::{RecordSink, Relay};
pub use request::ApiClient;
pub use session::{SessionState, SessionTracker};
pub use snapshot::PageSnapshot;
