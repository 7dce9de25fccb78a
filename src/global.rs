use crate::server::ServerConfig;
use crate::tracker::TrackerConfig;
use once_cell::sync::OnceCell;

static TRACKER_CONFIG: OnceCell<TrackerConfig> = OnceCell::new();
static SERVER_CONFIG: OnceCell<ServerConfig> = OnceCell::new();

use simple_log::{info, LogConfigBuilder};
use std::path::PathBuf;

pub async fn init_config(server_path: PathBuf, tracker_path: PathBuf, logger_path: PathBuf) {
    let server_config = match tokio::fs::read(server_path.as_path()).await {
        Ok(bytes) => {
            serde_json::from_slice::<ServerConfig>(&bytes).expect("failed to parse server config")
        }
        Err(_) => ServerConfig::default(),
    };
    SERVER_CONFIG.set(server_config).unwrap();

    let tracker_config = match tokio::fs::read(tracker_path.as_path()).await {
        Ok(bytes) => {
            serde_json::from_slice::<TrackerConfig>(&bytes).expect("failed to parse tracker config")
        }
        Err(_) => TrackerConfig::default(),
    };
    TRACKER_CONFIG.set(tracker_config).unwrap();

    let log_config = LogConfigBuilder::builder()
        .path(logger_path.as_path().to_str().unwrap())
        .level("info")
        .output_file()
        .output_console()
        .build();
    simple_log::new(log_config).unwrap();
    info!("config loaded");
}

pub fn server_config() -> &'static ServerConfig {
    SERVER_CONFIG.get_or_init(ServerConfig::default)
}

pub fn tracker_config() -> &'static TrackerConfig {
    TRACKER_CONFIG.get_or_init(TrackerConfig::default)
}

pub mod submission_status {
    pub const ACCEPTED: &str = "Accepted";
    pub const FAILED: &str = "Failed";
}

pub mod sentinel {
    pub const NOT_AVAILABLE: &str = "N/A";
    pub const UNKNOWN_LANGUAGE: &str = "Unknown";
    pub const DEFAULT_DIFFICULTY: &str = "Medium";
}

pub mod marker {
    // A banner echoing a previous verdict, not a fresh grading event.
    pub const STALE_RESULT: &str = "Last Accepted";
    pub const ACCEPTED: &str = "Accepted";
    pub const SUCCESS: &str = "Success";
    pub const RUNTIME: &str = "Runtime";
    pub const RUNTIME_ALT: &str = "Time:";
    pub const MEMORY: &str = "Memory";
}

pub mod page_selector {
    pub const SUCCESS_RESULT: &str = r#"[data-e2e-locator="submission-success"]"#;
    pub const SUCCESS_STATUS: &str = r#"[data-e2e-locator="submission-result"]"#;
    pub const SUCCESS_CLASS: &str = r#"[class*="success"]"#;
    pub const LANGUAGE_SELECT: &str = r#"[data-cy="lang-select"]"#;
    pub const DIFFICULTY: &str = r#"[class*="difficulty"]"#;

    // Result containers watched in addition to the generic subtree
    // observation; updates inside them may not bubble a subtree event.
    pub const RESULT_CONTAINERS: [&str; 2] = [SUCCESS_RESULT, SUCCESS_STATUS];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fall_back_to_defaults() {
        assert_eq!(server_config().port, 5001);
        assert_eq!(tracker_config().debounce_ms, 500);
        assert_eq!(tracker_config().cooldown_ms, 10000);
    }
}
