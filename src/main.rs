use leettrack::global;
use leettrack::server::{make_http_server, SubmissionStore};
use std::str::FromStr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let (server_path, tracker_path, logger_path) = if args.len() >= 4 {
        (
            std::path::PathBuf::from_str(&args[1]).unwrap(),
            std::path::PathBuf::from_str(&args[2]).unwrap(),
            std::path::PathBuf::from_str(&args[3]).unwrap(),
        )
    } else {
        (
            std::path::PathBuf::from_str("server.json").unwrap(),
            std::path::PathBuf::from_str("tracker_config.json").unwrap(),
            std::path::PathBuf::from_str("leettrack.log").unwrap(),
        )
    };

    global::init_config(server_path, tracker_path, logger_path).await;
    make_http_server(Arc::new(SubmissionStore::new())).await;
    Ok(())
}
