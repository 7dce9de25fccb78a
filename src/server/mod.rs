pub mod definition;
pub mod error;
pub mod server;
pub mod store;

pub use definition::{CreateSubmission, ListQuery, ServerConfig, StoredSubmission};
pub use error::ApiError;
pub use server::{make_http_server, make_router};
pub use store::SubmissionStore;
