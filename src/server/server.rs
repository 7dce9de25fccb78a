use super::definition::{CreateSubmission, ListQuery, StoredSubmission};
use super::error::ApiError;
use super::store::SubmissionStore;
use crate::global;
use axum::{
    extract::{Query, State},
    http::{header, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use simple_log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn make_router(store: Arc<SubmissionStore>, access_token: Option<String>) -> Router {
    // The extension popup calls in from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/submissions",
            get(list_submissions).post(create_submission),
        )
        .route_layer(middleware::from_fn_with_state(
            access_token,
            check_access_token,
        ))
        .layer(cors)
        .with_state(store)
}

pub async fn make_http_server(store: Arc<SubmissionStore>) {
    let config = global::server_config();
    let addr = format!("{}:{}", config.host, config.port);
    info!("submission api: {}", addr);

    let router = make_router(store, config.access_token.clone());
    axum::Server::bind(&addr.parse().unwrap())
        .serve(router.into_make_service())
        .await
        .unwrap();
}

async fn check_access_token<B>(
    State(token): State<Option<String>>,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    let Some(token) = token else {
        return next.run(req).await;
    };
    match req
        .headers()
        .get("ACCESS_TOKEN")
        .and_then(|v| v.to_str().ok())
    {
        Some(t) if t == token => next.run(req).await,
        _ => ApiError::AccessDenied.into_response(),
    }
}

async fn create_submission(
    State(store): State<Arc<SubmissionStore>>,
    Json(payload): Json<CreateSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = store.insert(payload).await?;
    info!(
        "submission stored: {} {} {}s",
        stored.problem_id,
        stored.status.as_str(),
        stored.time_spent
    );
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Submission Saved Successfully",
            "data": stored
        })),
    ))
}

async fn list_submissions(
    State(store): State<Arc<SubmissionStore>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<StoredSubmission>> {
    Json(store.list(&query).await)
}
