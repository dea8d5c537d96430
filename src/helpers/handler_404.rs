use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::debug;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No restaurant endpoint at {}", uri.path()) })),
    )
}
