use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use crate::config::MapMode;
use crate::controller::AppState;
use crate::models::restaurant::Location;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route("/client-config", get(get_client_config))
        .route_layer(Extension(ClientConfig {
            map_mode: app_state.map_mode,
            default_center: app_state.default_location,
        }))
}

/// What the browser needs before it can pick a map renderer.
#[derive(Clone, Copy, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub map_mode: MapMode,
    pub default_center: Location,
}

async fn get_health_check() -> Result<StatusCode, StatusCode>
{
    Ok(StatusCode::OK)
}

async fn get_client_config(
    Extension(client_config): Extension<ClientConfig>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(client_config))
}
