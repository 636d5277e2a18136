//! App update handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json as ResponseJson;

use crate::dto::updates::*;
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::AppState;

/// Reports the releases newer than the caller's version
pub async fn check_updates(
    State(state): State<AppState>,
    Query(query): Query<CheckUpdatesQuery>,
) -> Result<ResponseJson<CheckUpdatesResponse>, ApiError> {
    let check = state
        .updates
        .check(&query.version, &query.platform, &query.component)
        .await?;
    Ok(ResponseJson(check.into()))
}

/// Issues a time-limited package download URL
pub async fn download_update(
    State(state): State<AppState>,
    Query(query): Query<DownloadUpdateQuery>,
) -> Result<ResponseJson<DownloadUpdateResponse>, ApiError> {
    let version = query
        .version
        .ok_or_else(|| ApiError::Validation("version parameter required".to_string()))?;
    let link = state
        .updates
        .download(&version, &query.platform, &query.component)
        .await?;
    Ok(ResponseJson(DownloadUpdateResponse {
        download_url: link.download_url,
        expires_in: link.expires_in,
    }))
}

/// Registers a new release (admin endpoint)
pub async fn register_version(
    State(state): State<AppState>,
    Json(request): Json<RegisterVersionRequest>,
) -> Result<(StatusCode, ResponseJson<MessageResponse>), ApiError> {
    state.updates.register(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(MessageResponse::new("version registered successfully")),
    ))
}
