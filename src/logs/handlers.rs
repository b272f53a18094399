use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{instrument, warn};

use super::dto::NutritionLogResponse;
use super::services::create_log;
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/nutrition/log", post(create_nutrition_log))
}

/// POST /nutrition/log
/// Body is the analyzer payload: meal_items, total, health_index.
/// Fields are checked one by one so type mismatches come back as field errors.
#[instrument(skip(state, body))]
pub async fn create_nutrition_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<NutritionLogResponse>)> {
    let Json(body) = body.map_err(|rejection| {
        warn!(%user_id, error = %rejection, "unreadable log body");
        AppError::BadRequest(rejection.body_text())
    })?;
    let row = create_log(state.logs.as_ref(), user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}
