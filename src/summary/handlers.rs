use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::report::DailySummaryResponse;
use super::services::{daily_summaries, DateRange, SummaryQuery};
use crate::{auth::jwt::AuthUser, error::AppResult, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/nutrition/summary", get(get_summary))
}

/// GET /nutrition/summary?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SummaryQuery>,
) -> AppResult<Json<Vec<DailySummaryResponse>>> {
    let range = DateRange::parse(q.start_date.as_deref(), q.end_date.as_deref())?;
    let days = daily_summaries(state.logs.as_ref(), user_id, range).await?;
    Ok(Json(days))
}
