use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    nutrition::NutritionPayload,
    state::AppState,
};

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/nutrition/analyze", post(analyze_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

struct Upload {
    body: Bytes,
    content_type: String,
}

/// POST /nutrition/analyze (multipart)
/// Field: image
#[instrument(skip(state, mp))]
pub async fn analyze_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> AppResult<Json<NutritionPayload>> {
    let upload = read_image_field(&mut mp).await?;

    let payload = state
        .analyzer
        .analyze(upload.body, &upload.content_type)
        .await?;

    info!(
        %user_id,
        items = payload.meal_items.as_ref().map_or(0, Vec::len),
        "meal photo analyzed"
    );
    Ok(Json(payload))
}

async fn read_image_field(mp: &mut Multipart) -> AppResult<Upload> {
    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(Upload { body, content_type });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("image is required".into()))?;
    if !upload.content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Upload a valid image.".into()));
    }
    if upload.body.is_empty() {
        return Err(AppError::BadRequest("The submitted file is empty.".into()));
    }
    Ok(upload)
}
