use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::GalleryImage;
use crate::state::AppState;

use super::check_auth;

// GET /api/gallery
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    let images = {
        let db = state.db.lock().unwrap();
        queries::list_gallery(&db)?
    };
    Ok(Json(images))
}

// POST /api/gallery
//
// Image bytes live with the external image host; this only records the
// hosted URL and its caption.
#[derive(Deserialize)]
pub struct CreateImageRequest {
    pub url: String,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateImageRequest>,
) -> Result<(StatusCode, Json<GalleryImage>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if body.url.trim().is_empty() {
        return Err(AppError::InvalidInput("image url must not be empty".to_string()));
    }

    let image = GalleryImage {
        id: uuid::Uuid::new_v4().to_string(),
        url: body.url.trim().to_string(),
        description: body.description.unwrap_or_default(),
        created_at: Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_gallery_image(&db, &image)?;
    }

    Ok((StatusCode::CREATED, Json(image)))
}

// DELETE /api/gallery/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_gallery_image(&db, &id)?
    };

    if deleted {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("gallery image {id}")))
    }
}
