use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Service;
use crate::state::AppState;

use super::check_auth;

// GET /api/services
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::list_services(&db)?
    };
    Ok(Json(services))
}

#[derive(Deserialize)]
pub struct ServiceBody {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
}

fn validate_service_body(body: &ServiceBody) -> Result<(), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::InvalidInput("service name must not be empty".to_string()));
    }
    if body.duration_minutes <= 0 {
        return Err(AppError::InvalidInput(
            "service duration must be positive".to_string(),
        ));
    }
    if body.price < 0.0 {
        return Err(AppError::InvalidInput("price must not be negative".to_string()));
    }
    Ok(())
}

// POST /api/services
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ServiceBody>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_service_body(&body)?;

    let service = Service {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        description: body.description.unwrap_or_default(),
        duration_minutes: body.duration_minutes,
        price: body.price,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_service(&db, &service)?;
    }

    Ok((StatusCode::CREATED, Json(service)))
}

// PUT /api/services/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ServiceBody>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_service_body(&body)?;

    let service = Service {
        id: id.clone(),
        name: body.name.trim().to_string(),
        description: body.description.unwrap_or_default(),
        duration_minutes: body.duration_minutes,
        price: body.price,
    };

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_service(&db, &service)?
    };

    if updated {
        Ok(Json(service))
    } else {
        Err(AppError::NotFound(format!("service {id}")))
    }
}

// DELETE /api/services/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_service(&db, &id)?
    };

    if deleted {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("service {id}")))
    }
}
