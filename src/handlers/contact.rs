use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::ContactInfo;
use crate::state::AppState;

use super::check_auth;

// GET /api/contact — an unset card comes back with empty fields rather
// than 404 so the public page can always render something.
pub async fn get(State(state): State<Arc<AppState>>) -> Result<Json<ContactInfo>, AppError> {
    let contact = {
        let db = state.db.lock().unwrap();
        queries::get_contact(&db)?
    };
    Ok(Json(contact.unwrap_or_default()))
}

// PUT /api/contact
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ContactInfo>,
) -> Result<Json<ContactInfo>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.db.lock().unwrap();
        queries::save_contact(&db, &body)?;
    }

    Ok(Json(body))
}
