use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::availability;
use crate::services::booking::{self, BookingRequest};
use crate::services::calendar::generate_ics;
use crate::state::AppState;

use super::check_auth;

#[derive(Serialize)]
pub struct AppointmentResponse {
    id: String,
    service_id: String,
    date: String,
    time: String,
    name: String,
    phone: String,
    status: String,
    duration_minutes: i32,
    created_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            service_id: a.service_id,
            date: a.date.format("%Y-%m-%d").to_string(),
            time: a.time.format("%H:%M").to_string(),
            name: a.name,
            phone: a.phone,
            status: a.status.as_str().to_string(),
            duration_minutes: a.duration_minutes,
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid date: {s}, expected YYYY-MM-DD")))
}

fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| AppError::InvalidInput(format!("invalid time: {s}, expected HH:MM")))
}

// GET /api/appointments/day/:date
pub async fn list_for_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let date = parse_date(&date)?;

    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_appointments_for_date(&db, date)?
    };

    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

// GET /api/availability?date=...&service_id=...
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_id: String,
}

#[derive(Serialize)]
pub struct SlotResponse {
    time: String,
    available: bool,
}

pub async fn availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let date = parse_date(&query.date)?;

    let slots = {
        let db = state.db.lock().unwrap();
        let service = queries::get_service_by_id(&db, &query.service_id)?
            .ok_or_else(|| AppError::NotFound(format!("service {}", query.service_id)))?;
        let existing = queries::get_active_appointments_for_date(&db, date)?;
        availability::day_availability(&state.grid, service.duration_minutes, &existing)
    };

    Ok(Json(
        slots
            .into_iter()
            .map(|s| SlotResponse {
                time: s.time.format("%H:%M").to_string(),
                available: s.available,
            })
            .collect(),
    ))
}

// POST /api/appointments
#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub phone: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let request = BookingRequest {
        service_id: body.service_id,
        date: parse_date(&body.date)?,
        time: parse_time(&body.time)?,
        name: body.name,
        phone: body.phone,
    };

    // One lock acquisition covers the availability check and the insert, so
    // two submissions for the same slot cannot both pass validation.
    let appointment = {
        let db = state.db.lock().unwrap();
        booking::submit_booking(&db, &state.grid, &request)?
    };

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

// GET /api/appointments?status=...&limit=...
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_all_appointments(&db, query.status.as_deref(), limit)?
    };

    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

// PATCH /api/appointments/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let next = AppointmentStatus::try_parse(&body.status)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown status: {}", body.status)))?;

    let db = state.db.lock().unwrap();
    let appointment = queries::get_appointment_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;

    if !appointment.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "cannot move appointment from {} to {}",
            appointment.status.as_str(),
            next.as_str(),
        )));
    }

    queries::update_appointment_status(&db, &id, next)?;
    tracing::info!(id = %id, status = next.as_str(), "appointment status updated");

    let updated = Appointment {
        status: next,
        ..appointment
    };
    Ok(Json(updated.into()))
}

// DELETE /api/appointments/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_appointment(&db, &id)?
    };

    if deleted {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("appointment {id}")))
    }
}

// GET /api/appointments/:id/ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (appointment, service) = {
        let db = state.db.lock().unwrap();
        let appointment = queries::get_appointment_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
        let service = queries::get_service_by_id(&db, &appointment.service_id)?;
        (appointment, service)
    };

    let ics = generate_ics(
        &appointment,
        &state.config.salon_name,
        service.as_ref().map(|s| s.name.as_str()),
    );
    let filename = format!("appointment-{id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
