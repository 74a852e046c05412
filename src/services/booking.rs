use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::availability;
use crate::services::slots::SlotGrid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("requested time is outside business hours ({hours})")]
    OutOfHours { hours: String },

    #[error("that time slot is already booked")]
    SlotTaken,

    #[error("invalid booking request: {0}")]
    InvalidInput(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub phone: String,
}

/// Validate a booking request against the current appointment set and, if it
/// holds, persist it with status pending.
///
/// The caller passes the connection it already holds the state mutex for, so
/// the availability check and the insert cannot interleave with another
/// submission for the same date.
pub fn submit_booking(
    conn: &Connection,
    grid: &SlotGrid,
    request: &BookingRequest,
) -> Result<Appointment, BookingError> {
    validate_contact(&request.name, &request.phone)?;

    let service = queries::get_service_by_id(conn, &request.service_id)?
        .ok_or_else(|| BookingError::UnknownService(request.service_id.clone()))?;
    if service.duration_minutes <= 0 {
        return Err(BookingError::InvalidInput(format!(
            "service {} has a non-positive duration",
            service.id
        )));
    }

    let Some(start_idx) = grid.index_of(request.time) else {
        if request.time < grid.open() || request.time >= grid.close() {
            return Err(BookingError::OutOfHours {
                hours: grid.hours_label(),
            });
        }
        return Err(BookingError::InvalidInput(format!(
            "time {} does not align to the {}-minute slot grid",
            request.time.format("%H:%M"),
            grid.slot_minutes(),
        )));
    };

    let positions = grid.positions();
    let needed = grid.slots_needed(service.duration_minutes);
    if start_idx + needed > positions.len() {
        // The booking would run past closing, regardless of occupancy.
        return Err(BookingError::OutOfHours {
            hours: grid.hours_label(),
        });
    }

    // Re-fetch at submission time; an earlier availability read may be stale.
    let existing = queries::get_active_appointments_for_date(conn, request.date)?;
    let occupied = availability::occupied_positions(grid, &existing);
    if positions[start_idx..start_idx + needed]
        .iter()
        .any(|t| occupied.contains(t))
    {
        return Err(BookingError::SlotTaken);
    }

    let appointment = Appointment {
        id: uuid::Uuid::new_v4().to_string(),
        service_id: service.id.clone(),
        date: request.date,
        time: request.time,
        name: request.name.trim().to_string(),
        phone: request.phone.trim().to_string(),
        status: AppointmentStatus::Pending,
        duration_minutes: service.duration_minutes,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_appointment(conn, &appointment)?;

    tracing::info!(
        id = %appointment.id,
        date = %appointment.date,
        time = %appointment.time.format("%H:%M"),
        "appointment booked"
    );

    Ok(appointment)
}

fn validate_contact(name: &str, phone: &str) -> Result<(), BookingError> {
    if name.trim().is_empty() {
        return Err(BookingError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < 7 {
        return Err(BookingError::InvalidInput(
            "phone number must contain at least 7 digits".to_string(),
        ));
    }
    Ok(())
}
