use chrono::Duration;

use crate::models::Appointment;

/// Render a single appointment as an iCalendar event the customer can
/// import into their own calendar. The service name is looked up by the
/// caller; an appointment whose service was since deleted still exports.
pub fn generate_ics(
    appointment: &Appointment,
    salon_name: &str,
    service_name: Option<&str>,
) -> String {
    let start = appointment.date.and_time(appointment.time);
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(appointment.duration_minutes as i64))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = appointment.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@salonbook", appointment.id);

    let summary = match service_name {
        Some(service) => format!("{service} at {salon_name}"),
        None => format!("Appointment at {salon_name}"),
    };
    let description = format!("Booked by {}", appointment.name);

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Salonbook//Booking//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}
