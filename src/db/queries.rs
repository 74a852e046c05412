use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentStatus, ContactInfo, GalleryImage, Service};

const APPOINTMENT_COLUMNS: &str =
    "id, service_id, date, time, name, phone, status, duration_minutes, created_at";

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appointment: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, service_id, date, time, name, phone, status, duration_minutes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            appointment.id,
            appointment.service_id,
            appointment.date.format("%Y-%m-%d").to_string(),
            appointment.time.format("%H:%M").to_string(),
            appointment.name,
            appointment.phone,
            appointment.status.as_str(),
            appointment.duration_minutes,
            appointment.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

/// Every appointment recorded for the date, regardless of status. Admin view.
pub fn get_appointments_for_date(
    conn: &Connection,
    date: NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE date = ?1 ORDER BY time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

/// The appointments that occupy slots: cancelled ones have released theirs.
pub fn get_active_appointments_for_date(
    conn: &Connection,
    date: NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE date = ?1 AND status != 'cancelled' ORDER BY time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn get_appointment_by_id(
    conn: &Connection,
    id: &str,
) -> anyhow::Result<Option<Appointment>> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_appointment_row(row)));

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_appointments(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE status = ?1 ORDER BY date DESC, time DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 ORDER BY date DESC, time DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_appointment(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let service_id: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let time_str: String = row.get(3)?;
    let name: String = row.get(4)?;
    let phone: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let duration_minutes: i32 = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(Appointment {
        id,
        service_id,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
        time: NaiveTime::parse_from_str(&time_str, "%H:%M")?,
        name,
        phone,
        status: AppointmentStatus::parse(&status_str),
        duration_minutes,
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    })
}

// ── Services ──

pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, duration_minutes, price FROM services ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            duration_minutes: row.get(3)?,
            price: row.get(4)?,
        })
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, description, duration_minutes, price FROM services WHERE id = ?1",
        params![id],
        |row| {
            Ok(Service {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                duration_minutes: row.get(3)?,
                price: row.get(4)?,
            })
        },
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, name, description, duration_minutes, price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            service.id,
            service.name,
            service.description,
            service.duration_minutes,
            service.price,
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2, duration_minutes = ?3, price = ?4
         WHERE id = ?5",
        params![
            service.name,
            service.description,
            service.duration_minutes,
            service.price,
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Gallery ──

pub fn list_gallery(conn: &Connection) -> anyhow::Result<Vec<GalleryImage>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, description, created_at FROM gallery ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        let created_at_str: String = row.get(3)?;
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            created_at_str,
        ))
    })?;

    let mut images = vec![];
    for row in rows {
        let (id, url, description, created_at_str) = row?;
        images.push(GalleryImage {
            id,
            url,
            description,
            created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_else(|_| Utc::now().naive_utc()),
        });
    }
    Ok(images)
}

pub fn create_gallery_image(conn: &Connection, image: &GalleryImage) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO gallery (id, url, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            image.id,
            image.url,
            image.description,
            image.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn delete_gallery_image(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM gallery WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Contact ──

pub fn get_contact(conn: &Connection) -> anyhow::Result<Option<ContactInfo>> {
    let result = conn.query_row(
        "SELECT address, phone, email, schedule FROM contact WHERE id = 'default'",
        [],
        |row| {
            Ok(ContactInfo {
                address: row.get(0)?,
                phone: row.get(1)?,
                email: row.get(2)?,
                schedule: row.get(3)?,
            })
        },
    );

    match result {
        Ok(contact) => Ok(Some(contact)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_contact(conn: &Connection, contact: &ContactInfo) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO contact (id, address, phone, email, schedule)
         VALUES ('default', ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           address = excluded.address,
           phone = excluded.phone,
           email = excluded.email,
           schedule = excluded.schedule",
        params![contact.address, contact.phone, contact.email, contact.schedule],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn sample_appointment(id: &str, time: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            service_id: "cut".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            name: "Alice".to_string(),
            phone: "+34911223344".to_string(),
            status: AppointmentStatus::Pending,
            duration_minutes: 30,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_appointment_round_trip() {
        let conn = setup_db();
        let appointment = sample_appointment("apt-1", "10:00");
        create_appointment(&conn, &appointment).unwrap();

        let stored = get_appointment_by_id(&conn, "apt-1").unwrap().unwrap();
        assert_eq!(stored.date, appointment.date);
        assert_eq!(stored.time, appointment.time);
        assert_eq!(stored.status, AppointmentStatus::Pending);
        assert_eq!(stored.duration_minutes, 30);
    }

    #[test]
    fn test_date_queries_filter_cancelled() {
        let conn = setup_db();
        create_appointment(&conn, &sample_appointment("apt-1", "10:00")).unwrap();
        create_appointment(&conn, &sample_appointment("apt-2", "11:00")).unwrap();
        update_appointment_status(&conn, "apt-2", AppointmentStatus::Cancelled).unwrap();

        let all = get_appointments_for_date(&conn, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
            .unwrap();
        assert_eq!(all.len(), 2);

        let active =
            get_active_appointments_for_date(&conn, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
                .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "apt-1");
    }

    #[test]
    fn test_update_and_delete_report_missing_ids() {
        let conn = setup_db();
        assert!(!update_appointment_status(&conn, "ghost", AppointmentStatus::Confirmed).unwrap());
        assert!(!delete_appointment(&conn, "ghost").unwrap());

        create_appointment(&conn, &sample_appointment("apt-1", "10:00")).unwrap();
        assert!(delete_appointment(&conn, "apt-1").unwrap());
        assert!(get_appointment_by_id(&conn, "apt-1").unwrap().is_none());
    }

    #[test]
    fn test_service_crud() {
        let conn = setup_db();
        let mut service = Service {
            id: "cut".to_string(),
            name: "Haircut".to_string(),
            description: "Wash and cut".to_string(),
            duration_minutes: 30,
            price: 18.0,
        };
        create_service(&conn, &service).unwrap();
        assert_eq!(list_services(&conn).unwrap().len(), 1);

        service.price = 20.0;
        assert!(update_service(&conn, &service).unwrap());
        let stored = get_service_by_id(&conn, "cut").unwrap().unwrap();
        assert_eq!(stored.price, 20.0);

        assert!(delete_service(&conn, "cut").unwrap());
        assert!(get_service_by_id(&conn, "cut").unwrap().is_none());
    }

    #[test]
    fn test_contact_is_a_singleton() {
        let conn = setup_db();
        assert!(get_contact(&conn).unwrap().is_none());

        save_contact(
            &conn,
            &ContactInfo {
                address: "Calle Mayor 1".to_string(),
                phone: "+34911000000".to_string(),
                email: "hola@salon.example".to_string(),
                schedule: "Mon-Sat 09:00-18:00".to_string(),
            },
        )
        .unwrap();
        save_contact(
            &conn,
            &ContactInfo {
                address: "Calle Mayor 2".to_string(),
                phone: "+34911000000".to_string(),
                email: "hola@salon.example".to_string(),
                schedule: "Mon-Sat 09:00-18:00".to_string(),
            },
        )
        .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contact", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(get_contact(&conn).unwrap().unwrap().address, "Calle Mayor 2");
    }
}
