use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub salon_name: String,
    pub open_time: String,
    pub close_time: String,
    pub slot_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salonbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            salon_name: env::var("SALON_NAME").unwrap_or_else(|_| "Salon".to_string()),
            open_time: env::var("OPEN_TIME").unwrap_or_else(|_| "09:00".to_string()),
            close_time: env::var("CLOSE_TIME").unwrap_or_else(|_| "18:00".to_string()),
            slot_minutes: env::var("SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
