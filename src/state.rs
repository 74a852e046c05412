use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::slots::SlotGrid;

/// Shared handler state. The single connection behind a mutex doubles as the
/// serialization point for booking submissions: whoever holds it performs
/// the availability check and the insert as one critical section.
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub grid: SlotGrid,
}
