use serde::{Deserialize, Serialize};

/// Singleton salon contact card shown on the public site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub schedule: String,
}
