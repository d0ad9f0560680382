use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the players table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl PlayerModel {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        }
    }

    /// Generates a guest name for requests that arrive without one
    pub fn guest_name() -> String {
        format!("guest-{}", petname::Petnames::default().generate_one(2, "-"))
    }
}
