use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Estado;

/// Severance-fund withdrawal request.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Cesantia {
    pub id: Uuid,
    pub user_id: Uuid,
    pub motivo: String,
    pub categoria: String,
    pub file_url: Option<String>,
    pub estado: Estado,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
