use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

text_enum!(Role {
    User => "user",
    Admin => "admin",
});

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub cedula: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    /// Created through open registration and not yet claimed by an HR import.
    #[serde(skip_serializing, default)]
    pub self_registered: bool,
    pub position: Option<String>,
    pub contact_email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    /// Bank, insurance providers and any other HR column without a dedicated field.
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Where notifications for this employee go, if anywhere.
    pub fn notification_address(&self) -> Option<&str> {
        self.contact_email.as_deref().filter(|e| !e.trim().is_empty())
    }
}
