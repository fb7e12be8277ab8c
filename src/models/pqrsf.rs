use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum PqrsfTipo {
    Peticion,
    Queja,
    Reclamo,
    Sugerencia,
    Felicitacion,
}

text_enum!(PqrsfTipo {
    Peticion => "peticion",
    Queja => "queja",
    Reclamo => "reclamo",
    Sugerencia => "sugerencia",
    Felicitacion => "felicitacion",
});

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Pqrsf {
    pub id: Uuid,
    /// `None` for anonymous messages.
    pub user_id: Option<Uuid>,
    pub tipo: PqrsfTipo,
    pub mensaje: String,
    pub anonimo: bool,
    pub created_at: DateTime<Utc>,
}
