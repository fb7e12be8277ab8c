use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Estado, text_enum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum SolicitudTipo {
    Permiso,
    Vacaciones,
    Incapacidad,
}

text_enum!(SolicitudTipo {
    Permiso => "permiso",
    Vacaciones => "vacaciones",
    Incapacidad => "incapacidad",
});

impl SolicitudTipo {
    /// Vacations and sick leave cover a date range; a permission may be a few hours.
    pub fn requires_dates(self) -> bool {
        matches!(self, SolicitudTipo::Vacaciones | SolicitudTipo::Incapacidad)
    }
}

/// Leave, permission or sick-leave request. `detalles` holds the
/// sub-fields that vary by `tipo`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Solicitud {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tipo: SolicitudTipo,
    pub detalles: serde_json::Value,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub file_url: Option<String>,
    pub estado: Estado,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
