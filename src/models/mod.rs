mod calendar_event;
mod cesantia;
mod document;
mod pqrsf;
mod solicitud;
mod user;

pub use calendar_event::{CalendarEvent, EventType};
pub use cesantia::Cesantia;
pub use document::Document;
pub use pqrsf::{Pqrsf, PqrsfTipo};
pub use solicitud::{Solicitud, SolicitudTipo};
pub use user::{Role, User};

use serde::{Deserialize, Serialize};

/// Display and parsing for the lowercase enums. Storage goes through the
/// `sqlx::Type` derive on each enum.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $($name::$variant => $text,)+
                })
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(concat!("Invalid ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

pub(crate) use text_enum;

/// Review state shared by cesantias and solicitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Estado {
    Pendiente,
    Aprobado,
    Rechazado,
}

text_enum!(Estado {
    Pendiente => "pendiente",
    Aprobado => "aprobado",
    Rechazado => "rechazado",
});

impl Estado {
    /// Only a pending request can be decided, and only into a final state.
    pub fn can_transition_to(self, next: Estado) -> bool {
        self == Estado::Pendiente && next != Estado::Pendiente
    }
}
