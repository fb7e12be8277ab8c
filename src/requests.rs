//! Severance and leave requests merged into one review queue.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Cesantia, Estado, Solicitud, SolicitudTipo, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Cesantias,
    Permiso,
    Vacaciones,
    Incapacidad,
}

impl RequestKind {
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::Cesantias => "cesantias",
            RequestKind::Permiso => "permiso",
            RequestKind::Vacaciones => "vacaciones",
            RequestKind::Incapacidad => "incapacidad",
        }
    }
}

impl From<SolicitudTipo> for RequestKind {
    fn from(tipo: SolicitudTipo) -> Self {
        match tipo {
            SolicitudTipo::Permiso => RequestKind::Permiso,
            SolicitudTipo::Vacaciones => RequestKind::Vacaciones,
            SolicitudTipo::Incapacidad => RequestKind::Incapacidad,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub id: Uuid,
    pub kind: RequestKind,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub estado: Estado,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Cesantia> for RequestSummary {
    fn from(c: &Cesantia) -> Self {
        RequestSummary {
            id: c.id,
            kind: RequestKind::Cesantias,
            user_id: c.user_id,
            user_name: None,
            estado: c.estado,
            detail: format!("{}: {}", c.categoria, c.motivo),
            created_at: c.created_at,
        }
    }
}

impl From<&Solicitud> for RequestSummary {
    fn from(s: &Solicitud) -> Self {
        let detail = ["motivo", "descripcion", "observaciones"]
            .iter()
            .find_map(|key| s.detalles.get(*key).and_then(|v| v.as_str()))
            .unwrap_or_default()
            .to_string();

        RequestSummary {
            id: s.id,
            kind: s.tipo.into(),
            user_id: s.user_id,
            user_name: None,
            estado: s.estado,
            detail,
            created_at: s.created_at,
        }
    }
}

/// Pending requests first, then oldest first.
pub fn review_order(a: &RequestSummary, b: &RequestSummary) -> Ordering {
    let a_done = a.estado != Estado::Pendiente;
    let b_done = b.estado != Estado::Pendiente;
    a_done
        .cmp(&b_done)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Merge both collections into the review queue. The sort is stable, so
/// requests with equal keys keep their input order.
pub fn merge_requests(cesantias: &[Cesantia], solicitudes: &[Solicitud]) -> Vec<RequestSummary> {
    let mut merged: Vec<RequestSummary> = cesantias
        .iter()
        .map(RequestSummary::from)
        .chain(solicitudes.iter().map(RequestSummary::from))
        .collect();
    merged.sort_by(review_order);
    merged
}

pub fn attach_user_names(summaries: &mut [RequestSummary], users: &[User]) {
    let names: HashMap<Uuid, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();
    for summary in summaries.iter_mut() {
        summary.user_name = names.get(&summary.user_id).map(|n| n.to_string());
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EstadoCounts {
    pub pendiente: usize,
    pub aprobado: usize,
    pub rechazado: usize,
}

impl EstadoCounts {
    fn add(&mut self, estado: Estado) {
        match estado {
            Estado::Pendiente => self.pendiente += 1,
            Estado::Aprobado => self.aprobado += 1,
            Estado::Rechazado => self.rechazado += 1,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RequestStats {
    pub total: usize,
    pub by_estado: EstadoCounts,
    pub by_kind: BTreeMap<&'static str, EstadoCounts>,
}

impl RequestStats {
    pub fn from_summaries(summaries: &[RequestSummary]) -> Self {
        let mut stats = RequestStats::default();
        for summary in summaries {
            stats.total += 1;
            stats.by_estado.add(summary.estado);
            stats
                .by_kind
                .entry(summary.kind.label())
                .or_default()
                .add(summary.estado);
        }
        stats
    }
}
