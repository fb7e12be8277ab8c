use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use talento::models::{Cesantia, Estado, Role, Solicitud, SolicitudTipo, User};
use talento::requests::{RequestKind, RequestStats, attach_user_names, merge_requests};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn cesantia(user_id: Uuid, estado: Estado, minutes: i64) -> Cesantia {
    Cesantia {
        id: Uuid::now_v7(),
        user_id,
        motivo: "Compra de vivienda".to_string(),
        categoria: "vivienda".to_string(),
        file_url: None,
        estado,
        created_at: at(minutes),
        updated_at: at(minutes),
    }
}

fn solicitud(user_id: Uuid, tipo: SolicitudTipo, estado: Estado, minutes: i64) -> Solicitud {
    Solicitud {
        id: Uuid::now_v7(),
        user_id,
        tipo,
        detalles: json!({ "motivo": "Cita médica" }),
        fecha_inicio: None,
        fecha_fin: None,
        file_url: None,
        estado,
        created_at: at(minutes),
        updated_at: at(minutes),
    }
}

#[test]
fn pending_requests_come_first_then_oldest() {
    let user = Uuid::now_v7();
    let cesantias = vec![
        cesantia(user, Estado::Aprobado, 0),
        cesantia(user, Estado::Pendiente, 30),
    ];
    let solicitudes = vec![
        solicitud(user, SolicitudTipo::Permiso, Estado::Pendiente, 10),
        solicitud(user, SolicitudTipo::Vacaciones, Estado::Rechazado, 5),
    ];

    let merged = merge_requests(&cesantias, &solicitudes);
    let order: Vec<(RequestKind, Estado)> = merged.iter().map(|r| (r.kind, r.estado)).collect();
    assert_eq!(
        order,
        [
            (RequestKind::Permiso, Estado::Pendiente),
            (RequestKind::Cesantias, Estado::Pendiente),
            (RequestKind::Cesantias, Estado::Aprobado),
            (RequestKind::Vacaciones, Estado::Rechazado),
        ]
    );
}

#[test]
fn equal_keys_keep_input_order() {
    let user = Uuid::now_v7();
    let first = cesantia(user, Estado::Pendiente, 0);
    let second = solicitud(user, SolicitudTipo::Permiso, Estado::Pendiente, 0);

    let merged = merge_requests(std::slice::from_ref(&first), std::slice::from_ref(&second));
    assert_eq!(merged[0].id, first.id);
    assert_eq!(merged[1].id, second.id);
}

#[test]
fn summaries_carry_a_readable_detail() {
    let user = Uuid::now_v7();
    let merged = merge_requests(
        &[cesantia(user, Estado::Pendiente, 0)],
        &[solicitud(user, SolicitudTipo::Incapacidad, Estado::Pendiente, 1)],
    );
    assert_eq!(merged[0].detail, "vivienda: Compra de vivienda");
    assert_eq!(merged[1].detail, "Cita médica");
}

#[test]
fn user_names_are_attached() {
    let ana = User {
        id: Uuid::now_v7(),
        cedula: "2000000001".to_string(),
        email: "2000000001@talento.local".to_string(),
        password_hash: String::new(),
        name: "Ana".to_string(),
        role: Role::User,
        self_registered: false,
        position: None,
        contact_email: None,
        birth_date: None,
        hire_date: None,
        extra: json!({}),
        created_at: at(0),
    };
    let stranger = Uuid::now_v7();

    let mut merged = merge_requests(
        &[cesantia(ana.id, Estado::Pendiente, 0)],
        &[solicitud(stranger, SolicitudTipo::Permiso, Estado::Pendiente, 1)],
    );
    attach_user_names(&mut merged, &[ana]);
    assert_eq!(merged[0].user_name.as_deref(), Some("Ana"));
    assert_eq!(merged[1].user_name, None);
}

#[test]
fn stats_count_by_state_and_kind() {
    let user = Uuid::now_v7();
    let merged = merge_requests(
        &[
            cesantia(user, Estado::Pendiente, 0),
            cesantia(user, Estado::Aprobado, 1),
        ],
        &[
            solicitud(user, SolicitudTipo::Permiso, Estado::Pendiente, 2),
            solicitud(user, SolicitudTipo::Permiso, Estado::Rechazado, 3),
        ],
    );

    let stats = RequestStats::from_summaries(&merged);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_estado.pendiente, 2);
    assert_eq!(stats.by_estado.aprobado, 1);
    assert_eq!(stats.by_estado.rechazado, 1);
    assert_eq!(stats.by_kind["cesantias"].aprobado, 1);
    assert_eq!(stats.by_kind["permiso"].rechazado, 1);
    assert!(!stats.by_kind.contains_key("vacaciones"));
}

#[test]
fn only_pending_requests_can_be_decided() {
    assert!(Estado::Pendiente.can_transition_to(Estado::Aprobado));
    assert!(Estado::Pendiente.can_transition_to(Estado::Rechazado));
    assert!(!Estado::Pendiente.can_transition_to(Estado::Pendiente));
    assert!(!Estado::Aprobado.can_transition_to(Estado::Rechazado));
    assert!(!Estado::Rechazado.can_transition_to(Estado::Aprobado));
}

#[test]
fn estado_round_trips_through_text() {
    assert_eq!("aprobado".parse::<Estado>(), Ok(Estado::Aprobado));
    assert!("cerrado".parse::<Estado>().is_err());
    assert_eq!(Estado::Rechazado.to_string(), "rechazado");
}
