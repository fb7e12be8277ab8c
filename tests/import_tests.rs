use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use serde_json::{Value, json};
use uuid::Uuid;

use talento::import::provision::{ProvisionError, Provisioned, Provisioner};
use talento::import::sheet::{EmployeeRecord, Row, clean_cedula, normalize_header, parse_csv};
use talento::import::{RowStatus, run_import};

fn bogota() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Records every provisioned cedula; fails the ones listed in `reject`.
#[derive(Default)]
struct FakeProvisioner {
    seen: Mutex<Vec<String>>,
    reject: Vec<&'static str>,
}

#[async_trait]
impl Provisioner for FakeProvisioner {
    async fn provision(&self, record: &EmployeeRecord) -> Result<Provisioned, ProvisionError> {
        self.seen.lock().unwrap().push(record.cedula.clone());
        if self.reject.contains(&record.cedula.as_str()) {
            return Err(ProvisionError::from("Database unavailable".to_string()));
        }
        Ok(Provisioned {
            uid: Uuid::now_v7(),
            email: format!("{}@talento.test", record.cedula),
            created: true,
        })
    }
}

#[tokio::test]
async fn a_bad_row_does_not_stop_the_import() {
    let rows = vec![
        row(json!({ "Número Documento": "1001", "Nombre": "Ana" })),
        row(json!({ "Nombre": "Sin Documento" })),
        row(json!({ "Número Documento": "1003", "Nombre": "Luis" })),
    ];
    let provisioner = FakeProvisioner::default();

    let report = run_import(&provisioner, &rows, bogota(), Duration::ZERO).await;

    assert_eq!(report.success, 2);
    assert_eq!(report.failed, 1);
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 2);
    assert_eq!(errors[0].message, "Missing Número Documento");
    assert_eq!(*provisioner.seen.lock().unwrap(), ["1001", "1003"]);
}

#[tokio::test]
async fn provisioning_failures_are_reported_per_row() {
    let rows = vec![
        row(json!({ "cedula": "1001", "nombre": "Ana" })),
        row(json!({ "cedula": "1002", "nombre": "Luis" })),
    ];
    let provisioner = FakeProvisioner {
        reject: vec!["1001"],
        ..Default::default()
    };

    let report = run_import(&provisioner, &rows, bogota(), Duration::ZERO).await;

    assert_eq!(report.results[0].status, RowStatus::Failed);
    assert_eq!(report.results[0].cedula.as_deref(), Some("1001"));
    assert_eq!(report.results[0].message, "Database unavailable");
    assert_eq!(report.results[1].status, RowStatus::Success);
    assert_eq!(report.results[1].message, "Created 1002@talento.test");
    assert!(report.results[1].uid.is_some());
}

#[tokio::test]
async fn rows_are_spaced_by_the_delay() {
    let rows = vec![
        row(json!({ "cedula": "1001", "nombre": "Ana" })),
        row(json!({ "cedula": "1002", "nombre": "Luis" })),
        row(json!({ "cedula": "1003", "nombre": "Marta" })),
    ];
    let provisioner = FakeProvisioner::default();

    let started = std::time::Instant::now();
    run_import(&provisioner, &rows, bogota(), Duration::from_millis(20)).await;
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn report_csv_quotes_messages_with_commas() {
    let rows = vec![row(json!({ "cedula": "1001", "nombre": "Ana", "correo": "ana,gomez" }))];
    let provisioner = FakeProvisioner::default();

    let report = run_import(&provisioner, &rows, bogota(), Duration::ZERO).await;

    assert_eq!(
        report.to_csv(),
        "fila,cedula,estado,mensaje\n1,1001,error,\"Invalid Correo: ana,gomez\"\n"
    );
}

#[test]
fn record_reads_known_columns_and_keeps_the_rest() {
    let record = EmployeeRecord::from_row(
        &row(json!({
            "NÚMERO DE DOCUMENTO": 1020304050u64,
            "Nombre Completo": " Ana Gómez ",
            "Cargo": "Analista",
            "Fecha de Nacimiento": "17/05/1990",
            "Fecha Ingreso": 45292,
            "Correo Electrónico": "ana@example.com",
            "Banco": "Bancolombia",
            "EPS": "",
        })),
        bogota(),
    )
    .unwrap();

    assert_eq!(record.cedula, "1020304050");
    assert_eq!(record.nombre, "Ana Gómez");
    assert_eq!(record.posicion.as_deref(), Some("Analista"));
    assert_eq!(record.fecha_nacimiento, NaiveDate::from_ymd_opt(1990, 5, 17));
    assert_eq!(record.fecha_ingreso, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(record.correo.as_deref(), Some("ana@example.com"));
    assert_eq!(record.extra.get("Banco"), Some(&json!("Bancolombia")));
    assert!(!record.extra.contains_key("EPS"));
}

#[test]
fn record_validation_messages() {
    let offset = bogota();
    let err = |value: Value| EmployeeRecord::from_row(&row(value), offset).unwrap_err();

    assert_eq!(err(json!({ "Nombre": "Ana" })), "Missing Número Documento");
    assert_eq!(err(json!({ "cedula": "  ", "Nombre": "Ana" })), "Missing Número Documento");
    assert_eq!(err(json!({ "cedula": "12" })), "Invalid Número Documento: 12");
    assert_eq!(err(json!({ "cedula": "1001" })), "Missing Nombre");
    assert_eq!(
        err(json!({ "cedula": "1001", "nombre": "Ana", "correo": "no-es-correo" })),
        "Invalid Correo: no-es-correo"
    );
}

#[test]
fn headers_and_cedulas_are_normalized() {
    assert_eq!(normalize_header("  Número   de_Documento "), "numero de documento");
    assert_eq!(normalize_header("FECHA NACIMIENTO"), "fecha nacimiento");
    assert_eq!(clean_cedula("1.020.304-05"), "102030405");
}

#[test]
fn csv_with_quotes_and_semicolons() {
    let text = "\u{feff}Número Documento;Nombre;Notas\r\n1001;\"Gómez; Ana\";\"dice \"\"hola\"\"\"\r\n\r\n1002;Luis;\"línea 1\nlínea 2\"\r\n";
    let rows = parse_csv(text).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Número Documento"], "1001");
    assert_eq!(rows[0]["Nombre"], "Gómez; Ana");
    assert_eq!(rows[0]["Notas"], "dice \"hola\"");
    assert_eq!(rows[1]["Notas"], "línea 1\nlínea 2");
}

#[test]
fn csv_edge_cases() {
    assert!(parse_csv("").unwrap().is_empty());
    assert!(parse_csv("cedula,nombre\n").unwrap().is_empty());
    assert!(parse_csv("cedula,nombre\n\"1001,Ana\n").is_err());

    let rows = parse_csv("cedula,nombre\n1001").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cedula"], "1001");
    assert!(rows[0].get("nombre").is_none());
}

#[test]
fn database_failures_are_not_echoed_to_callers() {
    let err = ProvisionError::from(sqlx::Error::RowNotFound);
    assert_eq!(err.message, "Internal server error");

    let err = ProvisionError::from(sqlx::Error::Protocol("relation \"users\" is locked".to_string()));
    assert!(!err.message.contains("users"));
}
