//! Bulk employee import from spreadsheet rows.

pub mod provision;
pub mod sheet;

use std::fmt::Write;
use std::time::Duration;

use chrono::FixedOffset;
use serde::Serialize;
use uuid::Uuid;

use provision::Provisioner;
use sheet::{EmployeeRecord, Row, csv_escape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    /// 1-based position among the data rows.
    pub row: usize,
    pub cedula: Option<String>,
    pub status: RowStatus,
    pub message: String,
    pub uid: Option<Uuid>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportReport {
    pub success: usize,
    pub failed: usize,
    pub results: Vec<RowOutcome>,
}

impl ImportReport {
    fn push(&mut self, outcome: RowOutcome) {
        match outcome.status {
            RowStatus::Success => self.success += 1,
            RowStatus::Failed => self.failed += 1,
        }
        self.results.push(outcome);
    }

    pub fn errors(&self) -> impl Iterator<Item = &RowOutcome> {
        self.results
            .iter()
            .filter(|r| r.status == RowStatus::Failed)
    }

    /// Result log with one line per input row.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("fila,cedula,estado,mensaje\n");
        for outcome in &self.results {
            let status = match outcome.status {
                RowStatus::Success => "ok",
                RowStatus::Failed => "error",
            };
            let _ = writeln!(
                csv,
                "{},{},{},{}",
                outcome.row,
                csv_escape(outcome.cedula.as_deref().unwrap_or_default()),
                status,
                csv_escape(&outcome.message),
            );
        }
        csv
    }
}

/// Provision every row in order. A failing row is recorded and the loop
/// moves on; `delay` is slept between consecutive rows.
pub async fn run_import<P>(
    provisioner: &P,
    rows: &[Row],
    offset: FixedOffset,
    delay: Duration,
) -> ImportReport
where
    P: Provisioner + ?Sized,
{
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let row_number = index + 1;

        let record = match EmployeeRecord::from_row(row, offset) {
            Ok(record) => record,
            Err(message) => {
                tracing::warn!("Import row {row_number} rejected: {message}");
                report.push(RowOutcome {
                    row: row_number,
                    cedula: sheet::cedula_cell(row),
                    status: RowStatus::Failed,
                    message,
                    uid: None,
                });
                continue;
            }
        };

        match provisioner.provision(&record).await {
            Ok(provisioned) => {
                let message = if provisioned.created {
                    format!("Created {}", provisioned.email)
                } else {
                    format!("Updated {}", provisioned.email)
                };
                report.push(RowOutcome {
                    row: row_number,
                    cedula: Some(record.cedula),
                    status: RowStatus::Success,
                    message,
                    uid: Some(provisioned.uid),
                });
            }
            Err(e) => {
                tracing::warn!("Import row {row_number} failed: {e}");
                report.push(RowOutcome {
                    row: row_number,
                    cedula: Some(record.cedula),
                    status: RowStatus::Failed,
                    message: e.message,
                    uid: None,
                });
            }
        }
    }

    tracing::info!(
        "Import finished: {} succeeded, {} failed",
        report.success,
        report.failed
    );
    report
}
