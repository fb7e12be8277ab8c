use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

use crate::dates;

/// One spreadsheet line: header -> cell.
pub type Row = Map<String, Value>;

static CEDULA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4,15}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Known columns, keyed by normalized header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Cedula,
    Nombre,
    Posicion,
    FechaNacimiento,
    FechaIngreso,
    Correo,
}

fn column_for(header: &str) -> Option<Column> {
    match normalize_header(header).as_str() {
        "numero documento" | "numero de documento" | "documento" | "cedula" => {
            Some(Column::Cedula)
        }
        "nombre" | "nombre completo" | "nombres" => Some(Column::Nombre),
        "cargo" | "posicion" => Some(Column::Posicion),
        "fecha nacimiento" | "fecha de nacimiento" | "fechanacimiento" => {
            Some(Column::FechaNacimiento)
        }
        "fecha ingreso" | "fecha de ingreso" => Some(Column::FechaIngreso),
        "correo" | "correo electronico" | "email" => Some(Column::Correo),
        _ => None,
    }
}

/// Lowercase, strip Spanish accents, collapse punctuation and spaces.
pub fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cell as trimmed text. Whole numbers lose their `.0`.
fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Digits only: sheets often carry `1.020.304` or stray spaces.
pub fn clean_cedula(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '-'))
        .collect()
}

pub fn is_valid_cedula(cedula: &str) -> bool {
    CEDULA_RE.is_match(cedula)
}

/// The cleaned cedula cell of a row, even when the rest of the row is invalid.
pub fn cedula_cell(row: &Row) -> Option<String> {
    row.iter()
        .filter(|(header, _)| column_for(header) == Some(Column::Cedula))
        .find_map(|(_, value)| cell_text(value))
        .map(|c| clean_cedula(&c))
}

/// An employee as read from one sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub cedula: String,
    pub nombre: String,
    pub posicion: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub fecha_ingreso: Option<NaiveDate>,
    pub correo: Option<String>,
    pub extra: Map<String, Value>,
}

impl EmployeeRecord {
    pub fn from_row(row: &Row, offset: FixedOffset) -> Result<Self, String> {
        let mut cedula = None;
        let mut nombre = None;
        let mut posicion = None;
        let mut fecha_nacimiento = None;
        let mut fecha_ingreso = None;
        let mut correo = None;
        let mut extra = Map::new();

        for (header, value) in row {
            match column_for(header) {
                Some(Column::Cedula) => cedula = cell_text(value).map(|c| clean_cedula(&c)),
                Some(Column::Nombre) => nombre = cell_text(value),
                Some(Column::Posicion) => posicion = cell_text(value),
                Some(Column::FechaNacimiento) => {
                    fecha_nacimiento = dates::parse_sheet_date(value, offset)
                }
                Some(Column::FechaIngreso) => fecha_ingreso = dates::parse_sheet_date(value, offset),
                Some(Column::Correo) => correo = cell_text(value),
                None => {
                    if let Some(text) = cell_text(value) {
                        extra.insert(header.trim().to_string(), Value::String(text));
                    }
                }
            }
        }

        let cedula = cedula
            .filter(|c| !c.is_empty())
            .ok_or_else(|| "Missing Número Documento".to_string())?;
        if !is_valid_cedula(&cedula) {
            return Err(format!("Invalid Número Documento: {cedula}"));
        }
        let nombre = nombre.ok_or_else(|| "Missing Nombre".to_string())?;

        if let Some(ref email) = correo {
            if !EMAIL_RE.is_match(email) {
                return Err(format!("Invalid Correo: {email}"));
            }
        }

        Ok(EmployeeRecord {
            cedula,
            nombre,
            posicion,
            fecha_nacimiento,
            fecha_ingreso,
            correo,
            extra,
        })
    }
}

/// Parse CSV text into rows keyed by the header line.
///
/// Quoted fields may contain delimiters, doubled quotes and line breaks.
/// A header without commas but with semicolons switches the delimiter to
/// `;`, the default of spreadsheets saved under a Spanish locale.
pub fn parse_csv(text: &str) -> Result<Vec<Row>, String> {
    let text = text.trim_start_matches('\u{feff}');
    let first_line = text.lines().next().unwrap_or_default();
    let delimiter = if !first_line.contains(',') && first_line.contains(';') {
        ';'
    } else {
        ','
    };

    let records = split_records(text, delimiter)?;
    let mut records = records
        .into_iter()
        .filter(|r| r.iter().any(|field| !field.trim().is_empty()));

    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    Ok(records
        .map(|record| {
            header
                .iter()
                .zip(record)
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, field)| (name.clone(), Value::String(field)))
                .collect()
        })
        .collect())
}

fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

pub(crate) fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
