use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::FilterCriteria;
use crate::loader::columns::{self, Currency};
use crate::record::{CellValue, EnrichedRecord};

/// Fixed-shape projection of a record that passed every predicate. The
/// identifier is always text so spreadsheet software cannot reinterpret it.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub nombre: String,
    pub pais: String,
    pub facultad: String,
    pub identificador: String,
    pub estado: String,
    pub importe: Option<f64>,
    pub clientes: CellValue,
}

/// Summary of one filter run, rendered by the formatter and serializable
/// for `--output-format json`.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub total_records: usize,
    pub matched: usize,
    pub paises: Vec<String>,
    pub facultades: Vec<String>,
    pub max_eur: f64,
    pub max_mxn: f64,
    pub output_path: Option<PathBuf>,
    pub generated_at: DateTime<Utc>,
}

/// Applies the per-record predicates and projects the survivors.
pub struct FilterEngine<'a> {
    criteria: &'a FilterCriteria,
}

impl<'a> FilterEngine<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        Self { criteria }
    }

    pub fn run(&self, records: &[EnrichedRecord]) -> Vec<OutputRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .map(project)
            .collect()
    }

    /// All predicates must hold: selected country (alias-expanded),
    /// selected faculty, delivery status "active", zero results, spend
    /// within the ceiling of its currency.
    fn matches(&self, record: &EnrichedRecord) -> bool {
        self.criteria.matches_pais(&record.pais)
            && self.criteria.matches_facultad(&record.facultad)
            && status_is_active(record)
            && has_zero_results(record)
            && self.spend_within_ceiling(record)
    }

    fn spend_within_ceiling(&self, record: &EnrichedRecord) -> bool {
        let (header, value) = match columns::find_field(&record.record, columns::SPEND_RULES) {
            Some(found) => found,
            None => return false,
        };

        let importe = match value.as_number() {
            Some(n) => n,
            None => return false,
        };

        let ceiling = match columns::detect_currency(header) {
            Currency::Eur => self.criteria.max_eur,
            Currency::Mxn => self.criteria.max_mxn,
        };

        importe <= ceiling
    }
}

fn status_is_active(record: &EnrichedRecord) -> bool {
    let estado = columns::find_field(&record.record, columns::STATUS_RULES)
        .map(|(_, value)| value.to_text())
        .unwrap_or_default();
    estado.trim().to_lowercase() == "active"
}

/// Only zero-result campaigns pass: a missing column or cell, a NaN, or a
/// value that reads as zero/blank.
fn has_zero_results(record: &EnrichedRecord) -> bool {
    let value = match columns::find_field(&record.record, columns::RESULTS_RULES) {
        Some((_, value)) => value,
        None => return true,
    };

    match value {
        CellValue::Empty => true,
        CellValue::Number(n) => n.is_nan() || *n == 0.0,
        CellValue::Text(t) => matches!(t.trim(), "" | "0" | "0.0"),
    }
}

fn project(record: &EnrichedRecord) -> OutputRecord {
    let estado = columns::find_field(&record.record, columns::STATUS_RULES)
        .map(|(_, value)| value.to_text())
        .unwrap_or_default();

    // First spend/results column with a usable value wins, in file order.
    let importe = record
        .record
        .fields()
        .filter(|(header, _)| {
            columns::SPEND_RULES.iter().any(|rule| rule.matches(header))
        })
        .find_map(|(_, value)| value.as_number().filter(|n| !n.is_nan()));

    let clientes = record
        .record
        .fields()
        .filter(|(header, _)| {
            columns::RESULTS_RULES
                .iter()
                .any(|rule| rule.matches(header))
        })
        .map(|(_, value)| value)
        .find(|value| value.is_usable())
        .cloned()
        .unwrap_or(CellValue::Empty);

    let identificador = columns::find_field(&record.record, columns::IDENTIFIER_RULES)
        .map(|(_, value)| identifier_text(value))
        .unwrap_or_default();

    OutputRecord {
        nombre: record.nombre.clone(),
        pais: record.pais.clone(),
        facultad: record.facultad.clone(),
        identificador,
        estado,
        importe,
        clientes,
    }
}

/// Ad-set identifiers stored as floats (XLSX sources) come back as plain
/// integer strings; NaN means the cell was blank.
fn identifier_text(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => {
            if n.is_nan() {
                String::new()
            } else {
                format!("{}", n.trunc() as i64)
            }
        }
        other => other.to_text(),
    }
}
