use crate::record::{CellValue, RawRecord};

/// Canonical header spellings, as Meta writes them in campaign exports.
pub const CAMPAIGN_NAME: &str = "Nombre de la campaña";
pub const DELIVERY_STATUS: &str = "Estado de la entrega";
pub const SPEND_EUR: &str = "Importe gastado (EUR)";
pub const SPEND_MXN: &str = "Importe gastado (MXN)";

/// A single header-matching rule. Matching is case-insensitive; patterns
/// are written in lowercase.
#[derive(Debug, Clone, Copy)]
pub enum ColumnMatcher {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl ColumnMatcher {
    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        match self {
            ColumnMatcher::Exact(pattern) => header == *pattern,
            ColumnMatcher::Prefix(pattern) => header.starts_with(pattern),
            ColumnMatcher::Contains(pattern) => header.contains(pattern),
        }
    }
}

/// Lookup policy per logical field, in evaluation order. Columns are
/// scanned in file order; the first column matching any rule of the field
/// wins, which mirrors how the exports are actually laid out (one spend
/// column per currency, one results column per objective).
pub static CAMPAIGN_NAME_RULES: &[ColumnMatcher] =
    &[ColumnMatcher::Exact("nombre de la campaña")];

pub static STATUS_RULES: &[ColumnMatcher] = &[ColumnMatcher::Exact("estado de la entrega")];

pub static IDENTIFIER_RULES: &[ColumnMatcher] =
    &[ColumnMatcher::Exact("identificador del conjunto de anuncios")];

pub static SPEND_RULES: &[ColumnMatcher] = &[ColumnMatcher::Prefix("importe gastado")];

/// File-level contract is stricter than the row-level scan: the export must
/// carry one of the two currency-specific spend columns.
pub static SPEND_CONTRACT_RULES: &[ColumnMatcher] = &[
    ColumnMatcher::Exact("importe gastado (eur)"),
    ColumnMatcher::Exact("importe gastado (mxn)"),
];

pub static RESULTS_RULES: &[ColumnMatcher] = &[
    ColumnMatcher::Exact("clientes potenciales de meta"),
    ColumnMatcher::Exact("clientes potenciales en meta"),
    ColumnMatcher::Contains("resultados"),
];

/// First field of `record` (in file column order) whose header matches any
/// rule in `rules`.
pub fn find_field<'a>(
    record: &'a RawRecord,
    rules: &[ColumnMatcher],
) -> Option<(&'a str, &'a CellValue)> {
    record
        .fields()
        .find(|(header, _)| rules.iter().any(|rule| rule.matches(header)))
}

/// Whether any header satisfies any rule. Used for the per-file contract.
pub fn header_present<'a>(
    mut headers: impl Iterator<Item = &'a str>,
    rules: &[ColumnMatcher],
) -> bool {
    headers.any(|header| rules.iter().any(|rule| rule.matches(header)))
}

/// Currency of a spend column, read from its header. Headers naming
/// neither currency fall back to EUR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eur,
    Mxn,
}

pub fn detect_currency(header: &str) -> Currency {
    let header = header.to_lowercase();
    if header.contains("eur") {
        Currency::Eur
    } else if header.contains("mxn") {
        Currency::Mxn
    } else {
        Currency::Eur
    }
}
