use crate::text::parse_amount;

/// A single cell from a tabular export.
///
/// CSV cells arrive as text (blank cells as `Empty`); XLSX cells keep their
/// numeric type so that float-stored ad-set identifiers can be recognized
/// and re-rendered as plain integers on export.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn from_csv_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }

    /// Text rendering used for comparisons and string output. `Empty` maps
    /// to the empty string, which is what the normalizer expects for
    /// non-text input.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(t) => t.clone(),
            CellValue::Number(n) => {
                if n.is_nan() {
                    String::new()
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(t) => parse_amount(t),
            CellValue::Number(n) => Some(*n),
        }
    }

    /// Whether the cell carries a usable value when projecting unified
    /// spend/results columns (blank cells and NaN floats do not).
    pub fn is_usable(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(_) => true,
            CellValue::Number(n) => !n.is_nan(),
        }
    }
}

/// One row of an export file. Columns keep their file order; the loader's
/// rule table scans them in that order, so "first matching column" is
/// deterministic. Unknown columns ride along untouched.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    fields: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// A raw record whose campaign name resolved to both a country and a
/// faculty. Classification is final: the labels are never recomputed.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub record: RawRecord,
    pub nombre: String,
    pub pais: String,
    pub facultad: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_mapping() {
        assert_eq!(CellValue::from_csv_field(""), CellValue::Empty);
        assert_eq!(
            CellValue::from_csv_field("0"),
            CellValue::Text("0".to_string())
        );
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Text("hola".to_string()).to_text(), "hola");
        assert_eq!(CellValue::Number(123456.0).to_text(), "123456");
        assert_eq!(CellValue::Number(f64::NAN).to_text(), "");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Text("1,5".to_string()).as_number(), Some(1.5));
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Text("n/a".to_string()).as_number(), None);
    }

    #[test]
    fn test_usable() {
        assert!(CellValue::Text("x".to_string()).is_usable());
        assert!(CellValue::Number(0.0).is_usable());
        assert!(!CellValue::Number(f64::NAN).is_usable());
        assert!(!CellValue::Empty.is_usable());
    }

    #[test]
    fn test_record_preserves_column_order() {
        let record = RawRecord::new(vec![
            ("B".to_string(), CellValue::Empty),
            ("A".to_string(), CellValue::Empty),
        ]);
        let headers: Vec<&str> = record.headers().collect();
        assert_eq!(headers, vec!["B", "A"]);
        assert!(record.get("A").is_some());
        assert!(record.get("a").is_none());
    }
}
