use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::{MetaFilterError, Result};
use crate::record::{CellValue, RawRecord};

/// One parsed export file: the header row plus the data rows.
#[derive(Debug, Default)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Read an export file, dispatching on the extension.
pub fn read_export(path: &Path) -> Result<ExportTable> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("csv") => read_csv(path),
        Some("xlsx") => read_xlsx(path),
        _ => Err(MetaFilterError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// CSV rows load as text; blank cells become `Empty`. The header row is
/// required.
fn read_csv(path: &Path) -> Result<ExportTable> {
    let unreadable = |message: String| MetaFilterError::UnreadableFile {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| unreadable(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| unreadable(e.to_string()))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| unreadable(e.to_string()))?;
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row
                    .get(i)
                    .map(CellValue::from_csv_field)
                    .unwrap_or(CellValue::Empty);
                (header.clone(), value)
            })
            .collect();
        rows.push(RawRecord::new(fields));
    }

    Ok(ExportTable { headers, rows })
}

/// XLSX exports carry one sheet of data; the first worksheet is read and
/// its first row taken as headers. Numeric cells keep their float type so
/// float-stored identifiers can be re-rendered as integers later.
fn read_xlsx(path: &Path) -> Result<ExportTable> {
    let unreadable = |message: String| MetaFilterError::UnreadableFile {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Xlsx<std::io::BufReader<std::fs::File>> =
        open_workbook(path).map_err(|e: calamine::XlsxError| unreadable(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| unreadable("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unreadable(e.to_string()))?;

    let mut range_rows = range.rows();
    let headers: Vec<String> = match range_rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(ExportTable::default()),
    };

    let mut rows = Vec::new();
    for row in range_rows {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).map(cell_value).unwrap_or(CellValue::Empty);
                (header.clone(), value)
            })
            .collect();
        rows.push(RawRecord::new(fields));
    }

    Ok(ExportTable { headers, rows })
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(
            &path,
            "Nombre de la campaña,Importe gastado (EUR),Resultados\n\
             Medicina España Leads,1.5,\n",
        )
        .unwrap();

        let table = read_export(&path).unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].get("Nombre de la campaña"),
            Some(&CellValue::Text("Medicina España Leads".to_string()))
        );
        assert_eq!(table.rows[0].get("Resultados"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_read_xlsx_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Nombre de la campaña").unwrap();
        sheet
            .write_string(0, 1, "Identificador del conjunto de anuncios")
            .unwrap();
        sheet.write_string(1, 0, "Derecho Chile Leads").unwrap();
        sheet.write_number(1, 1, 123456.0).unwrap();
        workbook.save(&path).unwrap();

        let table = read_export(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].get("Identificador del conjunto de anuncios"),
            Some(&CellValue::Number(123456.0))
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_export(Path::new("export.ods")).unwrap_err();
        assert!(matches!(err, MetaFilterError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_malformed_xlsx_reports_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, "this is not a workbook").unwrap();

        let err = read_export(&path).unwrap_err();
        assert!(matches!(err, MetaFilterError::UnreadableFile { .. }));
    }
}
