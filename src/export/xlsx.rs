use std::path::Path;

use rust_xlsxwriter::{Format, Table, TableColumn, TableStyle, Workbook};

use crate::error::{MetaFilterError, Result};
use crate::filter::OutputRecord;
use crate::record::CellValue;

/// Output column order, fixed by the sheet format consumers expect.
pub const OUTPUT_HEADERS: [&str; 7] = [
    "Nombre de la campaña",
    "Pais",
    "Facultad",
    "Identificador del conjunto de anuncios",
    "Estado de la entrega",
    "Importe gastado",
    "Clientes potenciales",
];

const IDENTIFIER_COL: u16 = 3;

/// Writes the filtered records as a single-sheet workbook with a named,
/// styled table. The identifier column is forced to text so that opening
/// the file does not reinterpret 17-digit ad-set ids as floats.
pub struct XlsxExporter {
    force_overwrite: bool,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            force_overwrite: false,
        }
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn export(&self, records: &[OutputRecord], path: &Path) -> Result<()> {
        if path.exists() && !self.force_overwrite {
            return Err(MetaFilterError::OutputFileExists {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1")?;

        for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        let text_format = Format::new().set_num_format("@");

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;

            worksheet.write_string(row, 0, &record.nombre)?;
            worksheet.write_string(row, 1, &record.pais)?;
            worksheet.write_string(row, 2, &record.facultad)?;
            worksheet.write_string_with_format(
                row,
                IDENTIFIER_COL,
                &record.identificador,
                &text_format,
            )?;
            worksheet.write_string(row, 4, &record.estado)?;

            if let Some(importe) = record.importe {
                worksheet.write_number(row, 5, importe)?;
            }

            match &record.clientes {
                CellValue::Number(n) if !n.is_nan() => {
                    worksheet.write_number(row, 6, *n)?;
                }
                CellValue::Text(t) if !t.is_empty() => {
                    worksheet.write_string(row, 6, t)?;
                }
                _ => {}
            }
        }

        worksheet.set_column_width(IDENTIFIER_COL, 25)?;

        if !records.is_empty() {
            let table = Table::new()
                .set_name("Filtrados")
                .set_style(TableStyle::Medium9)
                .set_columns(
                    &OUTPUT_HEADERS
                        .iter()
                        .map(|header| TableColumn::new().set_header(*header))
                        .collect::<Vec<_>>(),
                );
            worksheet.add_table(
                0,
                0,
                records.len() as u32,
                (OUTPUT_HEADERS.len() - 1) as u16,
                &table,
            )?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::TempDir;

    fn sample_record() -> OutputRecord {
        OutputRecord {
            nombre: "Medicina España Leads".to_string(),
            pais: "España".to_string(),
            facultad: "Medicina".to_string(),
            identificador: "120211491962260403".to_string(),
            estado: "active".to_string(),
            importe: Some(1.0),
            clientes: CellValue::Text("0".to_string()),
        }
    }

    #[test]
    fn test_export_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filtrados.xlsx");

        XlsxExporter::new()
            .export(&[sample_record()], &path)
            .unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 2);

        let headers: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(headers, OUTPUT_HEADERS);

        // The identifier must come back as text, digits intact.
        assert_eq!(
            rows[1][3],
            Data::String("120211491962260403".to_string())
        );
        assert_eq!(rows[1][1], Data::String("España".to_string()));
        assert_eq!(rows[1][5], Data::Float(1.0));
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filtrados.xlsx");

        let exporter = XlsxExporter::new();
        exporter.export(&[sample_record()], &path).unwrap();

        let err = exporter.export(&[sample_record()], &path).unwrap_err();
        assert!(matches!(err, MetaFilterError::OutputFileExists { .. }));

        XlsxExporter::new()
            .with_force_overwrite(true)
            .export(&[sample_record()], &path)
            .unwrap();
    }
}
