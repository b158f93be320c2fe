pub mod columns;
pub mod reader;

pub use columns::Currency;
pub use reader::{read_export, ExportTable};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::classify::CampaignClassifier;
use crate::config::InputConfig;
use crate::error::{MetaFilterError, Result};
use crate::record::EnrichedRecord;
use crate::vocab::Vocabulary;

/// Outcome of one load batch. Per-file failures are carried here instead of
/// aborting the batch; the formatter renders them afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub files: Vec<FileOutcome>,
    pub rows_seen: usize,
    pub records_loaded: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// File parsed and its contract held; `kept` rows resolved both labels.
    Loaded { rows: usize, kept: usize },
    /// Contract violation or parse failure; the file was skipped.
    SkippedError { reason: String },
    /// Non-fatal contract problem (missing identifier column); the file is
    /// still skipped.
    SkippedWarning { reason: String },
}

/// Reads export files, enforces the per-file column contract, and enriches
/// rows whose campaign names resolve to a country and a faculty.
pub struct ExportLoader {
    classifier: CampaignClassifier,
    exclude_patterns: Vec<Regex>,
    max_depth: usize,
}

impl ExportLoader {
    pub fn new(vocabulary: &Vocabulary, input: &InputConfig) -> Self {
        let exclude_patterns = input
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            classifier: CampaignClassifier::new(vocabulary),
            exclude_patterns,
            max_depth: input.max_depth,
        }
    }

    /// Expand the user-supplied paths into a sorted list of export files.
    /// Directories are walked (bounded depth, hidden directories skipped);
    /// explicitly named files are kept as-is and fail per-file later if
    /// unsupported.
    pub fn discover_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                self.scan_directory(path, &mut files);
            } else {
                files.push(path.clone());
            }
        }

        files.sort();
        files.dedup();

        if files.is_empty() {
            return Err(MetaFilterError::NoInputFiles);
        }

        Ok(files)
    }

    fn scan_directory(&self, root: &Path, files: &mut Vec<PathBuf>) {
        let walker = WalkDir::new(root)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !Self::is_hidden(entry.path())
            });

        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_export_extension(path) {
                continue;
            }
            if self.is_excluded(path) {
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(name))
    }

    /// Load a batch of files. The returned record set replaces the working
    /// set wholesale, even when empty.
    pub fn load_files<F>(
        &self,
        files: &[PathBuf],
        mut on_file: F,
    ) -> (Vec<EnrichedRecord>, LoadReport)
    where
        F: FnMut(&Path),
    {
        let mut records = Vec::new();
        let mut outcomes = Vec::new();
        let mut rows_seen = 0;

        for path in files {
            on_file(path);
            let status = match self.load_file(path, &mut records) {
                Ok((rows, kept)) => {
                    rows_seen += rows;
                    FileStatus::Loaded { rows, kept }
                }
                Err(err @ MetaFilterError::MissingIdentifierColumn { .. }) => {
                    FileStatus::SkippedWarning {
                        reason: err.to_string(),
                    }
                }
                Err(err) => FileStatus::SkippedError {
                    reason: err.to_string(),
                },
            };
            outcomes.push(FileOutcome {
                path: path.clone(),
                status,
            });
        }

        let report = LoadReport {
            files: outcomes,
            rows_seen,
            records_loaded: records.len(),
            loaded_at: Utc::now(),
        };

        (records, report)
    }

    fn load_file(
        &self,
        path: &Path,
        records: &mut Vec<EnrichedRecord>,
    ) -> Result<(usize, usize)> {
        let table = read_export(path)?;
        check_contract(path, &table.headers)?;

        let rows = table.rows.len();
        let mut kept = 0;

        for row in table.rows {
            let nombre = match columns::find_field(&row, columns::CAMPAIGN_NAME_RULES) {
                Some((_, value)) => value.to_text(),
                None => continue,
            };

            let labels = self.classifier.classify(&nombre);
            if let (Some(pais), Some(facultad)) = (labels.pais, labels.facultad) {
                records.push(EnrichedRecord {
                    record: row,
                    nombre,
                    pais,
                    facultad,
                });
                kept += 1;
            }
        }

        Ok((rows, kept))
    }
}

/// The per-file column contract, checked in a fixed order. The identifier
/// column is the one non-fatal check; its absence still skips the file.
fn check_contract(path: &Path, headers: &[String]) -> Result<()> {
    let headers_iter = || headers.iter().map(String::as_str);

    if !columns::header_present(headers_iter(), columns::CAMPAIGN_NAME_RULES) {
        return Err(missing_column(path, columns::CAMPAIGN_NAME));
    }
    if !columns::header_present(headers_iter(), columns::STATUS_RULES) {
        return Err(missing_column(path, columns::DELIVERY_STATUS));
    }
    if !columns::header_present(headers_iter(), columns::SPEND_CONTRACT_RULES) {
        return Err(missing_column(
            path,
            &format!("{}' or '{}", columns::SPEND_EUR, columns::SPEND_MXN),
        ));
    }
    if !columns::header_present(headers_iter(), columns::RESULTS_RULES) {
        return Err(missing_column(path, "Clientes potenciales / Resultados"));
    }
    if !columns::header_present(headers_iter(), columns::IDENTIFIER_RULES) {
        return Err(MetaFilterError::MissingIdentifierColumn {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

fn missing_column(path: &Path, column: &str) -> MetaFilterError {
    MetaFilterError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

fn is_export_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("csv") | Some("xlsx")
    )
}
