pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod record;
pub mod store;
pub mod text;
pub mod ui;
pub mod vocab;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, LimitsConfig, OutputConfig, VocabularyConfig};
pub use error::{MetaFilterError, Result, UserFriendlyError};

// Core functionality re-exports
pub use classify::{CampaignClassifier, Classification};
pub use export::XlsxExporter;
pub use filter::{FilterCriteria, FilterEngine, FilterReport, OutputRecord};
pub use loader::{ExportLoader, FileStatus, LoadReport};
pub use record::{CellValue, EnrichedRecord, RawRecord};
pub use store::WorkingSet;
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use vocab::Vocabulary;

use std::path::{Path, PathBuf};

use chrono::Utc;

/// Main library interface: owns the configuration, the vocabulary, the
/// working set and the UI plumbing, and drives loading, filtering and
/// export.
pub struct MetaFilter {
    config: Config,
    vocabulary: Vocabulary,
    loader: ExportLoader,
    store: WorkingSet,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl MetaFilter {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let vocabulary = config.build_vocabulary();
        let loader = ExportLoader::new(&vocabulary, &config.input);
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            vocabulary,
            loader,
            store: WorkingSet::new(),
            output_formatter,
            progress_manager,
        }
    }

    /// Create a MetaFilter instance from CLI arguments.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Expand the input paths into export files (directories are scanned).
    pub fn discover_files(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        self.loader.discover_files(inputs)
    }

    /// Load a batch of export files, replacing the working set wholesale.
    /// An empty batch still replaces it, so stale rows never survive a
    /// reload.
    pub fn load_exports(&mut self, files: &[PathBuf]) -> LoadReport {
        let progress = self.progress_manager.create_file_progress(files.len() as u64);

        let (records, report) = self.loader.load_files(files, |path| {
            progress.set_message(path.display().to_string());
            progress.inc(1);
        });

        progress.finish_and_clear();
        self.store.replace(records);
        report
    }

    /// Build validated criteria from a CLI selection, with the configured
    /// ceilings as defaults.
    pub fn criteria_from_cli(&self, cli_args: &Cli) -> Result<FilterCriteria> {
        FilterCriteria::new(
            &self.vocabulary,
            &cli_args.selected_paises(&self.vocabulary),
            &cli_args.selected_facultades(&self.vocabulary),
            cli_args.max_eur.unwrap_or(self.config.limits.max_eur),
            cli_args.max_mxn.unwrap_or(self.config.limits.max_mxn),
        )
    }

    /// Filter the working set and write the survivors to `output_path`.
    pub fn filter_and_export(
        &self,
        criteria: &FilterCriteria,
        output_path: Option<&Path>,
        force: bool,
    ) -> Result<FilterReport> {
        if self.store.is_empty() {
            return Err(MetaFilterError::NoRecordsLoaded);
        }

        let snapshot = self.store.snapshot();
        let matched = FilterEngine::new(criteria).run(snapshot);

        if matched.is_empty() {
            return Err(MetaFilterError::NoMatches);
        }

        let path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.output.default_path.clone());

        XlsxExporter::new()
            .with_force_overwrite(force)
            .export(&matched, &path)?;

        Ok(FilterReport {
            total_records: snapshot.len(),
            matched: matched.len(),
            paises: criteria.paises().to_vec(),
            facultades: criteria.facultades().to_vec(),
            max_eur: criteria.max_eur,
            max_mxn: criteria.max_mxn,
            output_path: Some(path),
            generated_at: Utc::now(),
        })
    }

    /// Working-set breakdown by (country, faculty), for --dry-run output.
    /// Sorted by descending count, then by label.
    pub fn classification_summary(&self) -> Vec<(String, String, usize)> {
        let mut counts: std::collections::BTreeMap<(String, String), usize> =
            std::collections::BTreeMap::new();
        for record in self.store.snapshot() {
            *counts
                .entry((record.pais.clone(), record.facultad.clone()))
                .or_insert(0) += 1;
        }

        let mut summary: Vec<(String, String, usize)> = counts
            .into_iter()
            .map(|((pais, facultad), count)| (pais, facultad, count))
            .collect();
        summary.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| (&a.0, &a.1).cmp(&(&b.0, &b.1))));
        summary
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(MetaFilterError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn records_loaded(&self) -> usize {
        self.store.len()
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &MetaFilterError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function: load the given files and export the selection in
/// one call, with quiet human output.
pub fn filter_exports_simple(
    inputs: &[PathBuf],
    paises: &[String],
    facultades: &[String],
    output_path: &Path,
) -> Result<FilterReport> {
    let config = Config::default();
    let vocabulary = config.build_vocabulary();
    let criteria = FilterCriteria::new(
        &vocabulary,
        paises,
        facultades,
        config.limits.max_eur,
        config.limits.max_mxn,
    )?;

    let mut app = MetaFilter::new(config, OutputMode::Plain, 0, true);
    let files = app.discover_files(inputs)?;
    app.load_exports(&files);
    app.filter_and_export(&criteria, Some(output_path), false)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FULL_HEADER: &str = "Nombre de la campaña,Estado de la entrega,\
Importe gastado (EUR),Clientes potenciales de Meta,\
Identificador del conjunto de anuncios";

    fn app() -> MetaFilter {
        MetaFilter::new(Config::default(), OutputMode::Plain, 0, true)
    }

    fn criteria(app: &MetaFilter, paises: &[&str], facultades: &[&str]) -> Result<FilterCriteria> {
        FilterCriteria::new(
            app.vocabulary(),
            &paises.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            &facultades.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            2.0,
            41.0,
        )
    }

    #[test]
    fn test_end_to_end_single_row() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,120211491962260403\n"),
        )
        .unwrap();

        let mut app = app();
        let files = app.discover_files(&[input]).unwrap();
        let load_report = app.load_exports(&files);
        assert_eq!(load_report.records_loaded, 1);

        let criteria = criteria(&app, &["España"], &["Medicina"]).unwrap();
        let output = dir.path().join("filtrados.xlsx");
        let report = app
            .filter_and_export(&criteria, Some(&output), false)
            .unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.total_records, 1);
        assert!(output.exists());

        // Read the sheet back: exactly one data row, Spain/Medicine.
        use calamine::{open_workbook, Reader, Xlsx};
        let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1].to_string(), "España");
        assert_eq!(rows[1][2].to_string(), "Medicina");
        assert_eq!(rows[1][3].to_string(), "120211491962260403");
    }

    #[test]
    fn test_filter_without_load_is_rejected() {
        let app = app();
        let criteria = criteria(&app, &["España"], &["Medicina"]).unwrap();
        let err = app.filter_and_export(&criteria, None, false).unwrap_err();
        assert!(matches!(err, MetaFilterError::NoRecordsLoaded));
    }

    #[test]
    fn test_no_matches_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            format!("{FULL_HEADER}\nMedicina España Leads,active,1,3,111\n"),
        )
        .unwrap();

        let mut app = app();
        let files = app.discover_files(&[input]).unwrap();
        app.load_exports(&files);

        let criteria = criteria(&app, &["España"], &["Medicina"]).unwrap();
        let output = dir.path().join("filtrados.xlsx");
        let err = app
            .filter_and_export(&criteria, Some(&output), false)
            .unwrap_err();
        assert!(matches!(err, MetaFilterError::NoMatches));
        assert!(!output.exists());
    }

    #[test]
    fn test_reload_replaces_working_set() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(
            &good,
            format!("{FULL_HEADER}\nMedicina España Leads,active,1,0,111\n"),
        )
        .unwrap();
        let empty = dir.path().join("empty.csv");
        fs::write(
            &empty,
            format!("{FULL_HEADER}\nCampaña sin etiquetas,active,1,0,222\n"),
        )
        .unwrap();

        let mut app = app();
        app.load_exports(&[good]);
        assert_eq!(app.records_loaded(), 1);

        // A reload that classifies nothing still replaces the set.
        let report = app.load_exports(&[empty]);
        assert_eq!(report.records_loaded, 0);
        assert_eq!(app.records_loaded(), 0);
    }

    #[test]
    fn test_classification_summary() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            format!(
                "{FULL_HEADER}\n\
                 Medicina España A,active,1,0,1\n\
                 Medicina España B,active,1,0,2\n\
                 Derecho Chile,active,1,0,3\n"
            ),
        )
        .unwrap();

        let mut app = app();
        app.load_exports(&[input]);

        let summary = app.classification_summary();
        assert_eq!(
            summary[0],
            ("España".to_string(), "Medicina".to_string(), 2)
        );
        assert_eq!(summary[1], ("Chile".to_string(), "Derecho".to_string(), 1));
    }

    #[test]
    fn test_sample_config_generation() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("sample.toml");

        MetaFilter::generate_sample_config(&config_path).unwrap();
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[vocabulary]"));
        assert!(content.contains("[limits]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
