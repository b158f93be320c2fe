use clap::Parser;
use metafilter::{
    Cli, MetaFilter, MetaFilterError, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let mut app = match MetaFilter::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 2;
        }
    };

    if cli.list_paises {
        app.output_formatter()
            .print_name_list("Países", app.vocabulary().paises());
        return 0;
    }

    if cli.list_facultades {
        app.output_formatter()
            .print_name_list("Facultades", app.vocabulary().facultades());
        return 0;
    }

    match execute(&mut app, &cli) {
        Ok(()) => 0,
        Err(e) => {
            app.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                MetaFilterError::SelectionRequired
                | MetaFilterError::UnknownCountry { .. }
                | MetaFilterError::UnknownFaculty { .. }
                | MetaFilterError::InvalidAmount { .. }
                | MetaFilterError::Config { .. } => 2,
                MetaFilterError::NoInputFiles | MetaFilterError::NoRecordsLoaded => 3,
                MetaFilterError::NoMatches => 6,
                MetaFilterError::OutputFileExists { .. } => 8,
                _ => 1,
            }
        }
    }
}

fn execute(app: &mut MetaFilter, cli: &Cli) -> Result<(), MetaFilterError> {
    let formatter = app.output_formatter();
    formatter.start_operation("Loading campaign exports");

    let files = app.discover_files(&cli.inputs)?;
    app.output_formatter()
        .info(&format!("Found {} export files", files.len()));

    let load_report = app.load_exports(&files);
    app.output_formatter().print_load_report(&load_report);

    if cli.dry_run {
        return handle_dry_run(app);
    }

    let criteria = app.criteria_from_cli(cli)?;

    app.output_formatter()
        .start_operation("Filtering and exporting");
    let report = app.filter_and_export(&criteria, cli.output.as_deref(), cli.force)?;

    app.output_formatter().print_filter_report(&report);
    if let Some(ref path) = report.output_path {
        app.output_formatter()
            .success(&format!("Saved {}", path.display()));
    }

    Ok(())
}

fn handle_dry_run(app: &MetaFilter) -> Result<(), MetaFilterError> {
    let formatter = app.output_formatter();

    if app.records_loaded() == 0 {
        return Err(MetaFilterError::NoRecordsLoaded);
    }

    formatter.print_header("Classified records (dry run, nothing written)");
    for (pais, facultad, count) in app.classification_summary() {
        formatter.info(&format!("{} / {}: {} records", pais, facultad, count));
    }
    formatter.success("Dry run completed");
    Ok(())
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "metafilter.toml".to_string());

    match MetaFilter::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  metafilter <exports> --config {}", config_path);
            println!("\nEdit the file to adjust the vocabulary or the spend ceilings.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &MetaFilterError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
