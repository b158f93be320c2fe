use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::text::{normalize, parse_amount};
use crate::vocab::Vocabulary;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "metafilter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Filter Meta advertising-campaign exports by country and faculty")]
#[command(
    long_about = "MetaFilter loads campaign export files (.csv/.xlsx), reads the country and \
                  faculty out of each campaign name, filters active zero-result campaigns under \
                  a spend ceiling, and writes the survivors to a formatted XLSX table."
)]
#[command(after_help = "EXAMPLES:\n  \
    metafilter exports/ --paises España --facultades Medicina\n  \
    metafilter informe.csv --paises \"España,México\" --facultades todas --max-eur 1,5\n  \
    metafilter exports/ --paises todos --facultades Medicina -o medicina.xlsx --force\n  \
    metafilter --list-paises\n  \
    metafilter --generate-config")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Export files (.csv/.xlsx) or directories to scan for them
    #[arg(required_unless_present_any = ["generate_config", "list_paises", "list_facultades"])]
    pub inputs: Vec<PathBuf>,

    /// Countries to select, comma-separated ('todos' selects all)
    #[arg(short, long, value_delimiter = ',')]
    pub paises: Vec<String>,

    /// Faculties to select, comma-separated ('todas' selects all)
    #[arg(short, long, value_delimiter = ',')]
    pub facultades: Vec<String>,

    /// Spend ceiling for EUR campaigns (comma or dot decimals)
    #[arg(long, value_parser = parse_amount_arg)]
    pub max_eur: Option<f64>,

    /// Spend ceiling for MXN campaigns (comma or dot decimals)
    #[arg(long, value_parser = parse_amount_arg)]
    pub max_mxn: Option<f64>,

    /// Output XLSX path (defaults to the configured path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Load and classify, but do not filter or write anything
    #[arg(long, help = "Show what would be loaded without writing output")]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long)]
    pub generate_config: bool,

    /// Print the accepted country names and exit
    #[arg(long)]
    pub list_paises: bool,

    /// Print the accepted faculty names and exit
    #[arg(long)]
    pub list_facultades: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_max_eur(self.max_eur)
            .with_max_mxn(self.max_mxn)
            .with_output_path(self.output.clone())
    }

    /// Country selection with 'todos' expanded to the whole vocabulary.
    pub fn selected_paises(&self, vocabulary: &Vocabulary) -> Vec<String> {
        if self.paises.iter().any(|p| normalize(p) == "todos") {
            vocabulary.paises().to_vec()
        } else {
            self.paises.clone()
        }
    }

    /// Faculty selection with 'todas' expanded to the whole vocabulary.
    pub fn selected_facultades(&self, vocabulary: &Vocabulary) -> Vec<String> {
        if self.facultades.iter().any(|f| normalize(f) == "todas") {
            vocabulary.facultades().to_vec()
        } else {
            self.facultades.clone()
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

fn parse_amount_arg(s: &str) -> std::result::Result<f64, String> {
    match parse_amount(s) {
        Some(value) if value >= 0.0 => Ok(value),
        Some(_) => Err("amount cannot be negative".to_string()),
        None => Err(format!(
            "invalid amount '{}' (use a number, comma or dot decimals)",
            s
        )),
    }
}
