use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetaFilterError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read {path}: {message}")]
    UnreadableFile { path: PathBuf, message: String },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Missing ad-set identifier column in {path}")]
    MissingIdentifierColumn { path: PathBuf },

    #[error("Unknown country: {name}")]
    UnknownCountry { name: String },

    #[error("Unknown faculty: {name}")]
    UnknownFaculty { name: String },

    #[error("At least one country and one faculty must be selected")]
    SelectionRequired,

    #[error("Invalid amount: {value}")]
    InvalidAmount { value: String },

    #[error("No input files found")]
    NoInputFiles,

    #[error("No valid records loaded")]
    NoRecordsLoaded,

    #[error("No records matched the selected filters")]
    NoMatches,

    #[error("Output file already exists: {path}")]
    OutputFileExists { path: PathBuf },

    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for MetaFilterError {
    fn user_message(&self) -> String {
        match self {
            MetaFilterError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            MetaFilterError::UnsupportedFormat { path } => {
                format!("Unsupported file format: {}", path.display())
            }
            MetaFilterError::UnreadableFile { path, message } => {
                format!("Could not read {}: {}", path.display(), message)
            }
            MetaFilterError::MissingColumn { path, column } => {
                format!("{} does not contain the column '{}'", path.display(), column)
            }
            MetaFilterError::MissingIdentifierColumn { path } => {
                format!(
                    "{} does not contain the column 'Identificador del conjunto de anuncios'",
                    path.display()
                )
            }
            MetaFilterError::UnknownCountry { name } => {
                format!("Unknown country: '{}'", name)
            }
            MetaFilterError::UnknownFaculty { name } => {
                format!("Unknown faculty: '{}'", name)
            }
            MetaFilterError::SelectionRequired => {
                "At least one country and one faculty must be selected".to_string()
            }
            MetaFilterError::InvalidAmount { value } => {
                format!("Invalid amount: '{}'", value)
            }
            MetaFilterError::NoInputFiles => "No input files found".to_string(),
            MetaFilterError::NoRecordsLoaded => {
                "No valid records were found in the selected files".to_string()
            }
            MetaFilterError::NoMatches => {
                "No records matched the selected filters".to_string()
            }
            MetaFilterError::OutputFileExists { path } => {
                format!("Output file already exists: {}", path.display())
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            MetaFilterError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present."
                    .to_string(),
            ),
            MetaFilterError::UnsupportedFormat { .. } => {
                Some("Only .csv and .xlsx export files are supported.".to_string())
            }
            MetaFilterError::MissingColumn { .. }
            | MetaFilterError::MissingIdentifierColumn { .. } => Some(
                "Export the campaign report again with the default Meta column set; the file was skipped."
                    .to_string(),
            ),
            MetaFilterError::UnknownCountry { .. } => {
                Some("Run with --list-paises to see the accepted country names.".to_string())
            }
            MetaFilterError::UnknownFaculty { .. } => {
                Some("Run with --list-facultades to see the accepted faculty names.".to_string())
            }
            MetaFilterError::SelectionRequired => Some(
                "Pass --paises and --facultades (comma-separated), or 'todos'/'todas' to select everything."
                    .to_string(),
            ),
            MetaFilterError::InvalidAmount { .. } => Some(
                "Amounts accept a comma or a dot as decimal separator, e.g. 2 or 1,5.".to_string(),
            ),
            MetaFilterError::NoInputFiles => Some(
                "Pass one or more .csv/.xlsx files, or a directory containing them.".to_string(),
            ),
            MetaFilterError::NoRecordsLoaded => Some(
                "Records are kept only when both a country and a faculty can be read from the campaign name."
                    .to_string(),
            ),
            MetaFilterError::NoMatches => {
                Some("Try widening the selection or raising the spend ceilings.".to_string())
            }
            MetaFilterError::OutputFileExists { .. } => Some(
                "Remove the existing file, choose a different path with --output, or use --force to overwrite."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MetaFilterError {
    fn from(error: toml::de::Error) -> Self {
        MetaFilterError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetaFilterError>;
