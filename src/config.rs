use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MetaFilterError, Result};
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Vocabulary overrides. The defaults are the built-in country/faculty
/// lists; a config file may replace them wholesale (e.g. to add a campus or
/// a country alias the campaigns started using).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_paises")]
    pub paises: Vec<String>,
    #[serde(default = "default_facultades")]
    pub facultades: Vec<String>,
    #[serde(default = "default_alias")]
    pub alias: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_eur")]
    pub max_eur: f64,
    #[serde(default = "default_max_mxn")]
    pub max_mxn: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub default_path: PathBuf,
}

fn default_paises() -> Vec<String> {
    Vocabulary::default().paises().to_vec()
}

fn default_facultades() -> Vec<String> {
    Vocabulary::default().facultades().to_vec()
}

fn default_alias() -> BTreeMap<String, Vec<String>> {
    Vocabulary::default().alias().clone()
}

fn default_max_eur() -> f64 {
    2.0
}

fn default_max_mxn() -> f64 {
    41.0
}

fn default_max_depth() -> usize {
    4
}

fn default_exclude_patterns() -> Vec<String> {
    // Office lock files left behind by an open workbook.
    vec![r"^~\$".to_string()]
}

fn default_output_path() -> PathBuf {
    PathBuf::from("filtrados.xlsx")
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            paises: default_paises(),
            facultades: default_facultades(),
            alias: default_alias(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_eur: default_max_eur(),
            max_mxn: default_max_mxn(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: default_output_path(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MetaFilterError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MetaFilterError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| MetaFilterError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Load the given file, or look in the default locations, or fall back
    /// to the built-in defaults.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["metafilter.toml", ".metafilter.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(max_eur) = cli_args.max_eur {
            self.limits.max_eur = max_eur;
        }

        if let Some(max_mxn) = cli_args.max_mxn {
            self.limits.max_mxn = max_mxn;
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.output.default_path = output_path.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| MetaFilterError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| MetaFilterError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.paises.is_empty() {
            return Err(MetaFilterError::Config {
                message: "The country vocabulary must not be empty".to_string(),
            });
        }

        if self.vocabulary.facultades.is_empty() {
            return Err(MetaFilterError::Config {
                message: "The faculty vocabulary must not be empty".to_string(),
            });
        }

        for canonical in self.vocabulary.alias.keys() {
            if !self.vocabulary.paises.contains(canonical) {
                return Err(MetaFilterError::Config {
                    message: format!(
                        "Alias entry '{}' does not name a known country",
                        canonical
                    ),
                });
            }
        }

        if !self.limits.max_eur.is_finite() || self.limits.max_eur < 0.0 {
            return Err(MetaFilterError::Config {
                message: "max_eur must be a non-negative number".to_string(),
            });
        }

        if !self.limits.max_mxn.is_finite() || self.limits.max_mxn < 0.0 {
            return Err(MetaFilterError::Config {
                message: "max_mxn must be a non-negative number".to_string(),
            });
        }

        if self.input.max_depth == 0 {
            return Err(MetaFilterError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for pattern in &self.input.exclude_patterns {
            if Regex::new(pattern).is_err() {
                return Err(MetaFilterError::Config {
                    message: format!("Invalid exclude pattern: {}", pattern),
                });
            }
        }

        Ok(())
    }

    /// Build the immutable vocabulary this process will classify with.
    pub fn build_vocabulary(&self) -> Vocabulary {
        Vocabulary::new(
            self.vocabulary.paises.clone(),
            self.vocabulary.facultades.clone(),
            self.vocabulary.alias.clone(),
        )
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_eur: Option<f64>,
    pub max_mxn: Option<f64>,
    pub output_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_eur(mut self, max_eur: Option<f64>) -> Self {
        self.max_eur = max_eur;
        self
    }

    pub fn with_max_mxn(mut self, max_mxn: Option<f64>) -> Self {
        self.max_mxn = max_mxn;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }
}
