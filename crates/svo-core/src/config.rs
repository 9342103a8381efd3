//! SVO Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with defaults matching the English dependency annotation scheme.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory layout
    pub data: DataConfig,

    /// Label sets driving noun-phrase and triple extraction
    pub extraction: ExtractionRules,

    /// Output settings
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Overwrite every field whose variable `lookup` returns
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SVO_DATA_DIR") {
            self.data.root = PathBuf::from(dir);
        }
        if let Some(format) = lookup("SVO_OUTPUT_FORMAT") {
            self.output.format = format.parse()?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.json_format = match format.to_lowercase().as_str() {
                "json" => true,
                "text" | "plain" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LOG_FORMAT".to_string(),
                        value: format,
                    })
                }
            };
        }

        Ok(self)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }
}

/// Data directory configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the data tree (`raw/`, `phase_N_outputs/`)
    pub root: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

/// Dependency and part-of-speech label sets used by the extractors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Dependencies that make a noun a phrase head
    pub head_deps: Vec<String>,

    /// Parts of speech counted as nouns
    pub noun_pos: Vec<String>,

    /// Left-modifier dependencies folded into a noun phrase
    pub modifier_deps: Vec<String>,

    /// Dependencies that make a verb a triple anchor
    pub verb_deps: Vec<String>,

    /// Parts of speech counted as verbs
    pub verb_pos: Vec<String>,

    /// Subject dependencies
    pub subject_deps: Vec<String>,

    /// Direct object dependencies
    pub object_deps: Vec<String>,

    /// Preposition dependency
    pub prep_dep: String,

    /// Prepositional object dependency
    pub pobj_dep: String,

    /// Clausal noun modifier dependency; such verbs borrow their head noun as subject
    pub clausal_modifier_dep: String,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            head_deps: labels(&["nsubj", "nsubjpass", "dobj", "pobj", "attr"]),
            noun_pos: labels(&["NOUN", "PROPN"]),
            modifier_deps: labels(&["compound", "amod"]),
            verb_deps: labels(&["ROOT", "conj", "acl"]),
            verb_pos: labels(&["VERB", "AUX"]),
            subject_deps: labels(&["nsubj", "nsubjpass"]),
            object_deps: labels(&["dobj", "attr"]),
            prep_dep: "prep".to_string(),
            pobj_dep: "pobj".to_string(),
            clausal_modifier_dep: "acl".to_string(),
        }
    }
}

impl ExtractionRules {
    pub fn is_phrase_head(&self, dep: &str, pos: &str) -> bool {
        contains(&self.head_deps, dep) && self.is_noun(pos)
    }

    pub fn is_noun(&self, pos: &str) -> bool {
        contains(&self.noun_pos, pos)
    }

    pub fn is_modifier(&self, dep: &str) -> bool {
        contains(&self.modifier_deps, dep)
    }

    pub fn is_verb(&self, dep: &str, pos: &str) -> bool {
        contains(&self.verb_deps, dep) && contains(&self.verb_pos, pos)
    }

    pub fn is_subject(&self, dep: &str) -> bool {
        contains(&self.subject_deps, dep)
    }

    pub fn is_object(&self, dep: &str) -> bool {
        contains(&self.object_deps, dep)
    }
}

fn contains(set: &[String], label: &str) -> bool {
    set.iter().any(|s| s == label)
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Serialization format for written triples
    pub format: OutputFormat,

    /// Suffix of file names written into a phase output directory
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            file_stem: "triples".to_string(),
        }
    }
}

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::InvalidValue {
                key: "SVO_OUTPUT_FORMAT".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
