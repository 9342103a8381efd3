//! SVO Core - Parsed-token model, triples, and shared plumbing
//!
//! This crate defines the abstractions shared by the extraction pipeline:
//! - Dependency-parsed documents (tokens, sentences, wire records)
//! - Subject-verb-object triples
//! - Common error types
//! - Configuration management
//! - JSON/YAML persistence and data directory layout

pub mod config;
pub mod data;
pub mod document;

pub use config::{AppConfig, ConfigError, DataConfig, ExtractionRules, LoggingConfig, OutputFormat};
pub use data::DataDirs;
pub use document::{
    CorpusRecord, DocumentRecord, ParsedDocument, Sentence, SentenceSpan, Token, TokenId,
    TokenRecord,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for SVO operations
#[derive(Error, Debug)]
pub enum SvoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid parse: {0}")]
    InvalidParse(String),

    #[error("Phase must be between 1 and 4, got {0}")]
    InvalidPhase(u8),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SvoError>;

// ============================================================================
// Triples
// ============================================================================

/// A subject-verb-object relation extracted from one sentence
///
/// Triples are plain data: two triples with the same fields are equal and
/// duplicates are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject phrase
    pub subject: String,

    /// Verb lemma, or `<lemma>_<preposition>` for prepositional relations
    pub verb: String,

    /// Object phrase
    pub object: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.verb, self.object)
    }
}

/// Triples extracted from a single sentence, with the sentence for reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceTriples {
    /// Index of the sentence within its document
    pub sentence_index: usize,

    /// Space-joined surface text of the sentence
    pub text: String,

    /// Triples in extraction order
    pub triples: Vec<Triple>,
}

// ============================================================================
// Tests
// ============================================================================
