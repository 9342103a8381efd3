//! SVO Extractor - Relation triple extraction pipeline
//!
//! Turns dependency-parsed documents into subject-verb-object triples
//! for building knowledge graphs.

use svo_core::{ParsedDocument, Sentence, Triple};

/// Trait for noun phrase extractors
pub trait PhraseExtractor: Send + Sync {
    fn extract(&self, document: &ParsedDocument) -> NounPhraseMap;
}

/// Trait for relation extractors
pub trait RelationExtractor: Send + Sync {
    fn extract(&self, sentence: Sentence<'_>, phrases: &NounPhraseMap) -> Vec<Triple>;
}

pub mod metrics;
pub mod noun_phrase;
pub mod pipeline;
pub mod triple;

pub use metrics::{EvaluationReport, TripleMetrics};
pub use noun_phrase::{NounPhraseExtractor, NounPhraseMap};
pub use pipeline::SvoPipeline;
pub use triple::TripleExtractor;
