//! Document pipeline
//!
//! Runs noun phrase extraction once per document, then triple extraction
//! per sentence, concatenating results in sentence order.

use tracing::debug;

use svo_core::{ExtractionRules, ParsedDocument, SentenceTriples, Triple};

use crate::noun_phrase::{NounPhraseExtractor, NounPhraseMap};
use crate::triple::TripleExtractor;
use crate::{PhraseExtractor, RelationExtractor};

/// SVO extraction pipeline over parsed documents
#[derive(Debug, Clone, Default)]
pub struct SvoPipeline<P = NounPhraseExtractor, R = TripleExtractor> {
    phrases: P,
    relations: R,
}

impl SvoPipeline {
    /// Create a pipeline with the default label sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline sharing one set of label rules
    pub fn with_rules(rules: ExtractionRules) -> Self {
        Self::from_parts(
            NounPhraseExtractor::with_rules(rules.clone()),
            TripleExtractor::with_rules(rules),
        )
    }
}

impl<P: PhraseExtractor, R: RelationExtractor> SvoPipeline<P, R> {
    /// Create from custom extractors
    pub fn from_parts(phrases: P, relations: R) -> Self {
        Self { phrases, relations }
    }

    /// Noun phrase map of a document
    pub fn noun_phrases(&self, document: &ParsedDocument) -> NounPhraseMap {
        self.phrases.extract(document)
    }

    /// All triples of a document in sentence order
    pub fn extract_document(&self, document: &ParsedDocument) -> Vec<Triple> {
        self.extract_by_sentence(document)
            .into_iter()
            .flat_map(|s| s.triples)
            .collect()
    }

    /// Triples grouped per sentence, including sentences that yield none
    pub fn extract_by_sentence(&self, document: &ParsedDocument) -> Vec<SentenceTriples> {
        let phrases = self.phrases.extract(document);

        let sentences: Vec<SentenceTriples> = document
            .sentences()
            .map(|sentence| SentenceTriples {
                sentence_index: sentence.index(),
                text: sentence.text(),
                triples: self.relations.extract(sentence, &phrases),
            })
            .collect();

        debug!(
            document = document.id().unwrap_or("-"),
            tokens = document.len(),
            sentences = sentences.len(),
            noun_phrases = phrases.len(),
            triples = sentences.iter().map(|s| s.triples.len()).sum::<usize>(),
            "extracted document"
        );

        sentences
    }

    /// Triples for each document, in input order
    pub fn extract_corpus(&self, documents: &[ParsedDocument]) -> Vec<Vec<Triple>> {
        documents
            .iter()
            .map(|doc| self.extract_document(doc))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use svo_core::{DocumentRecord, SentenceSpan, TokenRecord};

    fn two_sentence_doc() -> ParsedDocument {
        // "Python uses indentation for readability . Guido created Python ."
        let record = DocumentRecord::from_tokens(vec![
            TokenRecord::new("Python", "Python", "PROPN", "nsubj", 1),
            TokenRecord::new("uses", "use", "VERB", "ROOT", 1),
            TokenRecord::new("indentation", "indentation", "NOUN", "dobj", 1),
            TokenRecord::new("for", "for", "ADP", "prep", 1),
            TokenRecord::new("readability", "readability", "NOUN", "pobj", 3),
            TokenRecord::new(".", ".", "PUNCT", "punct", 1),
            TokenRecord::new("Guido", "Guido", "PROPN", "nsubj", 7),
            TokenRecord::new("created", "create", "VERB", "ROOT", 7),
            TokenRecord::new("Python", "Python", "PROPN", "dobj", 7),
            TokenRecord::new(".", ".", "PUNCT", "punct", 7),
        ])
        .with_id("python")
        .with_sentences(vec![SentenceSpan::new(0, 6), SentenceSpan::new(6, 10)]);

        ParsedDocument::from_records(record).unwrap()
    }

    #[test]
    fn test_extract_document_concatenates_sentences() {
        let triples = SvoPipeline::new().extract_document(&two_sentence_doc());

        assert_eq!(
            triples,
            vec![
                Triple::new("Python", "use", "indentation"),
                Triple::new("Python", "use_for", "readability"),
                Triple::new("Guido", "create", "Python"),
            ]
        );
    }

    #[test]
    fn test_extract_by_sentence() {
        let sentences = SvoPipeline::new().extract_by_sentence(&two_sentence_doc());

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].sentence_index, 0);
        assert_eq!(sentences[0].triples.len(), 2);
        assert_eq!(sentences[1].text, "Guido created Python .");
        assert_eq!(sentences[1].triples, vec![Triple::new("Guido", "create", "Python")]);
    }

    #[test]
    fn test_extract_corpus_keeps_order() {
        let empty = ParsedDocument::from_records(DocumentRecord::default()).unwrap();
        let docs = vec![two_sentence_doc(), empty];

        let triples = SvoPipeline::new().extract_corpus(&docs);
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].len(), 3);
        assert!(triples[1].is_empty());
    }

    #[test]
    fn test_custom_rules_flow_through() {
        let rules = ExtractionRules {
            prep_dep: "case".to_string(),
            ..Default::default()
        };
        let triples = SvoPipeline::with_rules(rules).extract_document(&two_sentence_doc());

        assert!(triples.iter().all(|t| t.verb != "use_for"));
    }

    /// Keeps every noun at its bare lemma
    struct LemmaPhrases;

    impl PhraseExtractor for LemmaPhrases {
        fn extract(&self, _document: &ParsedDocument) -> NounPhraseMap {
            NounPhraseMap::new()
        }
    }

    #[test]
    fn test_from_parts_uses_given_extractors() {
        let doc = ParsedDocument::from_records(DocumentRecord::from_tokens(vec![
            TokenRecord::new("Guido", "Guido", "PROPN", "nsubj", 1),
            TokenRecord::new("wrote", "write", "VERB", "ROOT", 1),
            TokenRecord::new("large", "large", "ADJ", "amod", 3),
            TokenRecord::new("programs", "program", "NOUN", "dobj", 1),
        ]))
        .unwrap();

        let pipeline = SvoPipeline::from_parts(LemmaPhrases, TripleExtractor::new());
        assert!(pipeline.noun_phrases(&doc).is_empty());
        assert_eq!(
            pipeline.extract_document(&doc),
            vec![Triple::new("Guido", "write", "program")]
        );
        assert_eq!(
            SvoPipeline::new().extract_document(&doc),
            vec![Triple::new("Guido", "write", "large program")]
        );
    }

    #[test]
    fn test_idempotent() {
        let doc = two_sentence_doc();
        let pipeline = SvoPipeline::new();
        assert_eq!(pipeline.extract_document(&doc), pipeline.extract_document(&doc));
    }
}
