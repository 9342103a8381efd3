//! Subject-verb-object triple extraction
//!
//! Each verb heading a clause (`ROOT`, `conj`, `acl`) anchors its triples:
//! - main triples: subject x direct object/attribute, verb = lemma
//! - prepositional triples: subject x prepositional object,
//!   verb = `<lemma>_<preposition text>` (e.g. `use_for`)
//!
//! Verbs without a resolvable subject produce nothing.

use tracing::trace;

use svo_core::{ExtractionRules, ParsedDocument, Sentence, Token, Triple};

use crate::noun_phrase::NounPhraseMap;
use crate::RelationExtractor;

/// Rule-based SVO triple extractor
#[derive(Debug, Clone, Default)]
pub struct TripleExtractor {
    rules: ExtractionRules,
}

impl TripleExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom label sets
    pub fn with_rules(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    /// Subjects of `verb`; a clausal noun modifier without one borrows its head noun
    fn subjects<'a>(&self, document: &'a ParsedDocument, verb: &'a Token) -> Vec<&'a Token> {
        let subjects: Vec<&Token> = document
            .children(verb)
            .filter(|c| self.rules.is_subject(&c.dep))
            .collect();

        if subjects.is_empty() && verb.dep == self.rules.clausal_modifier_dep {
            let head = document.head(verb);
            if self.rules.is_noun(&head.pos) {
                return vec![head];
            }
        }

        subjects
    }

    fn extract_verb(
        &self,
        document: &ParsedDocument,
        verb: &Token,
        phrases: &NounPhraseMap,
        out: &mut Vec<Triple>,
    ) {
        let subjects: Vec<&str> = self
            .subjects(document, verb)
            .into_iter()
            .map(|t| phrases.resolve(t))
            .collect();

        if subjects.is_empty() {
            trace!(verb = %verb.text, position = verb.position(), "no subject, skipping verb");
            return;
        }

        let objects: Vec<&str> = document
            .children(verb)
            .filter(|c| self.rules.is_object(&c.dep))
            .map(|t| phrases.resolve(t))
            .collect();
        cross_product(&subjects, &verb.lemma, &objects, out);

        for prep in document
            .children(verb)
            .filter(|c| c.dep == self.rules.prep_dep)
        {
            let pobjs: Vec<&str> = document
                .children(prep)
                .filter(|c| c.dep == self.rules.pobj_dep)
                .map(|t| phrases.resolve(t))
                .collect();
            if pobjs.is_empty() {
                continue;
            }

            let label = format!("{}_{}", verb.lemma, prep.text);
            cross_product(&subjects, &label, &pobjs, out);
        }
    }
}

/// Append subject-major, object-minor combinations
fn cross_product(subjects: &[&str], verb: &str, objects: &[&str], out: &mut Vec<Triple>) {
    for subject in subjects {
        for object in objects {
            out.push(Triple::new(*subject, verb, *object));
        }
    }
}

impl RelationExtractor for TripleExtractor {
    fn extract(&self, sentence: Sentence<'_>, phrases: &NounPhraseMap) -> Vec<Triple> {
        let document = sentence.document();
        let mut triples = Vec::new();

        for token in sentence.tokens() {
            if self.rules.is_verb(&token.dep, &token.pos) {
                self.extract_verb(document, token, phrases, &mut triples);
            }
        }

        triples
    }
}

// ============================================================================
// Tests
// ============================================================================
