//! Noun phrase extraction
//!
//! Maps each noun that fills an argument slot (subject, object, attribute,
//! prepositional object) to the lemmas of its compound/adjectival left
//! modifiers followed by its own lemma.

use std::collections::BTreeMap;

use svo_core::{ExtractionRules, ParsedDocument, Token, TokenId};

use crate::PhraseExtractor;

// ============================================================================
// Noun phrase map
// ============================================================================

/// Noun phrases keyed by head token identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NounPhraseMap {
    phrases: BTreeMap<TokenId, String>,
}

impl NounPhraseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, head: TokenId, phrase: impl Into<String>) {
        self.phrases.insert(head, phrase.into());
    }

    /// Phrase headed by `id`, if that token is a phrase head
    pub fn get(&self, id: TokenId) -> Option<&str> {
        self.phrases.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.phrases.contains_key(&id)
    }

    /// Phrase for `token`, falling back to its lemma when it heads no phrase
    pub fn resolve<'a>(&'a self, token: &'a Token) -> &'a str {
        self.get(token.id).unwrap_or(token.lemma.as_str())
    }

    /// Entries in position order
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.phrases.iter().map(|(&id, phrase)| (id, phrase.as_str()))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// Rule-based noun phrase extractor
#[derive(Debug, Clone, Default)]
pub struct NounPhraseExtractor {
    rules: ExtractionRules,
}

impl NounPhraseExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom label sets
    pub fn with_rules(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    fn phrase_for(&self, document: &ParsedDocument, head: &Token) -> String {
        let mut parts: Vec<&Token> = document
            .lefts(head)
            .filter(|child| self.rules.is_modifier(&child.dep))
            .collect();
        parts.push(head);
        parts.sort_by_key(|t| t.id);

        parts
            .iter()
            .map(|t| t.lemma.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PhraseExtractor for NounPhraseExtractor {
    fn extract(&self, document: &ParsedDocument) -> NounPhraseMap {
        let mut map = NounPhraseMap::new();

        for token in document.tokens() {
            if !self.rules.is_phrase_head(&token.dep, &token.pos) {
                continue;
            }
            map.insert(token.id, self.phrase_for(document, token));
        }

        map
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use svo_core::{DocumentRecord, TokenRecord};

    fn parse(tokens: Vec<TokenRecord>) -> ParsedDocument {
        ParsedDocument::from_records(DocumentRecord::from_tokens(tokens)).unwrap()
    }

    #[test]
    fn test_bare_head_maps_to_lemma() {
        // "Dogs bark"
        let doc = parse(vec![
            TokenRecord::new("Dogs", "dog", "NOUN", "nsubj", 1),
            TokenRecord::new("bark", "bark", "VERB", "ROOT", 1),
        ]);

        let map = NounPhraseExtractor::new().extract(&doc);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(TokenId(0)), Some("dog"));
    }

    #[test]
    fn test_modifiers_joined_in_position_order() {
        // "Large language models generate text"
        let doc = parse(vec![
            TokenRecord::new("Large", "large", "ADJ", "amod", 2),
            TokenRecord::new("language", "language", "NOUN", "compound", 2),
            TokenRecord::new("models", "model", "NOUN", "nsubj", 3),
            TokenRecord::new("generate", "generate", "VERB", "ROOT", 3),
            TokenRecord::new("text", "text", "NOUN", "dobj", 3),
        ]);

        let map = NounPhraseExtractor::new().extract(&doc);
        assert_eq!(map.get(TokenId(2)), Some("large language model"));
        assert_eq!(map.get(TokenId(4)), Some("text"));
        // modifiers are not heads themselves
        assert!(!map.contains(TokenId(0)));
        assert!(!map.contains(TokenId(1)));
    }

    #[test]
    fn test_right_side_and_other_modifiers_ignored() {
        // "the city of Paris" as object: det and prep children are not folded in
        let doc = parse(vec![
            TokenRecord::new("I", "I", "PRON", "nsubj", 1),
            TokenRecord::new("love", "love", "VERB", "ROOT", 1),
            TokenRecord::new("the", "the", "DET", "det", 3),
            TokenRecord::new("city", "city", "NOUN", "dobj", 1),
            TokenRecord::new("of", "of", "ADP", "prep", 3),
            TokenRecord::new("Paris", "Paris", "PROPN", "pobj", 4),
        ]);

        let map = NounPhraseExtractor::new().extract(&doc);
        assert_eq!(map.get(TokenId(3)), Some("city"));
        assert_eq!(map.get(TokenId(5)), Some("Paris"));
        // pronoun subject is never a key
        assert!(!map.contains(TokenId(0)));
    }

    #[test]
    fn test_same_lemma_distinct_tokens() {
        // "Big data beats data"
        let doc = parse(vec![
            TokenRecord::new("Big", "big", "ADJ", "amod", 1),
            TokenRecord::new("data", "data", "NOUN", "nsubj", 2),
            TokenRecord::new("beats", "beat", "VERB", "ROOT", 2),
            TokenRecord::new("data", "data", "NOUN", "dobj", 2),
        ]);

        let map = NounPhraseExtractor::new().extract(&doc);
        assert_eq!(map.get(TokenId(1)), Some("big data"));
        assert_eq!(map.get(TokenId(3)), Some("data"));
    }

    #[test]
    fn test_resolve_falls_back_to_lemma() {
        let doc = parse(vec![
            TokenRecord::new("They", "they", "PRON", "nsubj", 1),
            TokenRecord::new("run", "run", "VERB", "ROOT", 1),
        ]);

        let map = NounPhraseExtractor::new().extract(&doc);
        assert!(map.is_empty());
        assert_eq!(map.resolve(doc.token(TokenId(0))), "they");
    }

    #[test]
    fn test_custom_rules() {
        let rules = ExtractionRules {
            modifier_deps: vec!["compound".to_string()],
            ..Default::default()
        };
        let doc = parse(vec![
            TokenRecord::new("fast", "fast", "ADJ", "amod", 2),
            TokenRecord::new("sports", "sport", "NOUN", "compound", 2),
            TokenRecord::new("cars", "car", "NOUN", "nsubj", 3),
            TokenRecord::new("win", "win", "VERB", "ROOT", 3),
        ]);

        let map = NounPhraseExtractor::with_rules(rules).extract(&doc);
        assert_eq!(map.get(TokenId(2)), Some("sport car"));
    }
}
