//! Dependency-parsed document model
//!
//! Tokens live in a per-document arena and refer to each other through
//! [`TokenId`] handles, so two tokens with the same text or lemma remain
//! distinct. The wire records ([`DocumentRecord`], [`TokenRecord`]) are what
//! an upstream parser serializes; [`ParsedDocument::from_records`] turns them
//! into the navigable form used by the extractors.

use serde::{Deserialize, Serialize};

use crate::{Result, SvoError};

// ============================================================================
// Tokens
// ============================================================================

/// Stable handle of a token: its document-wide position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub usize);

impl TokenId {
    /// Position of the token in the document
    pub fn index(self) -> usize {
        self.0
    }
}

/// A token annotated by the dependency parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Identity and position of this token
    pub id: TokenId,

    /// Surface form
    pub text: String,

    /// Normalized base form
    pub lemma: String,

    /// Coarse part-of-speech tag (e.g. `NOUN`, `VERB`)
    pub pos: String,

    /// Dependency label to the head (e.g. `nsubj`, `ROOT`)
    pub dep: String,

    /// Token this one depends on; a root points at itself
    pub head: TokenId,

    /// Dependents in ascending position order
    pub children: Vec<TokenId>,
}

impl Token {
    /// Left-to-right position within the document
    pub fn position(&self) -> usize {
        self.id.0
    }
}

// ============================================================================
// Wire records
// ============================================================================

/// Serialized form of a single token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub dep: String,
    /// Document-wide index of the head token
    pub head: usize,
}

impl TokenRecord {
    /// Create a token record
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        dep: impl Into<String>,
        head: usize,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            dep: dep.into(),
            head,
        }
    }
}

/// Half-open token range `[start, end)` forming one sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

impl SentenceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Serialized form of a parsed document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Optional caller-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub tokens: Vec<TokenRecord>,

    /// Sentence boundaries; when empty the whole document is one sentence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<SentenceSpan>,
}

impl DocumentRecord {
    /// Single-sentence record from a token list
    pub fn from_tokens(tokens: Vec<TokenRecord>) -> Self {
        Self {
            id: None,
            tokens,
            sentences: Vec::new(),
        }
    }

    /// Set the document identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set sentence boundaries
    pub fn with_sentences(mut self, sentences: Vec<SentenceSpan>) -> Self {
        self.sentences = sentences;
        self
    }
}

/// Contents of a corpus file: one document or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorpusRecord {
    Many(Vec<DocumentRecord>),
    One(DocumentRecord),
}

impl CorpusRecord {
    /// Flatten into a list of document records
    pub fn into_documents(self) -> Vec<DocumentRecord> {
        match self {
            Self::Many(docs) => docs,
            Self::One(doc) => vec![doc],
        }
    }
}

// ============================================================================
// Parsed document
// ============================================================================

/// A dependency-parsed document with resolved head/child links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    id: Option<String>,
    tokens: Vec<Token>,
    sentences: Vec<SentenceSpan>,
}

impl ParsedDocument {
    /// Build a document from its wire record
    ///
    /// Head indices and sentence spans are range-checked; the tree shape
    /// itself (cycles, multiple roots) is taken as given.
    pub fn from_records(record: DocumentRecord) -> Result<Self> {
        let len = record.tokens.len();

        for (i, token) in record.tokens.iter().enumerate() {
            if token.head >= len {
                return Err(SvoError::InvalidParse(format!(
                    "token {} ({:?}) has head {} outside document of {} tokens",
                    i, token.text, token.head, len
                )));
            }
        }

        let sentences = if record.sentences.is_empty() {
            if len == 0 {
                Vec::new()
            } else {
                vec![SentenceSpan::new(0, len)]
            }
        } else {
            let mut previous_end = 0;
            for span in &record.sentences {
                if span.start > span.end || span.end > len || span.start < previous_end {
                    return Err(SvoError::InvalidParse(format!(
                        "sentence span {}..{} is out of order or outside document of {} tokens",
                        span.start, span.end, len
                    )));
                }
                previous_end = span.end;
            }
            record.sentences
        };

        let mut children: Vec<Vec<TokenId>> = vec![Vec::new(); len];
        for (i, token) in record.tokens.iter().enumerate() {
            if token.head != i {
                children[token.head].push(TokenId(i));
            }
        }

        let tokens = record
            .tokens
            .into_iter()
            .zip(children)
            .enumerate()
            .map(|(i, (token, children))| Token {
                id: TokenId(i),
                text: token.text,
                lemma: token.lemma,
                pos: token.pos,
                dep: token.dep,
                head: TokenId(token.head),
                children,
            })
            .collect();

        Ok(Self {
            id: record.id,
            tokens,
            sentences,
        })
    }

    /// Document identifier, if the record carried one
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// All tokens in position order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a token by handle; handles come from this document
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }

    /// The token `token` depends on
    pub fn head(&self, token: &Token) -> &Token {
        self.token(token.head)
    }

    /// Dependents of `token` in position order
    pub fn children<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        token.children.iter().map(move |&id| self.token(id))
    }

    /// Dependents positioned before `token`
    pub fn lefts<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        self.children(token).filter(move |c| c.id < token.id)
    }

    /// Sentence views in document order
    pub fn sentences(&self) -> impl Iterator<Item = Sentence<'_>> + '_ {
        self.sentences
            .iter()
            .enumerate()
            .map(move |(index, &span)| Sentence {
                document: self,
                index,
                span,
            })
    }
}

impl TryFrom<DocumentRecord> for ParsedDocument {
    type Error = SvoError;

    fn try_from(record: DocumentRecord) -> Result<Self> {
        Self::from_records(record)
    }
}

/// Borrowed view of one sentence of a [`ParsedDocument`]
#[derive(Debug, Clone, Copy)]
pub struct Sentence<'a> {
    document: &'a ParsedDocument,
    index: usize,
    span: SentenceSpan,
}

impl<'a> Sentence<'a> {
    /// Owning document, for following head/child links
    pub fn document(&self) -> &'a ParsedDocument {
        self.document
    }

    /// Index of this sentence in the document
    pub fn index(&self) -> usize {
        self.index
    }

    /// Tokens of this sentence in position order
    pub fn tokens(&self) -> &'a [Token] {
        &self.document.tokens[self.span.start..self.span.end]
    }

    /// Surface text joined with single spaces
    pub fn text(&self) -> String {
        self.tokens()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Tests
// ============================================================================
