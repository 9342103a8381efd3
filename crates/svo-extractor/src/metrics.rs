//! Quality Metrics module
//!
//! Scores extracted triples against a gold standard with precision,
//! recall and F1 over distinct triples.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use svo_core::Triple;

// ============================================================================
// Triple Metrics
// ============================================================================

/// Metrics for triple extraction evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleMetrics {
    /// Predicted triples also present in the gold standard
    pub true_positives: usize,
    /// Predicted triples absent from the gold standard
    pub false_positives: usize,
    /// Gold triples that were not predicted
    pub false_negatives: usize,
    /// Distinct triples in gold standard
    pub gold_total: usize,
    /// Distinct triples predicted
    pub predicted_total: usize,
}

impl TripleMetrics {
    /// Compare predictions to gold; duplicates count once
    pub fn evaluate(predicted: &[Triple], gold: &[Triple]) -> Self {
        let predicted: HashSet<&Triple> = predicted.iter().collect();
        let gold: HashSet<&Triple> = gold.iter().collect();

        let true_positives = predicted.intersection(&gold).count();

        Self {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: gold.len() - true_positives,
            gold_total: gold.len(),
            predicted_total: predicted.len(),
        }
    }

    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Accumulate counts from another evaluation
    pub fn merge(&mut self, other: &TripleMetrics) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.gold_total += other.gold_total;
        self.predicted_total += other.predicted_total;
    }
}

// ============================================================================
// Evaluation Report
// ============================================================================

/// Corpus-level evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-document metrics in input order
    pub documents: Vec<TripleMetrics>,
    /// Summed counts over all documents
    pub overall: TripleMetrics,
    /// Summed counts per verb label
    pub by_verb: BTreeMap<String, TripleMetrics>,
}

impl EvaluationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's predictions and gold triples
    pub fn add_document(&mut self, predicted: &[Triple], gold: &[Triple]) {
        let metrics = TripleMetrics::evaluate(predicted, gold);
        self.overall.merge(&metrics);
        self.documents.push(metrics);

        let verbs: HashSet<&str> = predicted
            .iter()
            .chain(gold)
            .map(|t| t.verb.as_str())
            .collect();
        for verb in verbs {
            let p: Vec<Triple> = predicted.iter().filter(|t| t.verb == verb).cloned().collect();
            let g: Vec<Triple> = gold.iter().filter(|t| t.verb == verb).cloned().collect();
            self.by_verb
                .entry(verb.to_string())
                .or_default()
                .merge(&TripleMetrics::evaluate(&p, &g));
        }
    }

    /// Evaluate predictions and gold paired by document index
    ///
    /// Documents missing on either side are scored against an empty list.
    pub fn from_corpus(predicted: &[Vec<Triple>], gold: &[Vec<Triple>]) -> Self {
        let mut report = Self::new();
        let empty = Vec::new();
        for i in 0..predicted.len().max(gold.len()) {
            report.add_document(
                predicted.get(i).unwrap_or(&empty),
                gold.get(i).unwrap_or(&empty),
            );
        }
        report
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let m = &self.overall;
        format!(
            "documents: {}\npredicted: {}\ngold: {}\nprecision: {:.3}\nrecall: {:.3}\nf1: {:.3}",
            self.documents.len(),
            m.predicted_total,
            m.gold_total,
            m.precision(),
            m.recall(),
            m.f1_score()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
