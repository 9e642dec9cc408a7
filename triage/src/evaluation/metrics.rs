//! Evaluation metrics
//!
//! All metrics are fractions in `[0.0, 1.0]`. Empty denominators resolve to a
//! fixed default instead of failing: 0.0 for agreement and accuracies, 1.0 for
//! consistency (no similar pairs means nothing was inconsistent).

use super::fixture::ExpectedOutcomes;
use super::harness::{OutcomeComparison, TicketOutcome};
use crate::classifier::Category;
use crate::priority::PriorityLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum characters for a subject token to count towards similarity
const MIN_TOKEN_CHARS: usize = 4;

/// The three summary metrics of an evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Share of tickets whose priority is plausible for their category
    pub agent_agreement: f64,
    /// Share of fixture tickets routed to the expected team
    pub routing_accuracy: f64,
    /// Share of similar ticket pairs with identical category and priority
    pub consistency: f64,
}

impl EvaluationMetrics {
    /// `(agreement, routing_accuracy, consistency)`
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.agent_agreement, self.routing_accuracy, self.consistency)
    }
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agent Agreement: {:.2}, Routing Accuracy: {:.2}, Consistency: {:.2}",
            self.agent_agreement, self.routing_accuracy, self.consistency
        )
    }
}

/// Priority levels considered plausible for a category
pub fn compatible_priorities(category: Category) -> &'static [PriorityLevel] {
    match category {
        Category::Bug => &[PriorityLevel::High, PriorityLevel::Urgent],
        Category::FeatureRequest => &[PriorityLevel::Low, PriorityLevel::Medium],
        Category::BillingIssue => &[PriorityLevel::Medium, PriorityLevel::High],
        Category::GeneralComplaint => &PriorityLevel::ALL,
    }
}

fn fraction(numerator: usize, denominator: usize, empty: f64) -> f64 {
    if denominator == 0 {
        empty
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Fraction of tickets whose priority lies in the compatibility set for their category
pub fn agent_agreement(outcomes: &[TicketOutcome]) -> f64 {
    let agreeing = outcomes
        .iter()
        .filter(|o| {
            compatible_priorities(o.category.category).contains(&o.priority.priority_level)
        })
        .count();
    fraction(agreeing, outcomes.len(), 0.0)
}

/// Compare every outcome that has an expectation; others are skipped
pub fn compare(outcomes: &[TicketOutcome], expected: &ExpectedOutcomes) -> Vec<OutcomeComparison> {
    outcomes
        .iter()
        .filter_map(|o| {
            expected.get(&o.ticket_id).map(|exp| OutcomeComparison {
                ticket_id: o.ticket_id.clone(),
                expected: *exp,
                category_match: o.category.category == exp.category,
                priority_match: o.priority.priority_level == exp.priority,
                team_match: o.routing.team == exp.team,
            })
        })
        .collect()
}

/// Fraction of fixture tickets routed to their expected team
pub fn routing_accuracy(outcomes: &[TicketOutcome], expected: &ExpectedOutcomes) -> f64 {
    let comparisons = compare(outcomes, expected);
    let correct = comparisons.iter().filter(|c| c.team_match).count();
    fraction(correct, comparisons.len(), 0.0)
}

/// Fraction of comparisons satisfying `matched`
pub(crate) fn comparison_rate(
    comparisons: &[OutcomeComparison],
    matched: impl Fn(&OutcomeComparison) -> bool,
) -> f64 {
    let hits = comparisons.iter().filter(|c| matched(c)).count();
    fraction(hits, comparisons.len(), 0.0)
}

/// Lowercased subject tokens long enough to signal similarity
pub fn subject_tokens(subject: &str) -> BTreeSet<String> {
    subject
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Whether two subjects share at least one token
pub fn subjects_similar(a: &str, b: &str) -> bool {
    let tokens = subject_tokens(a);
    subject_tokens(b).iter().any(|t| tokens.contains(t))
}

/// Fraction of similar ticket pairs receiving identical category and priority
pub fn consistency(outcomes: &[TicketOutcome]) -> f64 {
    let mut similar_pairs = 0usize;
    let mut consistent_pairs = 0usize;

    for (i, a) in outcomes.iter().enumerate() {
        for b in &outcomes[i + 1..] {
            if !subjects_similar(&a.subject, &b.subject) {
                continue;
            }
            similar_pairs += 1;

            if a.category.category == b.category.category
                && a.priority.priority_level == b.priority.priority_level
            {
                consistent_pairs += 1;
            }
        }
    }

    fraction(consistent_pairs, similar_pairs, 1.0)
}
