//! Evaluation harness
//!
//! Runs each ticket through classifier, priority scorer and router, then
//! reduces the per-ticket outcomes into metrics and a report.

use super::fixture::{ExpectedOutcome, ExpectedOutcomes};
use super::metrics::{self, EvaluationMetrics};
use crate::classifier::{CategoryResult, RuleBasedClassifier, TicketClassifier};
use crate::error::{TriageError, TriageResult, ValidationError};
use crate::priority::{PriorityResult, PriorityScorer};
use crate::router::{Router, RoutingResult};
use crate::ticket::{CustomerTier, RawTicket, Ticket};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// All pipeline results for one ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketOutcome {
    pub ticket_id: String,
    pub subject: String,
    pub customer_tier: CustomerTier,
    pub category: CategoryResult,
    pub priority: PriorityResult,
    pub routing: RoutingResult,
}

/// Outcome of one ticket checked against its expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeComparison {
    pub ticket_id: String,
    pub expected: ExpectedOutcome,
    pub category_match: bool,
    pub priority_match: bool,
    pub team_match: bool,
}

impl OutcomeComparison {
    pub fn all_match(&self) -> bool {
        self.category_match && self.priority_match && self.team_match
    }
}

/// Full result of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Name of the classifier variant that ran
    pub classifier: String,
    /// Per-ticket results in batch order
    pub outcomes: Vec<TicketOutcome>,
    /// Outcomes that had an expectation, in batch order
    pub comparisons: Vec<OutcomeComparison>,
    /// Records rejected before the pipeline ran
    pub rejected: Vec<ValidationError>,
    pub metrics: EvaluationMetrics,
    /// Share of fixture tickets with the expected category
    pub category_accuracy: f64,
    /// Share of fixture tickets with the expected priority
    pub priority_accuracy: f64,
    /// Fixture ids with no ticket in the batch
    pub unmatched_expectations: Vec<String>,
    /// Batch ids with no fixture entry
    pub unexpected_tickets: Vec<String>,
}

impl EvaluationReport {
    /// Format as a Markdown report
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("# Ticket Triage Evaluation\n\n");
        report.push_str(&format!(
            "Classifier: {} | Tickets: {} | Rejected: {} | With expectations: {}\n\n",
            self.classifier,
            self.outcomes.len(),
            self.rejected.len(),
            self.comparisons.len()
        ));

        report.push_str("## Decisions\n\n");
        report.push_str("| Ticket | Category | Priority | Score | Team | Expected |\n");
        report.push_str("|--------|----------|----------|-------|------|----------|\n");
        for outcome in &self.outcomes {
            let expected = match self
                .comparisons
                .iter()
                .find(|c| c.ticket_id == outcome.ticket_id)
            {
                Some(c) if c.all_match() => "✅".to_string(),
                Some(c) => format!(
                    "❌ {} / {} / {}",
                    c.expected.category, c.expected.priority, c.expected.team
                ),
                None => "-".to_string(),
            };
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                outcome.ticket_id,
                outcome.category.category,
                outcome.priority.priority_level,
                outcome.priority.score,
                outcome.routing.team,
                expected
            ));
        }
        report.push('\n');

        report.push_str("## Metrics\n\n");
        report.push_str(&format!(
            "| Metric | Value |\n\
             |--------|-------|\n\
             | Agent Agreement | {:.2} |\n\
             | Routing Accuracy | {:.2} |\n\
             | Consistency | {:.2} |\n\
             | Category Accuracy | {:.2} |\n\
             | Priority Accuracy | {:.2} |\n\n",
            self.metrics.agent_agreement,
            self.metrics.routing_accuracy,
            self.metrics.consistency,
            self.category_accuracy,
            self.priority_accuracy
        ));

        if !self.rejected.is_empty() {
            report.push_str("## Rejected Tickets\n\n");
            for err in &self.rejected {
                report.push_str(&format!(
                    "- {}: `{}` {}\n",
                    err.ticket_id, err.field, err.reason
                ));
            }
            report.push('\n');
        }

        if !self.unmatched_expectations.is_empty() || !self.unexpected_tickets.is_empty() {
            report.push_str("## Fixture Drift\n\n");
            if !self.unmatched_expectations.is_empty() {
                report.push_str(&format!(
                    "- Expected but not in batch: {}\n",
                    self.unmatched_expectations.join(", ")
                ));
            }
            if !self.unexpected_tickets.is_empty() {
                report.push_str(&format!(
                    "- In batch without expectation: {}\n",
                    self.unexpected_tickets.join(", ")
                ));
            }
            report.push('\n');
        }

        report.push_str("Scores range from 0.00 (worst) to 1.00 (best).\n");
        report
    }

    /// Fail when the batch and the fixture disagree on ticket ids.
    ///
    /// Drift never affects the metrics; this is for callers that want a
    /// strict fixture check on top of them.
    pub fn ensure_fixture_aligned(&self) -> TriageResult<()> {
        if self.unmatched_expectations.is_empty() && self.unexpected_tickets.is_empty() {
            return Ok(());
        }
        Err(TriageError::Configuration {
            message: format!(
                "expected outcomes without tickets: [{}]; tickets without expected outcomes: [{}]",
                self.unmatched_expectations.join(", "),
                self.unexpected_tickets.join(", ")
            ),
        })
    }

    /// Get the report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs ticket batches through the pipeline and scores them
pub struct EvaluationHarness {
    classifier: Box<dyn TicketClassifier>,
    scorer: PriorityScorer,
    router: Router,
}

impl EvaluationHarness {
    /// Create a harness around any classifier variant
    pub fn new(classifier: Box<dyn TicketClassifier>) -> Self {
        Self {
            classifier,
            scorer: PriorityScorer::new(),
            router: Router::new(),
        }
    }

    /// Harness using the keyword classifier
    pub fn rule_based() -> Self {
        Self::new(Box::new(RuleBasedClassifier::new()))
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Run the full pipeline for one ticket
    pub fn process(&self, ticket: &Ticket) -> TicketOutcome {
        let category = self.classifier.classify(ticket);
        let priority = self.scorer.evaluate(ticket);
        let routing = self.router.route(ticket, &category, &priority);

        TicketOutcome {
            ticket_id: ticket.id().to_string(),
            subject: ticket.subject().to_string(),
            customer_tier: ticket.customer_tier(),
            category,
            priority,
            routing,
        }
    }

    /// Run the pipeline for every ticket, preserving batch order
    pub fn process_batch(&self, tickets: &[Ticket]) -> TriageResult<Vec<TicketOutcome>> {
        let outcomes = self.process_all(tickets);

        if outcomes.len() != tickets.len() {
            return Err(TriageError::invariant(format!(
                "{} tickets produced {} outcomes",
                tickets.len(),
                outcomes.len()
            )));
        }
        if let Some((ticket, outcome)) = tickets
            .iter()
            .zip(&outcomes)
            .find(|(t, o)| t.id() != o.ticket_id)
        {
            return Err(TriageError::invariant(format!(
                "outcome for {} recorded under {}",
                ticket.id(),
                outcome.ticket_id
            )));
        }

        Ok(outcomes)
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, tickets: &[Ticket]) -> Vec<TicketOutcome> {
        tickets.iter().map(|t| self.process(t)).collect()
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, tickets: &[Ticket]) -> Vec<TicketOutcome> {
        use rayon::prelude::*;
        tickets.par_iter().map(|t| self.process(t)).collect()
    }

    /// Validate raw records; invalid ones are returned as errors, not dropped silently.
    ///
    /// Ticket ids are unique in the returned batch: a repeated id is rejected
    /// on field `id` and the first occurrence is kept.
    pub fn validate(records: Vec<RawTicket>) -> (Vec<Ticket>, Vec<ValidationError>) {
        let mut tickets = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for record in records {
            match Ticket::try_from(record) {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => {
                    warn!(ticket = %e.ticket_id, field = %e.field, reason = %e.reason, "ticket rejected");
                    rejected.push(e);
                }
            }
        }

        let (unique, mut duplicates) = dedupe(tickets);
        rejected.append(&mut duplicates);
        (unique, rejected)
    }

    /// Compute the three summary metrics for a batch
    pub fn evaluate(
        &self,
        tickets: &[Ticket],
        expected: &ExpectedOutcomes,
    ) -> TriageResult<EvaluationMetrics> {
        Ok(self.run(tickets, expected)?.metrics)
    }

    /// Validate raw records, then evaluate the valid ones
    pub fn run_raw(
        &self,
        records: Vec<RawTicket>,
        expected: &ExpectedOutcomes,
    ) -> TriageResult<EvaluationReport> {
        let (tickets, mut rejected) = Self::validate(records);
        let mut report = self.run(&tickets, expected)?;
        rejected.append(&mut report.rejected);
        report.rejected = rejected;
        Ok(report)
    }

    /// Evaluate a batch against a fixture and build the full report
    pub fn run(
        &self,
        tickets: &[Ticket],
        expected: &ExpectedOutcomes,
    ) -> TriageResult<EvaluationReport> {
        let (unique, rejected) = dedupe(tickets.iter().cloned());
        let outcomes = self.process_batch(&unique)?;

        let comparisons = metrics::compare(&outcomes, expected);
        let summary = EvaluationMetrics {
            agent_agreement: metrics::agent_agreement(&outcomes),
            routing_accuracy: metrics::routing_accuracy(&outcomes, expected),
            consistency: metrics::consistency(&outcomes),
        };

        let batch_ids: HashSet<&str> = outcomes.iter().map(|o| o.ticket_id.as_str()).collect();
        let unmatched_expectations: Vec<String> = expected
            .ids()
            .filter(|id| !batch_ids.contains(id))
            .map(str::to_string)
            .collect();
        let unexpected_tickets: Vec<String> = outcomes
            .iter()
            .filter(|o| !expected.contains(&o.ticket_id))
            .map(|o| o.ticket_id.clone())
            .collect();

        if !unmatched_expectations.is_empty() {
            warn!(ids = ?unmatched_expectations, "expected outcomes reference tickets absent from the batch");
        }
        if !unexpected_tickets.is_empty() {
            debug!(ids = ?unexpected_tickets, "tickets without expected outcome excluded from accuracy");
        }

        let report = EvaluationReport {
            classifier: self.classifier.name().to_string(),
            category_accuracy: metrics::comparison_rate(&comparisons, |c| c.category_match),
            priority_accuracy: metrics::comparison_rate(&comparisons, |c| c.priority_match),
            outcomes,
            comparisons,
            rejected,
            metrics: summary,
            unmatched_expectations,
            unexpected_tickets,
        };

        info!(
            classifier = %report.classifier,
            tickets = report.outcomes.len(),
            rejected = report.rejected.len(),
            agreement = report.metrics.agent_agreement,
            routing_accuracy = report.metrics.routing_accuracy,
            consistency = report.metrics.consistency,
            "evaluation complete"
        );

        Ok(report)
    }
}

impl Default for EvaluationHarness {
    fn default() -> Self {
        Self::rule_based()
    }
}

/// Keep the first ticket per id; later duplicates are rejected on `id`
fn dedupe(tickets: impl IntoIterator<Item = Ticket>) -> (Vec<Ticket>, Vec<ValidationError>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut rejected = Vec::new();

    for ticket in tickets {
        if seen.insert(ticket.id().to_string()) {
            unique.push(ticket);
        } else {
            warn!(ticket = %ticket.id(), "duplicate ticket id rejected");
            rejected.push(ValidationError::new(
                ticket.id(),
                "id",
                "duplicate ticket id in batch",
            ));
        }
    }

    (unique, rejected)
}
