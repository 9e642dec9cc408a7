//! Evaluation Module
//!
//! Scores the triage pipeline against a ground-truth fixture.
//!
//! # Architecture
//!
//! ```text
//! Vec<RawTicket> → validate → Vec<Ticket> ──> per-ticket pipeline
//!                     │                             ↓
//!                     ↓                      Vec<TicketOutcome>
//!                 rejected                          ↓
//!                               ExpectedOutcomes → metrics reduction
//!                                                   ↓
//!                                           EvaluationReport
//! ```
//!
//! # Metrics
//!
//! - Agent agreement: priority plausible for the category
//! - Routing accuracy: team equals the fixture's team (fixture tickets only)
//! - Consistency: similar subjects get identical category and priority

pub mod fixture;
pub mod harness;
pub mod metrics;

pub use fixture::{ExpectedOutcome, ExpectedOutcomes};
pub use harness::{EvaluationHarness, EvaluationReport, OutcomeComparison, TicketOutcome};
pub use metrics::{
    agent_agreement, compatible_priorities, consistency, routing_accuracy, subject_tokens,
    subjects_similar, EvaluationMetrics,
};
