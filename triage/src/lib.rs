//! Support Ticket Triage Library
//!
//! This library provides a deterministic three-stage decision pipeline for
//! customer support tickets, plus a harness that scores the pipeline against
//! a ground-truth fixture.
//!
//! # Pipeline
//!
//! ```text
//! Ticket ──┬──> Classifier ──────> CategoryResult ──┐
//!          │                                         ├──> Router ──> RoutingResult
//!          └──> PriorityScorer ──> PriorityResult ──┘
//! ```
//!
//! - `classifier`: keyword rules mapping a ticket to a [`Category`]
//! - `priority`: weighted-factor scoring mapping a ticket to a [`PriorityLevel`]
//! - `router`: ordered decision table mapping both results to a [`Team`]
//! - `evaluation`: batch runs, agent agreement, routing accuracy, consistency
//!
//! Every stage is a pure function of its inputs. The library performs no I/O;
//! loading ticket files and printing reports belongs to the `triage-cli` binary.

#![allow(clippy::uninlined_format_args)]

pub mod classifier;
pub mod error;
pub mod evaluation;
pub mod priority;
pub mod router;
pub mod ticket;

pub use error::{TriageError, TriageResult, ValidationError};

pub use ticket::{CustomerTier, RawTicket, Ticket, TicketBuilder};

pub use classifier::{
    Category, CategoryModel, CategoryResult, ModelBackedClassifier, ModelError,
    RuleBasedClassifier, StaticCategoryModel, TicketClassifier,
};

pub use priority::{PriorityLevel, PriorityResult, PriorityScorer, PrioritySignal, SignalKind};

pub use router::{Router, RoutingResult, RoutingRule, Team};

pub use evaluation::{
    EvaluationHarness, EvaluationMetrics, EvaluationReport, ExpectedOutcome, ExpectedOutcomes,
    OutcomeComparison, TicketOutcome,
};
