//! Expected-outcome fixtures
//!
//! A fixture maps ticket ids to the category, priority and team a reviewer
//! expects. It is always passed into the harness explicitly.

use crate::classifier::Category;
use crate::priority::PriorityLevel;
use crate::router::Team;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ground truth for one ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedOutcome {
    pub category: Category,
    pub priority: PriorityLevel,
    pub team: Team,
}

impl ExpectedOutcome {
    pub fn new(category: Category, priority: PriorityLevel, team: Team) -> Self {
        Self {
            category,
            priority,
            team,
        }
    }
}

/// Read-only table of expected outcomes keyed by ticket id.
///
/// Serializes as a plain map, so a JSON fixture is an object keyed by id and
/// a TOML fixture is one table per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedOutcomes {
    outcomes: BTreeMap<String, ExpectedOutcome>,
}

impl ExpectedOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the expectation for one ticket
    pub fn with(mut self, ticket_id: impl Into<String>, outcome: ExpectedOutcome) -> Self {
        self.outcomes.insert(ticket_id.into(), outcome);
        self
    }

    /// Reference fixture for the five sample tickets shipped with the CLI
    pub fn reference() -> Self {
        Self::new()
            .with(
                "SUP-001",
                ExpectedOutcome::new(Category::Bug, PriorityLevel::High, Team::Escalation),
            )
            .with(
                "SUP-002",
                ExpectedOutcome::new(Category::FeatureRequest, PriorityLevel::Low, Team::Product),
            )
            .with(
                "SUP-003",
                ExpectedOutcome::new(
                    Category::BillingIssue,
                    PriorityLevel::Medium,
                    Team::Finance,
                ),
            )
            .with(
                "SUP-004",
                ExpectedOutcome::new(
                    Category::GeneralComplaint,
                    PriorityLevel::Urgent,
                    Team::Escalation,
                ),
            )
            .with(
                "SUP-005",
                ExpectedOutcome::new(
                    Category::GeneralComplaint,
                    PriorityLevel::Low,
                    Team::General,
                ),
            )
    }

    pub fn get(&self, ticket_id: &str) -> Option<&ExpectedOutcome> {
        self.outcomes.get(ticket_id)
    }

    pub fn contains(&self, ticket_id: &str) -> bool {
        self.outcomes.contains_key(ticket_id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Ticket ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }
}
