//! Ticket Router
//!
//! Combines classifier and priority outputs into a team assignment through an
//! ordered decision table. The first matching rule wins and the final rule
//! always matches, so every ticket is routed exactly once.
//!
//! ```text
//! # | Condition                                        | Team
//! --|--------------------------------------------------|-----------------
//! 1 | priority == urgent OR (bug AND Enterprise tier)  | Escalation Team
//! 2 | category == feature_request                      | Product Team
//! 3 | category == billing_issue                        | Finance Support
//! 4 | otherwise                                        | General Support
//! ```

use crate::classifier::{Category, CategoryResult};
use crate::error::TriageError;
use crate::priority::{PriorityLevel, PriorityResult};
use crate::ticket::{CustomerTier, Ticket};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Handling team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "Escalation Team")]
    Escalation,
    #[serde(rename = "Product Team")]
    Product,
    #[serde(rename = "Finance Support")]
    Finance,
    #[serde(rename = "General Support")]
    General,
}

impl Team {
    pub const ALL: [Team; 4] = [Self::Escalation, Self::Product, Self::Finance, Self::General];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Escalation => "Escalation Team",
            Self::Product => "Product Team",
            Self::Finance => "Finance Support",
            Self::General => "General Support",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Team {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|team| team.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TriageError::unknown_label("team", s))
    }
}

/// Decision-table row that produced a routing result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingRule {
    Escalation,
    ProductCategory,
    FinanceCategory,
    Default,
}

/// Routing decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub team: Team,
    pub reasoning: String,
    pub rule: RoutingRule,
}

/// Stateless decision-table router
#[derive(Debug, Clone, Copy, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    /// Route one ticket given its category and priority
    pub fn route(
        &self,
        ticket: &Ticket,
        category_result: &CategoryResult,
        priority_result: &PriorityResult,
    ) -> RoutingResult {
        let category = category_result.category;
        let priority = priority_result.priority_level;
        let tier = ticket.customer_tier();

        let is_urgent = priority == PriorityLevel::Urgent;
        let is_enterprise_bug = category == Category::Bug && tier == CustomerTier::Enterprise;

        let result = if is_urgent || is_enterprise_bug {
            let mut clauses = Vec::new();
            if is_urgent {
                clauses.push(format!("the ticket is marked as {}", priority));
            }
            if is_enterprise_bug {
                clauses.push(format!("it's a {} from an {} customer", category, tier));
            }
            RoutingResult {
                team: Team::Escalation,
                reasoning: format!(
                    "Routed to {} because {}",
                    Team::Escalation,
                    clauses.join(" and ")
                ),
                rule: RoutingRule::Escalation,
            }
        } else {
            match category {
                Category::FeatureRequest => {
                    Self::by_category(Team::Product, category, RoutingRule::ProductCategory)
                }
                Category::BillingIssue => {
                    Self::by_category(Team::Finance, category, RoutingRule::FinanceCategory)
                }
                Category::Bug | Category::GeneralComplaint => RoutingResult {
                    team: Team::General,
                    reasoning: format!(
                        "Routed to {} as it doesn't meet criteria for specialized teams",
                        Team::General
                    ),
                    rule: RoutingRule::Default,
                },
            }
        };

        debug!(ticket = %ticket.id(), team = %result.team, rule = ?result.rule, "ticket routed");
        result
    }

    fn by_category(team: Team, category: Category, rule: RoutingRule) -> RoutingResult {
        RoutingResult {
            team,
            reasoning: format!(
                "Routed to {} because the ticket is categorized as {}",
                team, category
            ),
            rule,
        }
    }
}
