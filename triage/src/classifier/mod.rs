//! Ticket Classifier Module
//!
//! Maps a ticket to one of four categories. Two interchangeable variants share
//! the [`TicketClassifier`] contract:
//!
//! - [`RuleBasedClassifier`]: ordered keyword sets, first match wins
//! - [`ModelBackedClassifier`]: asks a [`CategoryModel`] backend for a label
//!   and falls back to the keyword rules when the backend cannot answer
//!
//! # Keyword Precedence
//!
//! ```text
//! Category          | Checked | Signals
//! ------------------|---------|------------------------------------------
//! bug               | 1st     | crash, error, broken, fail, not working …
//! billing_issue     | 2nd     | charge, invoice, billing, refund …
//! feature_request   | 3rd     | would like, please add, suggestion …
//! general_complaint | last    | (fallback)
//! ```

pub mod model;
pub mod rules;

pub use model::{
    CategoryModel, CategoryPrompt, ModelBackedClassifier, ModelError, StaticCategoryModel,
};
pub use rules::RuleBasedClassifier;

use crate::error::TriageError;
use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticket subject-matter category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "bug report")]
    Bug,
    #[serde(alias = "feature request")]
    FeatureRequest,
    #[serde(alias = "billing issue")]
    BillingIssue,
    #[serde(alias = "general complaint")]
    GeneralComplaint,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 4] = [
        Self::Bug,
        Self::FeatureRequest,
        Self::BillingIssue,
        Self::GeneralComplaint,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bug => write!(f, "bug"),
            Self::FeatureRequest => write!(f, "feature_request"),
            Self::BillingIssue => write!(f, "billing_issue"),
            Self::GeneralComplaint => write!(f, "general_complaint"),
        }
    }
}

impl FromStr for Category {
    type Err = TriageError;

    /// Accepts snake_case, spaced and hyphenated labels in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "bug" | "bug_report" => Ok(Self::Bug),
            "feature_request" => Ok(Self::FeatureRequest),
            "billing_issue" => Ok(Self::BillingIssue),
            "general_complaint" => Ok(Self::GeneralComplaint),
            _ => Err(TriageError::unknown_label("category", s)),
        }
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Assigned category
    pub category: Category,
    /// Human-readable explanation
    pub reasoning: String,
    /// Keywords that triggered the category, in keyword-set order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,
}

/// Contract shared by every classifier variant.
///
/// Implementations must be total and deterministic: the same ticket always
/// yields the same result.
pub trait TicketClassifier: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    /// Classify a ticket
    fn classify(&self, ticket: &Ticket) -> CategoryResult;
}
