//! Keyword rule classifier
//!
//! Category keyword sets are evaluated in fixed precedence order and the first
//! set with a substring hit wins. This is first-match, not best-match.

use super::{Category, CategoryResult, TicketClassifier};
use crate::ticket::Ticket;
use tracing::debug;

const BUG_KEYWORDS: &[&str] = &[
    "crash",
    "error",
    "doesn't work",
    "broken",
    "fail",
    "bug",
    "not working",
];

const FEATURE_REQUEST_KEYWORDS: &[&str] = &[
    "would like",
    "please add",
    "feature request",
    "suggestion",
    "it would be nice",
];

const BILLING_KEYWORDS: &[&str] = &[
    "charge",
    "invoice",
    "billing",
    "refund",
    "payment",
    "overcharged",
];

/// Precedence order; general_complaint is the implicit fallback
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Bug, BUG_KEYWORDS),
    (Category::BillingIssue, BILLING_KEYWORDS),
    (Category::FeatureRequest, FEATURE_REQUEST_KEYWORDS),
];

/// Deterministic keyword classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Keywords of `keywords` found in `text`, preserving set order
    fn matches(text: &str, keywords: &[&str]) -> Vec<String> {
        keywords
            .iter()
            .filter(|k| text.contains(*k))
            .map(|k| k.to_string())
            .collect()
    }
}

impl TicketClassifier for RuleBasedClassifier {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn classify(&self, ticket: &Ticket) -> CategoryResult {
        let text = format!("{} {}", ticket.subject(), ticket.message()).to_lowercase();

        for (category, keywords) in CATEGORY_RULES {
            let matched = Self::matches(&text, keywords);
            if matched.is_empty() {
                continue;
            }

            debug!(ticket = %ticket.id(), %category, keywords = ?matched, "keyword rule matched");
            return CategoryResult {
                category: *category,
                reasoning: format!("Matched {} keywords: {}", category, matched.join(", ")),
                matched_keywords: matched,
            };
        }

        debug!(ticket = %ticket.id(), "no keyword rule matched");
        CategoryResult {
            category: Category::GeneralComplaint,
            reasoning: format!(
                "No category-specific signal found; defaulting to {}",
                Category::GeneralComplaint
            ),
            matched_keywords: Vec::new(),
        }
    }
}
