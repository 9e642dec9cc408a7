//! Model-backed classifier
//!
//! Delegates the category decision to a [`CategoryModel`] backend. The backend
//! only has to return a label; parsing, validation and the keyword fallback
//! live here so that the classifier stays total.

use super::rules::RuleBasedClassifier;
use super::{Category, CategoryResult, TicketClassifier};
use crate::ticket::Ticket;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Instructions sent with every classification prompt
const SYSTEM_PROMPT: &str = "Analyze the customer support ticket and classify it into exactly one \
category: bug, feature_request, billing_issue, general_complaint. Reply with the category label only.";

/// Failure reported by a category model backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model {model} failed: {message}")]
pub struct ModelError {
    pub model: String,
    pub message: String,
}

impl ModelError {
    pub fn new(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            message: message.into(),
        }
    }
}

/// Prompt handed to a category model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPrompt {
    pub ticket_id: String,
    pub system: String,
    pub user: String,
}

impl CategoryPrompt {
    /// Build the prompt for one ticket
    pub fn for_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.id().to_string(),
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Ticket ID: {}\nSubject: {}\nMessage: {}\n\nPlease classify this ticket.",
                ticket.id(),
                ticket.subject(),
                ticket.message()
            ),
        }
    }
}

/// Backend able to label a ticket prompt with a category
pub trait CategoryModel: Send + Sync {
    /// Model identifier for logs and reasoning text
    fn model_name(&self) -> &str;

    /// Return a raw category label for the prompt
    fn complete(&self, prompt: &CategoryPrompt) -> Result<String, ModelError>;
}

/// Deterministic backend returning canned labels per ticket id.
///
/// Tickets without a canned label get `default_label`, or an error when no
/// default is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticCategoryModel {
    name: String,
    labels: HashMap<String, String>,
    default_label: Option<String>,
}

impl StaticCategoryModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: HashMap::new(),
            default_label: None,
        }
    }

    /// Canned label for one ticket id
    pub fn with_label(mut self, ticket_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(ticket_id.into(), label.into());
        self
    }

    /// Label used for every ticket without a canned one
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = Some(label.into());
        self
    }
}

impl CategoryModel for StaticCategoryModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn complete(&self, prompt: &CategoryPrompt) -> Result<String, ModelError> {
        self.labels
            .get(&prompt.ticket_id)
            .or(self.default_label.as_ref())
            .cloned()
            .ok_or_else(|| {
                ModelError::new(
                    &self.name,
                    format!("no label for ticket {}", prompt.ticket_id),
                )
            })
    }
}

/// Classifier that consults a model and falls back to keyword rules
pub struct ModelBackedClassifier<M: CategoryModel> {
    model: M,
    fallback: RuleBasedClassifier,
}

impl<M: CategoryModel> ModelBackedClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            fallback: RuleBasedClassifier::new(),
        }
    }

    /// Strip quoting and trailing punctuation models tend to add
    fn clean_label(raw: &str) -> &str {
        raw.trim()
            .trim_end_matches(['.', '!'])
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim()
    }

    fn fall_back(&self, ticket: &Ticket, cause: &str) -> CategoryResult {
        let rules = self.fallback.classify(ticket);
        CategoryResult {
            reasoning: format!(
                "Model {} gave no usable answer ({}); keyword rules: {}",
                self.model.model_name(),
                cause,
                rules.reasoning
            ),
            ..rules
        }
    }
}

impl<M: CategoryModel> TicketClassifier for ModelBackedClassifier<M> {
    fn name(&self) -> &str {
        "model-backed"
    }

    fn classify(&self, ticket: &Ticket) -> CategoryResult {
        let prompt = CategoryPrompt::for_ticket(ticket);

        let raw = match self.model.complete(&prompt) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(ticket = %ticket.id(), error = %e, "category model failed, using keyword rules");
                return self.fall_back(ticket, &e.to_string());
            }
        };

        match Self::clean_label(&raw).parse::<Category>() {
            Ok(category) => {
                debug!(ticket = %ticket.id(), model = %self.model.model_name(), %category, "model label accepted");
                CategoryResult {
                    category,
                    reasoning: format!(
                        "Model {} classified the ticket as {}",
                        self.model.model_name(),
                        category
                    ),
                    matched_keywords: Vec::new(),
                }
            }
            Err(e) => {
                warn!(ticket = %ticket.id(), label = %raw, "category model returned unknown label");
                self.fall_back(ticket, &e.to_string())
            }
        }
    }
}
