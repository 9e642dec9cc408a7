//! Ticket input records
//!
//! [`RawTicket`] is the loose wire shape read from ticket files. [`Ticket`] is
//! the validated, immutable record every pipeline stage consumes; the only way
//! to obtain one is through validation.

use crate::error::{TriageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder id used when a record has no usable id
const UNKNOWN_ID: &str = "<unknown>";

/// Customer account class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerTier {
    #[serde(alias = "standard")]
    Standard,
    #[serde(alias = "business")]
    Business,
    #[serde(alias = "enterprise")]
    Enterprise,
}

impl CustomerTier {
    /// All tiers, lowest first
    pub const ALL: [CustomerTier; 3] = [Self::Standard, Self::Business, Self::Enterprise];
}

impl std::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::Business => write!(f, "Business"),
            Self::Enterprise => write!(f, "Enterprise"),
        }
    }
}

impl FromStr for CustomerTier {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "business" => Ok(Self::Business),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(TriageError::unknown_label("customer tier", s)),
        }
    }
}

/// Unvalidated ticket record as it appears in a ticket file.
///
/// Every field is optional and integers are signed so that a missing or
/// negative value becomes a [`ValidationError`] for this record only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTicket {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub customer_tier: Option<String>,
    #[serde(alias = "revenue")]
    pub customer_revenue: Option<f64>,
    pub account_age_days: Option<i64>,
    pub previous_tickets: Option<i64>,
    pub last_ticket_days_ago: Option<i64>,
}

impl RawTicket {
    /// Best-effort id for error reporting
    pub fn display_id(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(UNKNOWN_ID)
    }
}

/// A validated, immutable support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTicket")]
pub struct Ticket {
    id: String,
    subject: String,
    message: String,
    customer_tier: CustomerTier,
    customer_revenue: f64,
    account_age_days: u32,
    previous_tickets: u32,
    last_ticket_days_ago: Option<u32>,
}

impl Ticket {
    /// Start building a ticket; fields not set default to empty text and zero counts
    pub fn builder(id: impl Into<String>, customer_tier: CustomerTier) -> TicketBuilder {
        TicketBuilder {
            id: id.into(),
            subject: String::new(),
            message: String::new(),
            customer_tier,
            customer_revenue: 0.0,
            account_age_days: 0,
            previous_tickets: 0,
            last_ticket_days_ago: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn customer_tier(&self) -> CustomerTier {
        self.customer_tier
    }

    pub fn customer_revenue(&self) -> f64 {
        self.customer_revenue
    }

    pub fn account_age_days(&self) -> u32 {
        self.account_age_days
    }

    pub fn previous_tickets(&self) -> u32 {
        self.previous_tickets
    }

    /// Days since the previous ticket; `None` means no prior ticket
    pub fn last_ticket_days_ago(&self) -> Option<u32> {
        self.last_ticket_days_ago
    }
}

/// Builder for [`Ticket`]; validation happens in [`TicketBuilder::build`]
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    id: String,
    subject: String,
    message: String,
    customer_tier: CustomerTier,
    customer_revenue: f64,
    account_age_days: u32,
    previous_tickets: u32,
    last_ticket_days_ago: Option<u32>,
}

impl TicketBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn customer_revenue(mut self, revenue: f64) -> Self {
        self.customer_revenue = revenue;
        self
    }

    pub fn account_age_days(mut self, days: u32) -> Self {
        self.account_age_days = days;
        self
    }

    pub fn previous_tickets(mut self, count: u32) -> Self {
        self.previous_tickets = count;
        self
    }

    pub fn last_ticket_days_ago(mut self, days: Option<u32>) -> Self {
        self.last_ticket_days_ago = days;
        self
    }

    /// Validate and freeze the ticket
    pub fn build(self) -> Result<Ticket, ValidationError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::new(UNKNOWN_ID, "id", "must not be empty"));
        }
        if !self.customer_revenue.is_finite() {
            return Err(ValidationError::new(
                id,
                "customer_revenue",
                "must be a finite number",
            ));
        }
        if self.customer_revenue < 0.0 {
            return Err(ValidationError::new(
                id,
                "customer_revenue",
                format!("must be non-negative, got {}", self.customer_revenue),
            ));
        }

        Ok(Ticket {
            id,
            subject: self.subject,
            message: self.message,
            customer_tier: self.customer_tier,
            customer_revenue: self.customer_revenue,
            account_age_days: self.account_age_days,
            previous_tickets: self.previous_tickets,
            last_ticket_days_ago: self.last_ticket_days_ago,
        })
    }
}

/// Convert a signed count into the non-negative domain
fn non_negative(ticket_id: &str, field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(
            ticket_id,
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    u32::try_from(value)
        .map_err(|_| ValidationError::new(ticket_id, field, format!("out of range: {}", value)))
}

fn required<T>(ticket_id: &str, field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(ticket_id, field, "required field is missing"))
}

impl TryFrom<RawTicket> for Ticket {
    type Error = ValidationError;

    fn try_from(raw: RawTicket) -> Result<Self, Self::Error> {
        let id = raw.display_id().to_string();
        if id == UNKNOWN_ID {
            return Err(ValidationError::new(
                UNKNOWN_ID,
                "id",
                "required field is missing",
            ));
        }

        let subject = required(&id, "subject", raw.subject)?;
        let message = required(&id, "message", raw.message)?;
        let tier_label = required(&id, "customer_tier", raw.customer_tier)?;
        let customer_tier = tier_label.parse::<CustomerTier>().map_err(|_| {
            ValidationError::new(
                &id,
                "customer_tier",
                format!(
                    "unknown tier {:?} (expected Standard, Business or Enterprise)",
                    tier_label
                ),
            )
        })?;
        let customer_revenue = required(&id, "customer_revenue", raw.customer_revenue)?;
        let account_age_days = non_negative(
            &id,
            "account_age_days",
            required(&id, "account_age_days", raw.account_age_days)?,
        )?;
        let previous_tickets = non_negative(
            &id,
            "previous_tickets",
            required(&id, "previous_tickets", raw.previous_tickets)?,
        )?;
        let last_ticket_days_ago = raw
            .last_ticket_days_ago
            .map(|days| non_negative(&id, "last_ticket_days_ago", days))
            .transpose()?;

        Ticket::builder(id, customer_tier)
            .subject(subject)
            .message(message)
            .customer_revenue(customer_revenue)
            .account_age_days(account_age_days)
            .previous_tickets(previous_tickets)
            .last_ticket_days_ago(last_ticket_days_ago)
            .build()
    }
}
