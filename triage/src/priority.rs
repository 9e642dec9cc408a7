//! Priority scoring
//!
//! Sums independent signal contributions into a score and maps the score onto
//! a priority level through fixed thresholds.
//!
//! ```text
//! Signal          | Points
//! ----------------|------------------------------------------------
//! Tier            | Enterprise 3, Business 2, Standard 1
//! Revenue         | >=100k 3, >=20k 2, >=1k 1, else 0
//! Sentiment       | urgency/anger marker in message: 2
//! Contact         | >=3 previous tickets, last one <=30 days ago: 1
//! Account age     | 0 (no tenure leniency, no penalty)
//!
//! Score >=7 urgent | >=5 high | >=3 medium | else low
//! ```

use crate::error::TriageError;
use crate::ticket::{CustomerTier, Ticket};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// Minimum score for an urgent ticket
pub const URGENT_THRESHOLD: u32 = 7;
/// Minimum score for a high-priority ticket
pub const HIGH_THRESHOLD: u32 = 5;
/// Minimum score for a medium-priority ticket
pub const MEDIUM_THRESHOLD: u32 = 3;

/// Revenue bands as (minimum revenue, points), highest first
const REVENUE_BANDS: &[(f64, u32)] = &[(100_000.0, 3), (20_000.0, 2), (1_000.0, 1)];

const SENTIMENT_POINTS: u32 = 2;
const FREQUENT_CONTACT_POINTS: u32 = 1;
const FREQUENT_CONTACT_MIN_TICKETS: u32 = 3;
const FREQUENT_CONTACT_MAX_DAYS: u32 = 30;
const NEW_ACCOUNT_DAYS: u32 = 60;

/// Urgency and anger phrases, matched case-insensitively
const URGENCY_PHRASES: &[&str] = &[
    "urgent",
    "immediately",
    "unacceptable",
    "emergency",
    "critical",
    "asap",
    "right now",
];

static CAPS_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{3,}\b").expect("CAPS_WORD_RE regex should compile")
});

static EXCLAMATION_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!{2,}").expect("EXCLAMATION_RUN_RE regex should compile"));

/// Urgency classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Urgent,
}

impl PriorityLevel {
    /// All levels, lowest first
    pub const ALL: [PriorityLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Map a score onto a level
    pub fn from_score(score: u32) -> Self {
        if score >= URGENT_THRESHOLD {
            Self::Urgent
        } else if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(TriageError::unknown_label("priority", s)),
        }
    }
}

/// Kind of scoring signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Tier,
    Revenue,
    Sentiment,
    ContactFrequency,
    AccountAge,
}

/// One contribution to the priority score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySignal {
    pub kind: SignalKind,
    pub points: u32,
    pub detail: String,
}

impl PrioritySignal {
    fn new(kind: SignalKind, points: u32, detail: impl Into<String>) -> Self {
        Self {
            kind,
            points,
            detail: detail.into(),
        }
    }

    pub fn fired(&self) -> bool {
        self.points > 0
    }
}

/// Priority evaluation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub priority_level: PriorityLevel,
    /// Sum of all signal points
    pub score: u32,
    pub reasoning: String,
    /// Every contribution, including zero-point ones, in evaluation order
    pub signals: Vec<PrioritySignal>,
}

/// Weighted-factor priority scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityScorer;

impl PriorityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a ticket
    pub fn evaluate(&self, ticket: &Ticket) -> PriorityResult {
        let signals = vec![
            Self::tier_signal(ticket.customer_tier()),
            Self::revenue_signal(ticket.customer_revenue()),
            Self::sentiment_signal(ticket.message()),
            Self::contact_signal(ticket.previous_tickets(), ticket.last_ticket_days_ago()),
            Self::account_age_signal(ticket.account_age_days()),
        ];

        let score: u32 = signals.iter().map(|s| s.points).sum();
        let priority_level = PriorityLevel::from_score(score);

        let fired: Vec<String> = signals
            .iter()
            .filter(|s| s.fired())
            .map(|s| format!("{} (+{})", s.detail, s.points))
            .collect();
        let reasoning = format!(
            "Score {} => {}: {}",
            score,
            priority_level,
            fired.join(", ")
        );

        debug!(ticket = %ticket.id(), score, level = %priority_level, "priority evaluated");

        PriorityResult {
            priority_level,
            score,
            reasoning,
            signals,
        }
    }

    fn tier_signal(tier: CustomerTier) -> PrioritySignal {
        let points = match tier {
            CustomerTier::Enterprise => 3,
            CustomerTier::Business => 2,
            CustomerTier::Standard => 1,
        };
        PrioritySignal::new(SignalKind::Tier, points, format!("{} tier", tier))
    }

    fn revenue_signal(revenue: f64) -> PrioritySignal {
        let points = REVENUE_BANDS
            .iter()
            .find(|(min, _)| revenue >= *min)
            .map(|(_, points)| *points)
            .unwrap_or(0);
        PrioritySignal::new(SignalKind::Revenue, points, format!("revenue {}", revenue))
    }

    /// Urgency markers found in a message, phrases first
    fn urgency_markers(message: &str) -> Vec<String> {
        let lower = message.to_lowercase();
        let mut markers: Vec<String> = URGENCY_PHRASES
            .iter()
            .filter(|p| lower.contains(*p))
            .map(|p| p.to_string())
            .collect();

        for word in CAPS_WORD_RE.find_iter(message) {
            let word = word.as_str();
            if !markers.iter().any(|m| m.eq_ignore_ascii_case(word)) {
                markers.push(word.to_string());
            }
        }

        if EXCLAMATION_RUN_RE.is_match(message) {
            markers.push("!!".to_string());
        }

        markers
    }

    fn sentiment_signal(message: &str) -> PrioritySignal {
        let markers = Self::urgency_markers(message);
        if markers.is_empty() {
            PrioritySignal::new(SignalKind::Sentiment, 0, "neutral tone")
        } else {
            PrioritySignal::new(
                SignalKind::Sentiment,
                SENTIMENT_POINTS,
                format!("urgency markers [{}]", markers.join(", ")),
            )
        }
    }

    fn contact_signal(previous_tickets: u32, last_ticket_days_ago: Option<u32>) -> PrioritySignal {
        match last_ticket_days_ago {
            Some(days)
                if previous_tickets >= FREQUENT_CONTACT_MIN_TICKETS
                    && days <= FREQUENT_CONTACT_MAX_DAYS =>
            {
                PrioritySignal::new(
                    SignalKind::ContactFrequency,
                    FREQUENT_CONTACT_POINTS,
                    format!(
                        "{} previous tickets, last {} days ago",
                        previous_tickets, days
                    ),
                )
            }
            _ => PrioritySignal::new(
                SignalKind::ContactFrequency,
                0,
                format!("{} previous tickets", previous_tickets),
            ),
        }
    }

    fn account_age_signal(days: u32) -> PrioritySignal {
        let detail = if days < NEW_ACCOUNT_DAYS {
            format!("new account ({} days)", days)
        } else {
            format!("established account ({} days)", days)
        };
        PrioritySignal::new(SignalKind::AccountAge, 0, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(tier: CustomerTier, revenue: f64, message: &str) -> Ticket {
        Ticket::builder("P-1", tier)
            .subject("Subject")
            .message(message)
            .customer_revenue(revenue)
            .account_age_days(365)
            .build()
            .unwrap()
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(PriorityLevel::from_score(0), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(2), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(3), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(4), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(5), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(6), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(7), PriorityLevel::Urgent);
        assert_eq!(PriorityLevel::from_score(10), PriorityLevel::Urgent);
    }

    #[test]
    fn test_revenue_bands() {
        let scorer = PriorityScorer::new();
        let score = |revenue| {
            scorer
                .evaluate(&ticket(CustomerTier::Standard, revenue, "hello"))
                .score
        };

        assert_eq!(score(0.0), 1);
        assert_eq!(score(999.99), 1);
        assert_eq!(score(1_000.0), 2);
        assert_eq!(score(20_000.0), 3);
        assert_eq!(score(99_999.0), 3);
        assert_eq!(score(100_000.0), 4);
    }

    #[test]
    fn test_sentiment_markers() {
        let scorer = PriorityScorer::new();
        let sentiment = |message: &str| {
            scorer
                .evaluate(&ticket(CustomerTier::Standard, 0.0, message))
                .signals
                .into_iter()
                .find(|s| s.kind == SignalKind::Sentiment)
                .unwrap()
        };

        assert_eq!(sentiment("This is unacceptable").points, 2);
        assert_eq!(sentiment("Fix it NOW please").points, 2);
        assert_eq!(sentiment("Why is this happening!!").points, 2);
        assert_eq!(sentiment("Thanks for the help!").points, 0);
        assert_eq!(sentiment("I use the API daily").points, 2);
        assert_eq!(sentiment("I am OK with it").points, 0);

        // Counted once no matter how many markers appear
        let s = sentiment("URGENT: respond IMMEDIATELY!!! The DASHBOARD is empty");
        assert_eq!(s.points, 2);
        assert_eq!(s.detail, "urgency markers [urgent, immediately, DASHBOARD, !!]");
    }

    #[test]
    fn test_subject_does_not_drive_sentiment() {
        let t = Ticket::builder("P-4", CustomerTier::Standard)
            .subject("URGENT!!! Respond IMMEDIATELY")
            .message("Could you take a look when you have a moment?")
            .build()
            .unwrap();

        let result = PriorityScorer::new().evaluate(&t);
        let sentiment = result
            .signals
            .iter()
            .find(|s| s.kind == SignalKind::Sentiment)
            .unwrap();
        assert_eq!(sentiment.points, 0);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_contact_frequency() {
        let scorer = PriorityScorer::new();
        let build = |previous, last| {
            Ticket::builder("P-2", CustomerTier::Standard)
                .message("hello")
                .previous_tickets(previous)
                .last_ticket_days_ago(last)
                .build()
                .unwrap()
        };

        assert_eq!(scorer.evaluate(&build(3, Some(30))).score, 2);
        assert_eq!(scorer.evaluate(&build(3, Some(31))).score, 1);
        assert_eq!(scorer.evaluate(&build(2, Some(5))).score, 1);
        assert_eq!(scorer.evaluate(&build(10, None)).score, 1);
    }

    #[test]
    fn test_account_age_never_scores() {
        let scorer = PriorityScorer::new();
        let young = Ticket::builder("P-3", CustomerTier::Business)
            .account_age_days(5)
            .build()
            .unwrap();
        let old = Ticket::builder("P-3", CustomerTier::Business)
            .account_age_days(5_000)
            .build()
            .unwrap();

        assert_eq!(scorer.evaluate(&young).score, scorer.evaluate(&old).score);
    }

    #[test]
    fn test_urgent_enterprise() {
        let result = PriorityScorer::new().evaluate(&ticket(
            CustomerTier::Enterprise,
            150_000.0,
            "We need this fixed IMMEDIATELY",
        ));

        assert_eq!(result.score, 8);
        assert_eq!(result.priority_level, PriorityLevel::Urgent);
        assert!(result.reasoning.starts_with("Score 8 => urgent"));
        assert!(result.reasoning.contains("Enterprise tier (+3)"));
        assert!(result.reasoning.contains("revenue 150000 (+3)"));
        assert!(!result.reasoning.contains("account"));
    }

    #[test]
    fn test_signals_cover_every_factor() {
        let result =
            PriorityScorer::new().evaluate(&ticket(CustomerTier::Standard, 0.0, "hello"));
        assert_eq!(result.signals.len(), 5);
        assert_eq!(
            result.signals.iter().filter(|s| s.fired()).count(),
            1,
            "only the tier fires for a quiet standard ticket"
        );
    }
}
