//! Property-based tests for the triage pipeline
//!
//! Properties:
//! - Classifier, scorer and router are deterministic
//! - Raising the customer tier never lowers the priority score
//! - Every (category, priority, tier) combination routes to exactly one team
//! - Evaluation metrics stay within [0.0, 1.0]
//! - Batch processing matches per-ticket processing in batch order
//!   (run with `--features parallel` to cover the rayon fan-out)

use proptest::prelude::*;
use triage::{
    Category, CategoryResult, CustomerTier, EvaluationHarness, ExpectedOutcome,
    ExpectedOutcomes, PriorityLevel, PriorityResult, PriorityScorer, Router,
    RuleBasedClassifier, Team, Ticket, TicketClassifier,
};

// ============================================================================
// STRATEGIES
// ============================================================================

fn arb_tier() -> impl Strategy<Value = CustomerTier> {
    prop_oneof![
        Just(CustomerTier::Standard),
        Just(CustomerTier::Business),
        Just(CustomerTier::Enterprise),
    ]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = PriorityLevel> {
    prop::sample::select(PriorityLevel::ALL.to_vec())
}

fn arb_team() -> impl Strategy<Value = Team> {
    prop::sample::select(Team::ALL.to_vec())
}

/// Text mixing keyword fragments, shouting and punctuation with free words
fn arb_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("crash".to_string()),
        Just("invoice".to_string()),
        Just("please add".to_string()),
        Just("URGENT".to_string()),
        Just("!!".to_string()),
        Just("export".to_string()),
        Just("feature".to_string()),
        "[a-zA-Z]{1,10}",
    ];
    prop::collection::vec(fragment, 0..8).prop_map(|words| words.join(" "))
}

prop_compose! {
    fn arb_ticket(id: String)(
        tier in arb_tier(),
        subject in arb_text(),
        message in arb_text(),
        revenue in 0.0f64..500_000.0,
        age in 0u32..5_000,
        previous in 0u32..20,
        last in prop::option::of(0u32..365),
    ) -> Ticket {
        Ticket::builder(id.clone(), tier)
            .subject(subject)
            .message(message)
            .customer_revenue(revenue)
            .account_age_days(age)
            .previous_tickets(previous)
            .last_ticket_days_ago(last)
            .build()
            .unwrap()
    }
}

fn arb_batch() -> impl Strategy<Value = Vec<Ticket>> {
    (1usize..12).prop_flat_map(|n| {
        (0..n)
            .map(|i| arb_ticket(format!("PT-{i}")))
            .collect::<Vec<_>>()
    })
}

fn arb_fixture() -> impl Strategy<Value = ExpectedOutcomes> {
    prop::collection::vec(
        (0usize..15, arb_category(), arb_priority(), arb_team()),
        0..10,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .fold(ExpectedOutcomes::new(), |fixture, (i, c, p, t)| {
                fixture.with(format!("PT-{i}"), ExpectedOutcome::new(c, p, t))
            })
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_pipeline_is_deterministic(ticket in arb_ticket("PT-0".to_string())) {
        let classifier = RuleBasedClassifier::new();
        let scorer = PriorityScorer::new();
        let router = Router::new();

        let category = classifier.classify(&ticket);
        let priority = scorer.evaluate(&ticket);
        let routing = router.route(&ticket, &category, &priority);

        prop_assert_eq!(&category, &classifier.classify(&ticket));
        prop_assert_eq!(&priority, &scorer.evaluate(&ticket));
        prop_assert_eq!(&routing, &router.route(&ticket, &category, &priority));
    }

    #[test]
    fn prop_tier_is_monotonic(
        message in arb_text(),
        revenue in 0.0f64..500_000.0,
        previous in 0u32..20,
        last in prop::option::of(0u32..365),
    ) {
        let scorer = PriorityScorer::new();
        let scores: Vec<u32> = CustomerTier::ALL
            .iter()
            .map(|tier| {
                let ticket = Ticket::builder("PT-M", *tier)
                    .message(message.clone())
                    .customer_revenue(revenue)
                    .previous_tickets(previous)
                    .last_ticket_days_ago(last)
                    .build()
                    .unwrap();
                scorer.evaluate(&ticket).score
            })
            .collect();

        prop_assert!(scores.windows(2).all(|w| w[0] <= w[1]), "scores {:?}", scores);
    }

    #[test]
    fn prop_routing_is_total(
        category in arb_category(),
        priority_level in arb_priority(),
        tier in arb_tier(),
    ) {
        let ticket = Ticket::builder("PT-R", tier).build().unwrap();
        let category_result = CategoryResult {
            category,
            reasoning: String::new(),
            matched_keywords: Vec::new(),
        };
        let priority_result = PriorityResult {
            priority_level,
            score: 0,
            reasoning: String::new(),
            signals: Vec::new(),
        };

        let routing = Router::new().route(&ticket, &category_result, &priority_result);
        prop_assert!(Team::ALL.contains(&routing.team));
        prop_assert!(!routing.reasoning.is_empty());

        let escalate = priority_level == PriorityLevel::Urgent
            || (category == Category::Bug && tier == CustomerTier::Enterprise);
        prop_assert_eq!(routing.team == Team::Escalation, escalate);
    }

    #[test]
    fn prop_batch_matches_per_ticket_order(batch in arb_batch()) {
        let harness = EvaluationHarness::rule_based();
        let outcomes = harness.process_batch(&batch).unwrap();

        prop_assert_eq!(outcomes.len(), batch.len());
        for (ticket, outcome) in batch.iter().zip(&outcomes) {
            prop_assert_eq!(&outcome.ticket_id, ticket.id());
            prop_assert_eq!(outcome, &harness.process(ticket));
        }
    }

    #[test]
    fn prop_metrics_are_bounded(batch in arb_batch(), fixture in arb_fixture()) {
        let metrics = EvaluationHarness::rule_based().evaluate(&batch, &fixture).unwrap();

        for value in [metrics.agent_agreement, metrics.routing_accuracy, metrics.consistency] {
            prop_assert!((0.0..=1.0).contains(&value), "metric out of range: {}", value);
        }
    }
}
