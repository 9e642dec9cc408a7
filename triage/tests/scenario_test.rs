//! End-to-end scenarios for the triage pipeline
//!
//! Each scenario runs a realistic ticket through classify → score → route
//! and checks the decision a support lead would expect.

use triage::{
    Category, CustomerTier, EvaluationHarness, ExpectedOutcomes, PriorityLevel, Team, Ticket,
    TicketOutcome,
};

fn run(ticket: Ticket) -> TicketOutcome {
    EvaluationHarness::rule_based().process(&ticket)
}

/// The five sample tickets the reference fixture describes
fn sample_batch() -> Vec<Ticket> {
    vec![
        Ticket::builder("SUP-001", CustomerTier::Enterprise)
            .subject("Application crashes when uploading large files")
            .message("Every upload above 2GB crashes the desktop client.")
            .customer_revenue(120_000.0)
            .account_age_days(900)
            .previous_tickets(1)
            .last_ticket_days_ago(Some(120))
            .build()
            .unwrap(),
        Ticket::builder("SUP-002", CustomerTier::Standard)
            .subject("Feature request: Dark mode")
            .message("It would be nice to have a dark theme for late evenings.")
            .customer_revenue(600.0)
            .account_age_days(45)
            .build()
            .unwrap(),
        Ticket::builder("SUP-003", CustomerTier::Business)
            .subject("Billing discrepancy on latest invoice")
            .message("We were charged for 12 seats but only have 10 users.")
            .customer_revenue(45_000.0)
            .account_age_days(700)
            .previous_tickets(2)
            .last_ticket_days_ago(Some(200))
            .build()
            .unwrap(),
        Ticket::builder("SUP-004", CustomerTier::Enterprise)
            .subject("URGENT: Service completely down")
            .message("Nobody on our team can reach the dashboard. Restore access IMMEDIATELY.")
            .customer_revenue(250_000.0)
            .account_age_days(1500)
            .previous_tickets(4)
            .last_ticket_days_ago(Some(12))
            .build()
            .unwrap(),
        Ticket::builder("SUP-005", CustomerTier::Standard)
            .subject("Confused about how to use the export feature")
            .message("Where do I find the export option in the reports view?")
            .customer_revenue(300.0)
            .account_age_days(20)
            .build()
            .unwrap(),
    ]
}

#[test]
fn test_enterprise_crash_escalates() {
    let outcome = run(sample_batch().remove(0));

    assert_eq!(outcome.category.category, Category::Bug);
    assert!(matches!(
        outcome.priority.priority_level,
        PriorityLevel::High | PriorityLevel::Urgent
    ));
    assert_eq!(outcome.routing.team, Team::Escalation);
}

#[test]
fn test_dark_mode_goes_to_product() {
    let outcome = run(sample_batch().remove(1));

    assert_eq!(outcome.category.category, Category::FeatureRequest);
    assert!(matches!(
        outcome.priority.priority_level,
        PriorityLevel::Low | PriorityLevel::Medium
    ));
    assert_eq!(outcome.routing.team, Team::Product);
}

#[test]
fn test_invoice_discrepancy_goes_to_finance() {
    let outcome = run(sample_batch().remove(2));

    assert_eq!(outcome.category.category, Category::BillingIssue);
    assert_eq!(outcome.routing.team, Team::Finance);
}

#[test]
fn test_outage_is_urgent_on_priority_alone() {
    let outcome = run(sample_batch().remove(3));

    assert_eq!(outcome.category.category, Category::GeneralComplaint);
    assert_eq!(outcome.priority.priority_level, PriorityLevel::Urgent);
    assert_eq!(outcome.routing.team, Team::Escalation);
    assert!(outcome.routing.reasoning.contains("marked as urgent"));
    assert!(!outcome.routing.reasoning.contains("bug"));
}

#[test]
fn test_how_to_question_goes_to_general_support() {
    let outcome = run(sample_batch().remove(4));

    assert_eq!(outcome.category.category, Category::GeneralComplaint);
    assert!(outcome.category.matched_keywords.is_empty());
    assert_eq!(outcome.routing.team, Team::General);
}

#[test]
fn test_bug_wins_over_billing() {
    let ticket = Ticket::builder("SUP-010", CustomerTier::Business)
        .subject("Payment form error")
        .message("Submitting a payment fails with an error.")
        .build()
        .unwrap();

    let outcome = run(ticket);
    assert_eq!(outcome.category.category, Category::Bug);
    assert_eq!(outcome.routing.team, Team::General);
}

#[test]
fn test_reference_batch_metrics() {
    let report = EvaluationHarness::rule_based()
        .run(&sample_batch(), &ExpectedOutcomes::reference())
        .unwrap();

    assert!(report.rejected.is_empty());
    assert!(report.unmatched_expectations.is_empty());
    assert!(report.unexpected_tickets.is_empty());
    assert!(report.ensure_fixture_aligned().is_ok());

    assert_eq!(report.metrics.agent_agreement, 1.0);
    assert_eq!(report.metrics.routing_accuracy, 1.0);
    assert_eq!(report.category_accuracy, 1.0);
    assert_eq!(report.priority_accuracy, 1.0);

    // SUP-002 and SUP-005 both mention "feature" but land in different categories
    assert_eq!(report.metrics.consistency, 0.0);

    let text = report.format_report();
    assert!(text.contains("| Routing Accuracy | 1.00 |"));
    assert!(text.contains("| Consistency | 0.00 |"));
}
