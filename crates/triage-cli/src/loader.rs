//! File loading for ticket batches, fixtures and canned model labels

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use triage::{ExpectedOutcomes, RawTicket, StaticCategoryModel, ValidationError};

/// Ticket records read from disk, split into parseable and unparseable ones
#[derive(Debug, Default)]
pub struct TicketBatch {
    pub records: Vec<RawTicket>,
    /// Records whose JSON shape could not be read at all
    pub rejected: Vec<ValidationError>,
}

/// Parse a JSON array of ticket records; each element is read independently
pub fn parse_tickets(content: &str) -> Result<TicketBatch> {
    let values: Vec<Value> =
        serde_json::from_str(content).context("Ticket file must be a JSON array of records")?;

    let mut batch = TicketBatch::default();
    for value in values {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        match serde_json::from_value::<RawTicket>(value) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(ticket = %id, error = %e, "unreadable ticket record");
                batch
                    .rejected
                    .push(ValidationError::new(id, "record", e.to_string()));
            }
        }
    }

    Ok(batch)
}

/// Load a ticket batch from a JSON file
pub fn load_tickets(path: &Path) -> Result<TicketBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ticket file {}", path.display()))?;
    let batch = parse_tickets(&content)
        .with_context(|| format!("Invalid ticket file {}", path.display()))?;

    info!(
        path = %path.display(),
        records = batch.records.len(),
        unreadable = batch.rejected.len(),
        "Loaded tickets"
    );
    Ok(batch)
}

/// Load an expected-outcomes fixture; the format follows the file extension
pub fn load_expected(path: &Path) -> Result<ExpectedOutcomes> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;

    let fixture: ExpectedOutcomes = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML fixture {}", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON fixture {}", path.display()))?,
        other => bail!(
            "Unsupported fixture format {:?} for {} (expected .toml or .json)",
            other,
            path.display()
        ),
    };

    info!(path = %path.display(), entries = fixture.len(), "Loaded expected outcomes");
    Ok(fixture)
}

/// Load canned labels (JSON object of ticket id to category label)
pub fn load_model_labels(path: &Path) -> Result<StaticCategoryModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model labels {}", path.display()))?;
    let labels: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid model labels {}", path.display()))?;

    Ok(labels
        .into_iter()
        .fold(StaticCategoryModel::new("static-labels"), |model, (id, label)| {
            model.with_label(id, label)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tickets_isolates_bad_records() {
        let content = r#"[
            {"id": "A", "subject": "s", "message": "m", "customer_tier": "Standard",
             "customer_revenue": 10, "account_age_days": 1, "previous_tickets": 0},
            {"id": "B", "subject": "s", "message": "m", "customer_tier": "Standard",
             "customer_revenue": 10, "account_age_days": 1.5, "previous_tickets": 0},
            {"subject": 42}
        ]"#;

        let batch = parse_tickets(content).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[0].ticket_id, "B");
        assert_eq!(batch.rejected[1].ticket_id, "<unknown>");
        assert!(batch.rejected.iter().all(|e| e.field == "record"));
    }

    #[test]
    fn test_parse_tickets_requires_array() {
        assert!(parse_tickets(r#"{"id": "A"}"#).is_err());
    }
}
