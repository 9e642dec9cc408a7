use std::path::PathBuf;

/// Default ticket batch location, relative to the working directory
pub const DEFAULT_TICKETS_PATH: &str = "test_cases/tickets.json";

/// Runtime configuration for the CLI.
///
/// Resolution order: defaults, then `TRIAGE_*` environment variables, then
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// JSON array of ticket records
    pub tickets_path: PathBuf,
    /// Expected-outcomes fixture (TOML or JSON); `None` uses the reference fixture
    pub expected_path: Option<PathBuf>,
    /// Canned model labels (JSON object id -> label); enables the model-backed classifier
    pub model_labels_path: Option<PathBuf>,
    /// Emit JSON instead of human-readable text on stdout
    pub json_output: bool,
    /// Fail when the fixture and the batch disagree on ticket ids
    pub strict_fixture: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            tickets_path: PathBuf::from(DEFAULT_TICKETS_PATH),
            expected_path: None,
            model_labels_path: None,
            json_output: false,
            strict_fixture: false,
        }
    }
}

fn flag(value: &str) -> bool {
    value.to_lowercase() == "true" || value == "1"
}

impl CliConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("TRIAGE_TICKETS_PATH") {
            config.tickets_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TRIAGE_EXPECTED_PATH") {
            config.expected_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("TRIAGE_MODEL_LABELS_PATH") {
            config.model_labels_path = Some(PathBuf::from(path));
        }
        if let Some(val) = lookup("TRIAGE_OUTPUT_JSON") {
            config.json_output = flag(&val);
        }
        if let Some(val) = lookup("TRIAGE_STRICT_FIXTURE") {
            config.strict_fixture = flag(&val);
        }

        config
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        tickets_path: Option<PathBuf>,
        expected_path: Option<PathBuf>,
        model_labels_path: Option<PathBuf>,
        json_output: bool,
        strict_fixture: bool,
    ) -> Self {
        if let Some(path) = tickets_path {
            self.tickets_path = path;
        }
        if let Some(path) = expected_path {
            self.expected_path = Some(path);
        }
        if let Some(path) = model_labels_path {
            self.model_labels_path = Some(path);
        }
        self.json_output |= json_output;
        self.strict_fixture |= strict_fixture;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.tickets_path, PathBuf::from("test_cases/tickets.json"));
        assert!(config.expected_path.is_none());
        assert!(!config.json_output);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRIAGE_TICKETS_PATH", "/tmp/batch.json"),
            ("TRIAGE_EXPECTED_PATH", "/tmp/expected.toml"),
            ("TRIAGE_OUTPUT_JSON", "TRUE"),
            ("TRIAGE_STRICT_FIXTURE", "0"),
        ]
        .into_iter()
        .collect();

        let config = CliConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.tickets_path, PathBuf::from("/tmp/batch.json"));
        assert_eq!(
            config.expected_path,
            Some(PathBuf::from("/tmp/expected.toml"))
        );
        assert!(config.json_output);
        assert!(!config.strict_fixture);
    }

    #[test]
    fn test_flags_override_env() {
        let config = CliConfig::from_lookup(|k| {
            (k == "TRIAGE_TICKETS_PATH").then(|| "from-env.json".to_string())
        })
        .with_overrides(Some(PathBuf::from("from-flag.json")), None, None, false, true);

        assert_eq!(config.tickets_path, PathBuf::from("from-flag.json"));
        assert!(config.strict_fixture);
    }
}
