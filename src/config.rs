// ⚙️ Config - application settings
// Optional TOML file, then `APPEALS_*` environment variables, then CLI flags.
// Every field has a default, so an empty file (or none) yields a working setup.

use crate::error::{AppealsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub verification: VerificationConfig,
    pub appeal: AppealConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

/// Timing and odds of the simulated verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Time between progress ticks
    pub tick_interval_ms: u64,
    /// Percentage added per tick, 1..=100
    pub progress_step: u8,
    /// A rejection is valid when the uniform draw is strictly above this
    pub valid_rejection_threshold: f64,
    /// Simulated delay before an appeal counts as sent
    pub send_delay_ms: u64,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 800,
            progress_step: 20,
            valid_rejection_threshold: 0.6,
            send_delay_ms: 2000,
            seed: None,
        }
    }
}

impl VerificationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}

/// Letterhead and contract details substituted into appeal emails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppealConfig {
    pub sender_name: String,
    pub sender_title: String,
    pub organization: String,
    pub customer: String,
    pub gpo: String,
    pub contract_prefix: String,
    pub contract_tier: String,
    pub clause: String,
}

impl Default for AppealConfig {
    fn default() -> Self {
        Self {
            sender_name: "Sarah Johnson".to_string(),
            sender_title: "Appeals Manager".to_string(),
            organization: "McKesson Corporation".to_string(),
            customer: "Premier Healthcare".to_string(),
            gpo: "Premier GPO".to_string(),
            contract_prefix: "CON-2024".to_string(),
            contract_tier: "Tier 1".to_string(),
            clause: "4.2.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Claims CSV loaded into the table at start-up
    pub claims_csv: Option<PathBuf>,
    pub load_samples_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file for the terminal UI (stdout belongs to the UI)
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("claim-appeals.log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` when given, apply environment overrides, validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content =
                    std::fs::read_to_string(p).map_err(|e| AppealsError::io(p, e))?;
                toml::from_str(&content)?
            }
            None => AppConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `APPEALS_*` variables. `lookup` abstracts the
    /// environment so tests need not mutate the process env.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APPEALS_TICK_INTERVAL_MS") {
            self.verification.tick_interval_ms = parse_env("APPEALS_TICK_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("APPEALS_PROGRESS_STEP") {
            self.verification.progress_step = parse_env("APPEALS_PROGRESS_STEP", &v)?;
        }
        if let Some(v) = lookup("APPEALS_VALID_THRESHOLD") {
            self.verification.valid_rejection_threshold =
                parse_env("APPEALS_VALID_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("APPEALS_SEND_DELAY_MS") {
            self.verification.send_delay_ms = parse_env("APPEALS_SEND_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("APPEALS_SEED") {
            self.verification.seed = Some(parse_env("APPEALS_SEED", &v)?);
        }
        if let Some(v) = lookup("APPEALS_CLAIMS_CSV") {
            self.data.claims_csv = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("APPEALS_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("APPEALS_LOG_FILE") {
            self.logging.file = PathBuf::from(v);
        }
        if let Some(v) = lookup("APPEALS_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("APPEALS_PORT") {
            self.server.port = parse_env("APPEALS_PORT", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let v = &self.verification;
        if v.tick_interval_ms == 0 {
            return Err(AppealsError::InvalidConfig(
                "verification.tick_interval_ms must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&v.progress_step) {
            return Err(AppealsError::InvalidConfig(format!(
                "verification.progress_step must be within 1..=100, got {}",
                v.progress_step
            )));
        }
        if !(0.0..=1.0).contains(&v.valid_rejection_threshold) {
            return Err(AppealsError::InvalidConfig(format!(
                "verification.valid_rejection_threshold must be within [0, 1], got {}",
                v.valid_rejection_threshold
            )));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppealsError::InvalidConfig(format!("{key} has invalid value {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.verification.tick_interval(), Duration::from_millis(800));
        assert_eq!(config.verification.progress_step, 20);
        assert_eq!(config.appeal.sender_name, "Sarah Johnson");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [verification]
            tick_interval_ms = 100
            seed = 7

            [appeal]
            organization = "Acme Pharma"
            "#,
        )
        .unwrap();

        assert_eq!(config.verification.tick_interval_ms, 100);
        assert_eq!(config.verification.progress_step, 20);
        assert_eq!(config.verification.seed, Some(7));
        assert_eq!(config.appeal.organization, "Acme Pharma");
        assert_eq!(config.appeal.gpo, "Premier GPO");
    }

    #[test]
    fn test_validation() {
        let err = AppConfig::from_toml_str("[verification]\nprogress_step = 0\n").unwrap_err();
        assert!(matches!(err, AppealsError::InvalidConfig(_)));

        let err = AppConfig::from_toml_str("[verification]\nvalid_rejection_threshold = 1.5\n")
            .unwrap_err();
        assert!(matches!(err, AppealsError::InvalidConfig(_)));

        let err = AppConfig::from_toml_str("[verification]\ntick_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, AppealsError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = AppConfig::from_toml_str("[verification\n").unwrap_err();
        assert!(matches!(err, AppealsError::ConfigParse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("APPEALS_SEED", "42"),
            ("APPEALS_SEND_DELAY_MS", "0"),
            ("APPEALS_PORT", "8088"),
            ("APPEALS_CLAIMS_CSV", "/tmp/claims.csv"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.verification.seed, Some(42));
        assert_eq!(config.verification.send_delay_ms, 0);
        assert_eq!(config.server.server_addr(), "127.0.0.1:8088");
        assert_eq!(config.data.claims_csv, Some(PathBuf::from("/tmp/claims.csv")));
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|k| (k == "APPEALS_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppealsError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appeals.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert!(config.server.port == 9000 || std::env::var("APPEALS_PORT").is_ok());
    }
}
