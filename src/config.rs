//! Configuration management

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server root; the client appends `/api/...`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How many entries to request and keep
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Minimum trimmed length, in characters
    pub min_text_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset used for timestamps (420 = UTC+7)
    pub utc_offset_minutes: i32,
}

impl Config {
    /// Load configuration from file, then environment (`SENTIMENT__API__BASE_URL`, ...)
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Config path is not valid UTF-8: {}", path.display()))?;

        let settings = config::Config::builder()
            .add_source(config::File::with_name(name))
            .add_source(Self::environment())
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations, falling back to built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = [
            "sentiment.toml",
            "~/.config/sentiment-assistant/config.toml",
        ];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(&*expanded).exists() {
                return Self::load(&*expanded);
            }
        }

        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document (environment is not consulted)
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Override the history limit (e.g. from the command line)
    pub fn with_history_limit(mut self, limit: usize) -> anyhow::Result<Self> {
        self.history.limit = limit;
        self.validate()?;
        Ok(self)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("SENTIMENT")
            .prefix_separator("__")
            .separator("__")
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.history.limit == 0 {
            anyhow::bail!("history.limit must be at least 1");
        }
        if !(-720..=840).contains(&self.display.utc_offset_minutes) {
            anyhow::bail!(
                "display.utc_offset_minutes out of range: {}",
                self.display.utc_offset_minutes
            );
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: crate::types::HISTORY_CAPACITY,
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self { min_text_length: 4 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 7 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.history.limit, 20);
        assert_eq!(config.submission.min_text_length, 4);
        assert_eq!(config.display.utc_offset_minutes, 420);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "http://sentiment.local:9000"

            [history]
            limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://sentiment.local:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.history.limit, 5);
        assert_eq!(config.submission.min_text_length, 4);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = Config::from_toml("[history]\nlimit = 0\n").unwrap_err();
        assert!(err.to_string().contains("history.limit"));
    }

    #[test]
    fn test_history_limit_override() {
        let config = Config::default().with_history_limit(7).unwrap();
        assert_eq!(config.history.limit, 7);

        let err = Config::default().with_history_limit(0).unwrap_err();
        assert!(err.to_string().contains("history.limit"));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(Config::from_toml("[api]\nbase_url = \"  \"\n").is_err());
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        assert!(Config::from_toml("[display]\nutc_offset_minutes = 5000\n").is_err());
    }
}
